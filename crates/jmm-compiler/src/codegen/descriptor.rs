//! Class paths and type descriptors
//!
//! Maps source-level names to the slash-separated internal names and field
//! descriptors the JVM expects.

use crate::error::{CompileError, CompileResult};
use crate::ir::IrClass;
use crate::symbols::{Type, BOOLEAN, INT, STRING, VOID};
use rustc_hash::FxHashMap;

pub struct ClassPaths {
    class_name: String,
    /// Simple import name to slash-separated path
    imports: FxHashMap<String, String>,
}

impl ClassPaths {
    /// The first import with a given simple name wins, as in the symbol table.
    pub fn new(class: &IrClass) -> Self {
        let mut imports = FxHashMap::default();
        for (simple, path) in class.import_table() {
            imports.entry(simple).or_insert(path);
        }
        Self {
            class_name: class.name.clone(),
            imports,
        }
    }

    /// Internal name of a class: the import path when imported.
    pub fn class_path(&self, name: &str) -> String {
        if name == self.class_name {
            return name.to_string();
        }
        if name == STRING {
            return "java/lang/String".to_string();
        }
        self.imports
            .get(name)
            .cloned()
            .unwrap_or_else(|| name.to_string())
    }

    fn base_descriptor(&self, name: &str) -> String {
        match name {
            INT => "I".to_string(),
            BOOLEAN => "Z".to_string(),
            VOID => "V".to_string(),
            STRING => "Ljava/lang/String;".to_string(),
            class => format!("L{};", self.class_path(class)),
        }
    }

    /// `int` -> `I`, `int[]` -> `[I`, `Foo` -> `LFoo;`
    pub fn descriptor(&self, ty: &Type) -> CompileResult<String> {
        if ty.is_array {
            if ty.name == VOID {
                return Err(CompileError::NoDescriptor { ty: ty.to_string() });
            }
            return Ok(format!("[{}", self.base_descriptor(&ty.name)));
        }
        Ok(self.base_descriptor(&ty.name))
    }

    /// `(I[I)Z`; parameters may not be void.
    pub fn method_descriptor<'t>(
        &self,
        params: impl IntoIterator<Item = &'t Type>,
        ret: &Type,
    ) -> CompileResult<String> {
        let mut out = String::from("(");
        for param in params {
            if param.is_void() {
                return Err(CompileError::NoDescriptor {
                    ty: param.to_string(),
                });
            }
            out.push_str(&self.descriptor(param)?);
        }
        out.push(')');
        out.push_str(&self.descriptor(ret)?);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths() -> ClassPaths {
        let mut class = IrClass::new("Calc");
        class.imports = vec!["io".into(), "java.util.Math".into()];
        ClassPaths::new(&class)
    }

    #[test]
    fn test_primitive_descriptors() {
        let paths = paths();
        assert_eq!(paths.descriptor(&Type::int()).expect("int"), "I");
        assert_eq!(paths.descriptor(&Type::boolean()).expect("bool"), "Z");
        assert_eq!(paths.descriptor(&Type::void()).expect("void"), "V");
        assert_eq!(
            paths.descriptor(&Type::string()).expect("string"),
            "Ljava/lang/String;"
        );
    }

    #[test]
    fn test_class_and_array_descriptors() {
        let paths = paths();
        assert_eq!(paths.descriptor(&Type::class("Math")).expect("math"), "Ljava/util/Math;");
        assert_eq!(paths.descriptor(&Type::class("Calc")).expect("calc"), "LCalc;");
        assert_eq!(paths.descriptor(&Type::array_of(INT)).expect("arr"), "[I");
        assert_eq!(
            paths.descriptor(&Type::array_of(STRING)).expect("args"),
            "[Ljava/lang/String;"
        );
        assert_eq!(paths.descriptor(&Type::vararg_of(INT)).expect("vararg"), "[I");
    }

    #[test]
    fn test_first_import_wins_on_simple_name_clash() {
        let mut class = IrClass::new("Calc");
        class.imports = vec!["a.util.List".into(), "b.util.List".into()];
        let paths = ClassPaths::new(&class);
        assert_eq!(paths.class_path("List"), "a/util/List");

        let table = crate::symbols::SymbolTable {
            class_name: "Calc".into(),
            super_class: None,
            imports: class.imports.clone(),
            fields: vec![],
            methods: vec![],
        };
        assert_eq!(table.import_path("List").as_deref(), Some("a/util/List"));
    }

    #[test]
    fn test_void_array_has_no_descriptor() {
        let err = paths().descriptor(&Type::array_of(VOID)).unwrap_err();
        assert_eq!(
            err,
            CompileError::NoDescriptor {
                ty: "void[]".to_string()
            }
        );
    }

    #[test]
    fn test_method_descriptor() {
        let paths = paths();
        let params = [Type::int(), Type::array_of(INT)];
        assert_eq!(
            paths
                .method_descriptor(params.iter(), &Type::boolean())
                .expect("descriptor"),
            "(I[I)Z"
        );
        assert!(paths
            .method_descriptor([Type::void()].iter(), &Type::void())
            .is_err());
    }
}
