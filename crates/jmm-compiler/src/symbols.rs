//! Symbol table
//!
//! The resolved declarations of one class: imports, fields, and per-method
//! return types, parameters and locals. Order is preserved everywhere because
//! slot numbering and output determinism depend on declaration order.

use crate::ast::{ClassDecl, MethodDecl, Program};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const INT: &str = "int";
pub const BOOLEAN: &str = "boolean";
pub const VOID: &str = "void";
pub const STRING: &str = "String";

/// A source-level type.
///
/// `is_vararg` always implies `is_array`; deserialization and the
/// constructors uphold this.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "TypeRepr", rename_all = "camelCase")]
pub struct Type {
    pub name: String,
    pub is_array: bool,
    pub is_vararg: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TypeRepr {
    name: String,
    #[serde(default)]
    is_array: bool,
    #[serde(default)]
    is_vararg: bool,
}

impl From<TypeRepr> for Type {
    fn from(repr: TypeRepr) -> Self {
        Type {
            name: repr.name,
            is_array: repr.is_array || repr.is_vararg,
            is_vararg: repr.is_vararg,
        }
    }
}

impl Type {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_array: false,
            is_vararg: false,
        }
    }

    pub fn int() -> Self {
        Self::new(INT)
    }

    pub fn boolean() -> Self {
        Self::new(BOOLEAN)
    }

    pub fn void() -> Self {
        Self::new(VOID)
    }

    pub fn string() -> Self {
        Self::new(STRING)
    }

    /// A class (or import) type.
    pub fn class(name: impl Into<String>) -> Self {
        Self::new(name)
    }

    pub fn array_of(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_array: true,
            is_vararg: false,
        }
    }

    pub fn vararg_of(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_array: true,
            is_vararg: true,
        }
    }

    /// The element type of an array type; the type itself otherwise.
    pub fn element(&self) -> Type {
        Type::new(self.name.clone())
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self.name.as_str(), INT | BOOLEAN | VOID | STRING)
    }

    pub fn is_void(&self) -> bool {
        !self.is_array && self.name == VOID
    }

    pub fn is_int(&self) -> bool {
        !self.is_array && self.name == INT
    }

    pub fn is_boolean(&self) -> bool {
        !self.is_array && self.name == BOOLEAN
    }

    /// True for values held in a single int-category stack slot.
    pub fn is_int_like(&self) -> bool {
        self.is_int() || self.is_boolean()
    }

}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_vararg {
            write!(f, "{}...", self.name)
        } else if self.is_array {
            write!(f, "{}[]", self.name)
        } else {
            write!(f, "{}", self.name)
        }
    }
}

/// A named, typed declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbol {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: Type,
}

impl Symbol {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodSignature {
    pub name: String,
    pub return_type: Type,
    #[serde(default)]
    pub params: Vec<Symbol>,
    #[serde(default)]
    pub locals: Vec<Symbol>,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default = "default_public")]
    pub is_public: bool,
}

fn default_public() -> bool {
    true
}

impl MethodSignature {
    /// True when the last parameter collects trailing arguments.
    pub fn is_vararg(&self) -> bool {
        self.params.last().is_some_and(|p| p.ty.is_vararg)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolTable {
    pub class_name: String,
    #[serde(default)]
    pub super_class: Option<String>,
    /// Qualified import names, dot separated (`io.Console`).
    #[serde(default)]
    pub imports: Vec<String>,
    #[serde(default)]
    pub fields: Vec<Symbol>,
    #[serde(default)]
    pub methods: Vec<MethodSignature>,
}

impl SymbolTable {
    /// Build the table from a typed program, keeping declaration order.
    pub fn from_program(program: &Program) -> Self {
        let ClassDecl {
            name,
            super_class,
            fields,
            methods,
        } = &program.class;

        Self {
            class_name: name.clone(),
            super_class: super_class.clone(),
            imports: program.imports.clone(),
            fields: fields.clone(),
            methods: methods.iter().map(Self::signature_of).collect(),
        }
    }

    fn signature_of(method: &MethodDecl) -> MethodSignature {
        MethodSignature {
            name: method.name.clone(),
            return_type: method.return_type.clone(),
            params: method.params.clone(),
            locals: method.locals.clone(),
            is_static: method.is_static,
            is_public: method.is_public,
        }
    }

    pub fn field(&self, name: &str) -> Option<&Symbol> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn method(&self, name: &str) -> Option<&MethodSignature> {
        self.methods.iter().find(|m| m.name == name)
    }

    /// Simple name of an import (`a.b.C` -> `C`).
    pub fn import_simple_name(import: &str) -> &str {
        import.rsplit('.').next().unwrap_or(import)
    }

    pub fn is_imported(&self, simple: &str) -> bool {
        self.import_path(simple).is_some()
    }

    /// Slash-separated path of an imported class, if `simple` is imported.
    /// The first import with that simple name wins.
    pub fn import_path(&self, simple: &str) -> Option<String> {
        self.imports
            .iter()
            .find(|i| Self::import_simple_name(i) == simple)
            .map(|i| i.replace('.', "/"))
    }

    /// True when `name` names a class: the current one, its parent or an import.
    pub fn is_class_name(&self, name: &str) -> bool {
        name == self.class_name
            || self.super_class.as_deref() == Some(name)
            || self.is_imported(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SymbolTable {
        SymbolTable {
            class_name: "Calc".to_string(),
            super_class: Some("Base".to_string()),
            imports: vec!["io".to_string(), "java.util.Math".to_string()],
            fields: vec![Symbol::new("count", Type::int())],
            methods: vec![MethodSignature {
                name: "sum".to_string(),
                return_type: Type::int(),
                params: vec![Symbol::new("xs", Type::vararg_of(INT))],
                locals: vec![],
                is_static: false,
                is_public: true,
            }],
        }
    }

    #[test]
    fn test_type_display() {
        assert_eq!(Type::int().to_string(), "int");
        assert_eq!(Type::array_of(INT).to_string(), "int[]");
        assert_eq!(Type::vararg_of(INT).to_string(), "int...");
    }

    #[test]
    fn test_vararg_implies_array_on_deserialize() {
        let ty: Type =
            serde_json::from_str(r#"{"name":"int","isVararg":true}"#).expect("valid type");
        assert!(ty.is_array);
        assert!(ty.is_vararg);
    }

    #[test]
    fn test_primitive_classification() {
        assert!(Type::string().is_primitive());
        assert!(!Type::class("Foo").is_primitive());
        assert!(Type::boolean().is_int_like());
    }

    #[test]
    fn test_import_lookup() {
        let table = sample();
        assert_eq!(table.import_path("Math").as_deref(), Some("java/util/Math"));
        assert_eq!(table.import_path("io").as_deref(), Some("io"));
        assert_eq!(table.import_path("Calc"), None);
        assert!(table.is_imported("Math"));
        assert!(!table.is_imported("Other"));
        assert!(table.is_class_name("Calc"));
        assert!(table.is_class_name("Base"));
        assert!(!table.is_class_name("count"));
    }

    #[test]
    fn test_method_lookup() {
        let table = sample();
        assert!(table.method("missing").is_none());
        assert!(table.method("sum").is_some_and(|m| m.is_vararg()));
        assert!(table.field("count").is_some());
        assert!(table.field("missing").is_none());
    }

    #[test]
    fn test_symbol_table_json() {
        let json = r#"{
            "className": "A",
            "fields": [{"name": "x", "type": {"name": "int"}}],
            "methods": [{"name": "main", "returnType": {"name": "void"}, "isStatic": true}]
        }"#;
        let table: SymbolTable = serde_json::from_str(json).expect("valid table");
        assert_eq!(table.class_name, "A");
        assert_eq!(table.super_class, None);
        assert!(table.method("main").is_some_and(|m| m.is_static && m.is_public));
    }
}
