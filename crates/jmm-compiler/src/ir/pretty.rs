//! Pretty-printing for IR
//!
//! Renders IR in the OLLIR textual form:
//!
//! ```text
//! Calc extends Base {
//!     .field public count.i32;
//!
//!     .method public inc(a.i32).i32 {
//!         tmp0.i32 :=.i32 a.i32 +.i32 1.i32;
//!         ret.i32 tmp0.i32;
//!     }
//! }
//! ```

use super::class::IrClass;
use super::function::IrMethod;
use super::instr::{CallInstr, Invocation, IrInstr};
use super::ty::type_suffix;
use super::value::IrValue;
use std::fmt::{self, Write};

/// Trait for pretty-printing IR constructs
pub trait PrettyPrint {
    fn pretty_print(&self) -> String;
}

impl PrettyPrint for IrClass {
    fn pretty_print(&self) -> String {
        let mut output = String::new();

        for import in &self.imports {
            let _ = writeln!(output, "import {};", import);
        }
        if !self.imports.is_empty() {
            output.push('\n');
        }

        match &self.super_class {
            Some(parent) => {
                let _ = writeln!(output, "{} extends {} {{", self.name, parent);
            }
            None => {
                let _ = writeln!(output, "{} {{", self.name);
            }
        }

        for field in &self.fields {
            let _ = writeln!(output, "    .field public {}.{};", field.name, type_suffix(&field.ty));
        }

        for method in &self.methods {
            output.push('\n');
            output.push_str(&method.pretty_print());
        }

        output.push_str("}\n");
        output
    }
}

impl PrettyPrint for IrMethod {
    fn pretty_print(&self) -> String {
        let mut output = String::new();

        let params: Vec<String> = self
            .params
            .iter()
            .map(|p| format!("{}.{}", p.name, type_suffix(&p.ty)))
            .collect();

        if self.is_constructor {
            let _ = write!(output, "    .construct {}({}).V {{", self.name, params.join(", "));
        } else {
            let visibility = if self.is_public { "public " } else { "" };
            let static_kw = if self.is_static { "static " } else { "" };
            let _ = write!(
                output,
                "    .method {}{}{}({}).{} {{",
                visibility,
                static_kw,
                self.name,
                params.join(", "),
                type_suffix(&self.return_type)
            );
        }
        output.push('\n');

        for instr in &self.body {
            match instr {
                IrInstr::Label(label) => {
                    let _ = writeln!(output, "    {}:", label);
                }
                other => {
                    let _ = writeln!(output, "        {};", other);
                }
            }
        }

        output.push_str("    }\n");
        output
    }
}

impl fmt::Display for IrInstr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IrInstr::Assign { dest, value } => {
                write!(f, "{} :=.{} {}", dest, type_suffix(&dest.ty()), value)
            }
            IrInstr::BinaryOp {
                dest,
                op,
                left,
                right,
            } => {
                let suffix = type_suffix(&op.result_type());
                write!(
                    f,
                    "{} :=.{} {} {}.{} {}",
                    dest,
                    type_suffix(&dest.ty()),
                    left,
                    op,
                    suffix,
                    right
                )
            }
            IrInstr::UnaryOp { dest, op, operand } => {
                let suffix = type_suffix(&dest.ty());
                write!(f, "{} :=.{} {}.{} {}", dest, suffix, op, suffix, operand)
            }
            IrInstr::GetField {
                dest,
                object,
                field,
                ty,
            } => {
                let suffix = type_suffix(ty);
                write!(
                    f,
                    "{} :=.{} getfield({}, {}.{}).{}",
                    dest,
                    type_suffix(&dest.ty()),
                    receiver(object),
                    field,
                    suffix,
                    suffix
                )
            }
            IrInstr::PutField {
                object,
                field,
                value,
            } => write!(
                f,
                "putfield({}, {}.{}, {}).V",
                receiver(object),
                field,
                type_suffix(&value.ty()),
                value
            ),
            IrInstr::Call { dest, call } => match dest {
                Some(dest) => write!(f, "{} :=.{} {}", dest, type_suffix(&dest.ty()), call),
                None => write!(f, "{}", call),
            },
            IrInstr::Return(Some(value)) => {
                write!(f, "ret.{} {}", type_suffix(&value.ty()), value)
            }
            IrInstr::Return(None) => write!(f, "ret.V"),
            IrInstr::Goto(label) => write!(f, "goto {}", label),
            IrInstr::CondGoto { cond, label } => write!(f, "if ({}) goto {}", cond, label),
            IrInstr::Label(label) => write!(f, "{}:", label),
        }
    }
}

impl fmt::Display for CallInstr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ret = type_suffix(&self.return_type);
        let args: Vec<String> = self.args.iter().map(|a| a.to_string()).collect();
        let target = self.target.as_ref().map(receiver).unwrap_or_default();

        match self.invocation {
            Invocation::New => write!(f, "new({}).{}", target, ret),
            Invocation::NewArray => write!(f, "new(array, {}).{}", args.join(", "), ret),
            Invocation::ArrayLength => write!(f, "arraylength({}).{}", target, ret),
            Invocation::Static | Invocation::Virtual | Invocation::Special => {
                let mut operands = vec![target];
                if let Some(method) = &self.method {
                    operands.push(format!("\"{}\"", method));
                }
                operands.extend(args);
                write!(
                    f,
                    "{}({}).{}",
                    self.invocation.keyword(),
                    operands.join(", "),
                    ret
                )
            }
        }
    }
}

/// `this` prints bare in receiver position.
fn receiver(value: &IrValue) -> String {
    match value {
        IrValue::This(_) => "this".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{BinaryOp, IrField, UnaryOp};
    use crate::symbols::{Symbol, Type};

    fn int(name: &str) -> IrValue {
        IrValue::local(name, Type::int())
    }

    #[test]
    fn test_format_arithmetic_and_compare() {
        let add = IrInstr::BinaryOp {
            dest: IrValue::temp("tmp0", Type::int()),
            op: BinaryOp::Add,
            left: int("a"),
            right: IrValue::int(1),
        };
        assert_eq!(add.to_string(), "tmp0.i32 :=.i32 a.i32 +.i32 1.i32");

        let lt = IrInstr::BinaryOp {
            dest: IrValue::temp("tmp1", Type::boolean()),
            op: BinaryOp::Less,
            left: int("x"),
            right: IrValue::int(10),
        };
        assert_eq!(lt.to_string(), "tmp1.bool :=.bool x.i32 <.bool 10.i32");

        let not = IrInstr::UnaryOp {
            dest: IrValue::temp("tmp2", Type::boolean()),
            op: UnaryOp::Not,
            operand: IrValue::temp("tmp1", Type::boolean()),
        };
        assert_eq!(not.to_string(), "tmp2.bool :=.bool !.bool tmp1.bool");
    }

    #[test]
    fn test_format_calls() {
        let this = IrValue::This(Type::class("A"));
        let call = IrInstr::Call {
            dest: Some(IrValue::temp("tmp0", Type::int())),
            call: CallInstr::invoke(Invocation::Virtual, this, "foo", vec![int("a")], Type::int()),
        };
        assert_eq!(
            call.to_string(),
            "tmp0.i32 :=.i32 invokevirtual(this, \"foo\", a.i32).i32"
        );

        let alloc = IrInstr::Call {
            dest: Some(IrValue::temp("tmp1", Type::class("B"))),
            call: CallInstr::new_object("B"),
        };
        assert_eq!(alloc.to_string(), "tmp1.B :=.B new(B).B");

        let arr = CallInstr::new_array(&Type::int(), IrValue::int(4));
        assert_eq!(arr.to_string(), "new(array, 4.i32).array.i32");

        let len = CallInstr::array_length(IrValue::local("xs", Type::array_of("int")));
        assert_eq!(len.to_string(), "arraylength(xs.array.i32).i32");
    }

    #[test]
    fn test_format_fields() {
        let this = IrValue::This(Type::class("A"));
        let get = IrInstr::GetField {
            dest: IrValue::temp("tmp0", Type::int()),
            object: this.clone(),
            field: "x".into(),
            ty: Type::int(),
        };
        assert_eq!(get.to_string(), "tmp0.i32 :=.i32 getfield(this, x.i32).i32");

        let put = IrInstr::PutField {
            object: this,
            field: "x".into(),
            value: IrValue::int(2),
        };
        assert_eq!(put.to_string(), "putfield(this, x.i32, 2.i32).V");
    }

    #[test]
    fn test_class_listing() {
        let mut class = IrClass::new("A");
        class.imports.push("io".into());
        class.fields.push(IrField {
            name: "x".into(),
            ty: Type::int(),
        });

        let mut ctor = IrMethod::constructor("A");
        ctor.push(IrInstr::Call {
            dest: None,
            call: CallInstr::invoke(
                Invocation::Special,
                IrValue::This(Type::class("A")),
                "<init>",
                vec![],
                Type::void(),
            ),
        });
        ctor.push(IrInstr::Return(None));
        class.methods.push(ctor);

        let mut method = IrMethod::new("get", Type::int());
        method.params.push(Symbol::new("a", Type::int()));
        method.push(IrInstr::Label("l0".into()));
        method.push(IrInstr::Return(Some(int("a"))));
        class.methods.push(method);

        let expected = "\
import io;

A {
    .field public x.i32;

    .construct A().V {
        invokespecial(this, \"<init>\").V;
        ret.V;
    }

    .method public get(a.i32).i32 {
    l0:
        ret.i32 a.i32;
    }
}
";
        assert_eq!(class.pretty_print(), expected);
    }
}
