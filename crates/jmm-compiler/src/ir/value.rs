//! IR Values
//!
//! Operands of IR instructions. Every value knows its type, and prints with
//! its type suffix.

use super::ty::type_suffix;
use crate::symbols::Type;
use std::fmt;

/// Constant values in IR
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IrConstant {
    Int(i32),
    Bool(bool),
    Str(String),
}

impl IrConstant {
    pub fn ty(&self) -> Type {
        match self {
            IrConstant::Int(_) => Type::int(),
            IrConstant::Bool(_) => Type::boolean(),
            IrConstant::Str(_) => Type::string(),
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            IrConstant::Int(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for IrConstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IrConstant::Int(v) => write!(f, "{}.i32", v),
            IrConstant::Bool(b) => write!(f, "{}.bool", u8::from(*b)),
            IrConstant::Str(s) => write!(f, "{:?}.string", s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IrValue {
    /// Compiler temporary
    Temp { name: String, ty: Type },
    /// Declared local variable or parameter
    Local { name: String, ty: Type },
    Literal(IrConstant),
    /// The receiver of an instance method; `ty` is the current class
    This(Type),
    /// A class name in call-target position (`invokestatic(io, ...)`)
    ClassRef(String),
    /// `array[index]`, valid as an assignment source or destination
    Element {
        array: Box<IrValue>,
        index: Box<IrValue>,
        ty: Type,
    },
}

impl IrValue {
    pub fn temp(name: impl Into<String>, ty: Type) -> Self {
        IrValue::Temp {
            name: name.into(),
            ty,
        }
    }

    pub fn local(name: impl Into<String>, ty: Type) -> Self {
        IrValue::Local {
            name: name.into(),
            ty,
        }
    }

    pub fn int(value: i32) -> Self {
        IrValue::Literal(IrConstant::Int(value))
    }

    pub fn bool(value: bool) -> Self {
        IrValue::Literal(IrConstant::Bool(value))
    }

    pub fn element(array: IrValue, index: IrValue, ty: Type) -> Self {
        IrValue::Element {
            array: Box::new(array),
            index: Box::new(index),
            ty,
        }
    }

    pub fn ty(&self) -> Type {
        match self {
            IrValue::Temp { ty, .. } | IrValue::Local { ty, .. } | IrValue::This(ty) => ty.clone(),
            IrValue::Element { ty, .. } => ty.clone(),
            IrValue::Literal(c) => c.ty(),
            IrValue::ClassRef(name) => Type::class(name.clone()),
        }
    }

    /// Name of a temporary or declared variable.
    pub fn var_name(&self) -> Option<&str> {
        match self {
            IrValue::Temp { name, .. } | IrValue::Local { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            IrValue::Literal(c) => c.as_int(),
            _ => None,
        }
    }
}

impl fmt::Display for IrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IrValue::Temp { name, ty } | IrValue::Local { name, ty } => {
                write!(f, "{}.{}", name, type_suffix(ty))
            }
            IrValue::Literal(c) => write!(f, "{}", c),
            IrValue::This(ty) => write!(f, "this.{}", ty.name),
            IrValue::ClassRef(name) => write!(f, "{}", name),
            IrValue::Element { array, index, ty } => {
                match array.var_name() {
                    Some(base) => write!(f, "{}", base)?,
                    None => write!(f, "{}", array)?,
                }
                write!(f, "[{}].{}", index, type_suffix(ty))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_display() {
        assert_eq!(IrValue::temp("tmp0", Type::int()).to_string(), "tmp0.i32");
        assert_eq!(IrValue::bool(true).to_string(), "1.bool");
        assert_eq!(IrValue::int(-3).to_string(), "-3.i32");
        assert_eq!(
            IrValue::This(Type::class("Foo")).to_string(),
            "this.Foo"
        );
        assert_eq!(
            IrValue::Literal(IrConstant::Str("hi".into())).to_string(),
            "\"hi\".string"
        );
    }

    #[test]
    fn test_element_display_and_type() {
        let arr = IrValue::local("a", Type::array_of("int"));
        let elem = IrValue::element(arr, IrValue::local("i", Type::int()), Type::int());
        assert_eq!(elem.to_string(), "a[i.i32].i32");
        assert_eq!(elem.ty(), Type::int());
        assert_eq!(elem.var_name(), None);
    }

    #[test]
    fn test_element_of_unnamed_base_prints_the_base() {
        let field_array = IrValue::This(Type::class("Foo"));
        let elem = IrValue::element(field_array, IrValue::int(0), Type::int());
        assert_eq!(elem.to_string(), "this.Foo[0.i32].i32");
    }
}
