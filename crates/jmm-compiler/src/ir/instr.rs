//! IR Instructions
//!
//! Three-address instructions with linearized control flow.

use super::value::IrValue;
use crate::symbols::Type;

/// IR instruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IrInstr {
    /// dest = value (dest may be an array element)
    Assign { dest: IrValue, value: IrValue },

    /// dest = left op right
    BinaryOp {
        dest: IrValue,
        op: BinaryOp,
        left: IrValue,
        right: IrValue,
    },

    /// dest = op operand
    UnaryOp {
        dest: IrValue,
        op: UnaryOp,
        operand: IrValue,
    },

    /// dest = object.field
    GetField {
        dest: IrValue,
        object: IrValue,
        field: String,
        ty: Type,
    },

    /// object.field = value
    PutField {
        object: IrValue,
        field: String,
        value: IrValue,
    },

    /// Invocation; `dest` is `None` when the result is discarded
    Call {
        dest: Option<IrValue>,
        call: CallInstr,
    },

    Return(Option<IrValue>),

    Goto(String),

    /// if (cond) goto label
    CondGoto { cond: IrValue, label: String },

    Label(String),
}

impl IrInstr {
    pub fn is_return(&self) -> bool {
        matches!(self, IrInstr::Return(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Invocation {
    Static,
    Virtual,
    /// Constructor invocation on an allocated object
    Special,
    New,
    NewArray,
    ArrayLength,
}

impl Invocation {
    pub fn keyword(&self) -> &'static str {
        match self {
            Invocation::Static => "invokestatic",
            Invocation::Virtual => "invokevirtual",
            Invocation::Special => "invokespecial",
            Invocation::New | Invocation::NewArray => "new",
            Invocation::ArrayLength => "arraylength",
        }
    }
}

/// One call site.
///
/// `target` is the receiver for virtual/special calls, the class reference
/// for static calls and `new`, and the array for `arraylength`. `method` is
/// the callee name for the three `invoke` kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallInstr {
    pub invocation: Invocation,
    pub target: Option<IrValue>,
    pub method: Option<String>,
    pub args: Vec<IrValue>,
    pub return_type: Type,
}

impl CallInstr {
    pub fn invoke(
        invocation: Invocation,
        target: IrValue,
        method: impl Into<String>,
        args: Vec<IrValue>,
        return_type: Type,
    ) -> Self {
        Self {
            invocation,
            target: Some(target),
            method: Some(method.into()),
            args,
            return_type,
        }
    }

    pub fn new_object(class: impl Into<String>) -> Self {
        let class = class.into();
        Self {
            invocation: Invocation::New,
            target: Some(IrValue::ClassRef(class.clone())),
            method: None,
            args: Vec::new(),
            return_type: Type::class(class),
        }
    }

    pub fn new_array(elem: &Type, size: IrValue) -> Self {
        Self {
            invocation: Invocation::NewArray,
            target: None,
            method: None,
            args: vec![size],
            return_type: Type::array_of(elem.name.clone()),
        }
    }

    pub fn array_length(array: IrValue) -> Self {
        Self {
            invocation: Invocation::ArrayLength,
            target: Some(array),
            method: None,
            args: Vec::new(),
            return_type: Type::int(),
        }
    }

    pub fn returns_value(&self) -> bool {
        !self.return_type.is_void()
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Equal,
    NotEqual,
    And,
}

impl BinaryOp {
    pub fn is_arithmetic(&self) -> bool {
        matches!(
            self,
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div
        )
    }

    /// Type of the operation's result.
    pub fn result_type(&self) -> Type {
        if self.is_arithmetic() {
            Type::int()
        } else {
            Type::boolean()
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Less => "<",
            BinaryOp::LessEqual => "<=",
            BinaryOp::Greater => ">",
            BinaryOp::GreaterEqual => ">=",
            BinaryOp::Equal => "==",
            BinaryOp::NotEqual => "!=",
            BinaryOp::And => "&&",
        }
    }
}

impl std::fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Not,
}

impl std::fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnaryOp::Not => write!(f, "!"),
        }
    }
}
