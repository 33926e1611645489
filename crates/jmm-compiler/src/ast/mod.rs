//! Typed AST
//!
//! The validated program handed over by semantic analysis. Upstream stages
//! produce a generic [`Node`] tree; [`Program::from_node`] converts it into the
//! closed enums below, which lowering matches exhaustively.

mod node;

pub use node::{Kind, Node};

use crate::symbols::{Symbol, Type};
use std::fmt;

/// One compilation unit: imports plus a single class.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    /// Qualified import names, dot separated.
    pub imports: Vec<String>,
    pub class: ClassDecl,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    pub name: String,
    pub super_class: Option<String>,
    pub fields: Vec<Symbol>,
    pub methods: Vec<MethodDecl>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodDecl {
    pub name: String,
    pub return_type: Type,
    pub params: Vec<Symbol>,
    pub locals: Vec<Symbol>,
    pub body: Vec<Stmt>,
    pub is_static: bool,
    pub is_public: bool,
}

impl MethodDecl {
    pub fn is_main(&self) -> bool {
        self.name == "main" && self.is_static
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `target = value;` where target is a variable, field or array element
    Assign { target: Expr, value: Expr },
    /// Expression evaluated for its side effects
    Expr(Expr),
    Return(Option<Expr>),
    If {
        cond: Expr,
        then_branch: Box<Stmt>,
        else_branch: Box<Stmt>,
    },
    While { cond: Expr, body: Box<Stmt> },
    /// `{ ... }`
    Block(Vec<Stmt>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
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

impl BinaryOperator {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        let op = match symbol {
            "+" => BinaryOperator::Add,
            "-" => BinaryOperator::Sub,
            "*" => BinaryOperator::Mul,
            "/" => BinaryOperator::Div,
            "<" => BinaryOperator::Less,
            "<=" => BinaryOperator::LessEqual,
            ">" => BinaryOperator::Greater,
            ">=" => BinaryOperator::GreaterEqual,
            "==" => BinaryOperator::Equal,
            "!=" => BinaryOperator::NotEqual,
            "&&" => BinaryOperator::And,
            _ => return None,
        };
        Some(op)
    }

    pub fn is_arithmetic(&self) -> bool {
        matches!(
            self,
            BinaryOperator::Add | BinaryOperator::Sub | BinaryOperator::Mul | BinaryOperator::Div
        )
    }

    pub fn is_relational(&self) -> bool {
        matches!(
            self,
            BinaryOperator::Less
                | BinaryOperator::LessEqual
                | BinaryOperator::Greater
                | BinaryOperator::GreaterEqual
                | BinaryOperator::Equal
                | BinaryOperator::NotEqual
        )
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Sub => "-",
            BinaryOperator::Mul => "*",
            BinaryOperator::Div => "/",
            BinaryOperator::Less => "<",
            BinaryOperator::LessEqual => "<=",
            BinaryOperator::Greater => ">",
            BinaryOperator::GreaterEqual => ">=",
            BinaryOperator::Equal => "==",
            BinaryOperator::NotEqual => "!=",
            BinaryOperator::And => "&&",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Not,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    IntLiteral(i32),
    BoolLiteral(bool),
    StringLiteral(String),
    This,
    /// Local, parameter, field, or a class name used as a static receiver
    Var(String),
    Binary {
        op: BinaryOperator,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Unary {
        op: UnaryOperator,
        operand: Box<Expr>,
    },
    Paren(Box<Expr>),
    ArrayAccess {
        array: Box<Expr>,
        index: Box<Expr>,
    },
    Length(Box<Expr>),
    NewArray {
        elem: Type,
        size: Box<Expr>,
    },
    ArrayInit(Vec<Expr>),
    NewObject(String),
    /// `receiver.name(args)`; a missing receiver means `this`
    MethodCall {
        receiver: Option<Box<Expr>>,
        name: String,
        args: Vec<Expr>,
    },
}

impl Expr {
    pub fn int(value: i32) -> Self {
        Expr::IntLiteral(value)
    }

    pub fn bool(value: bool) -> Self {
        Expr::BoolLiteral(value)
    }

    pub fn var(name: impl Into<String>) -> Self {
        Expr::Var(name.into())
    }

    pub fn binary(op: BinaryOperator, left: Expr, right: Expr) -> Self {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn not(operand: Expr) -> Self {
        Expr::Unary {
            op: UnaryOperator::Not,
            operand: Box::new(operand),
        }
    }

    pub fn index(array: Expr, index: Expr) -> Self {
        Expr::ArrayAccess {
            array: Box::new(array),
            index: Box::new(index),
        }
    }

    pub fn call(receiver: Expr, name: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::MethodCall {
            receiver: Some(Box::new(receiver)),
            name: name.into(),
            args,
        }
    }

    /// Strip redundant parentheses.
    pub fn unparen(&self) -> &Expr {
        match self {
            Expr::Paren(inner) => inner.unparen(),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_symbols() {
        for symbol in ["+", "-", "*", "/", "<", "<=", ">", ">=", "==", "!=", "&&"] {
            let op = BinaryOperator::from_symbol(symbol).expect("known operator");
            assert_eq!(op.to_string(), symbol);
        }
        assert_eq!(BinaryOperator::from_symbol("%"), None);
    }

    #[test]
    fn test_operator_categories() {
        assert!(BinaryOperator::Add.is_arithmetic());
        assert!(!BinaryOperator::Add.is_relational());
        assert!(BinaryOperator::NotEqual.is_relational());
        assert!(!BinaryOperator::And.is_arithmetic());
        assert!(!BinaryOperator::And.is_relational());
    }

    #[test]
    fn test_unparen_strips_nested_parens() {
        let call = Expr::call(Expr::This, "foo", vec![]);
        let wrapped = Expr::Paren(Box::new(Expr::Paren(Box::new(call.clone()))));
        assert_eq!(wrapped.unparen(), &call);
        assert_eq!(Expr::int(1).unparen(), &Expr::int(1));
    }
}
