//! Compilation errors
//!
//! Every error here is fatal for the whole compilation unit: a half-emitted
//! method has no meaning, so nothing is recovered mid-method.

use thiserror::Error;

pub type CompileResult<T> = Result<T, CompileError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("Malformed AST node {kind}: {message}")]
    MalformedAst { kind: String, message: String },

    #[error("Unsupported construct: {construct}")]
    Unsupported { construct: String },

    #[error("Unresolved symbol '{name}' in method {method}")]
    UnresolvedSymbol { name: String, method: String },

    #[error("Call target cannot be resolved to a method name: {callee}")]
    UnresolvedCall { callee: String },

    #[error("No bytecode descriptor for type {ty}")]
    NoDescriptor { ty: String },

    #[error("Operand stack underflow in method {method}")]
    StackUnderflow { method: String },

    #[error("Operand stack left at depth {depth} after `{instr}` in method {method}")]
    UnbalancedStack {
        method: String,
        instr: String,
        depth: u32,
    },

    #[error("Too many local variables in method {method} (max 65535)")]
    TooManyLocals { method: String },

    #[error("Invalid configuration: {message}")]
    Config { message: String },

    #[error("Internal compiler error: {message}")]
    InternalError { message: String },
}

impl CompileError {
    pub(crate) fn malformed(kind: impl std::fmt::Display, message: impl Into<String>) -> Self {
        CompileError::MalformedAst {
            kind: kind.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn unsupported(construct: impl Into<String>) -> Self {
        CompileError::Unsupported {
            construct: construct.into(),
        }
    }

    pub(crate) fn internal(message: impl Into<String>) -> Self {
        CompileError::InternalError {
            message: message.into(),
        }
    }
}
