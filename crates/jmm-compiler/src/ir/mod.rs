//! Intermediate Representation
//!
//! A three-address IR between the typed AST and Jasmin output:
//! - every operand is a typed value (temporary, variable, literal, `this`)
//! - control flow is linear, with labels and (conditional) gotos
//! - calls record their invocation kind explicitly

pub mod class;
pub mod function;
pub mod instr;
pub mod pretty;
pub mod ty;
pub mod value;

pub use class::{IrClass, IrField};
pub use function::IrMethod;
pub use instr::{BinaryOp, CallInstr, Invocation, IrInstr, UnaryOp};
pub use pretty::PrettyPrint;
pub use ty::type_suffix;
pub use value::{IrConstant, IrValue};
