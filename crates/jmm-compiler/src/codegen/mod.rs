//! Code Generation from IR to Jasmin
//!
//! # Pipeline
//!
//! ```text
//! IrClass → JasminGenerator → Jasmin text
//! ```
//!
//! One [`MethodFrame`] per method tracks stack depth and local slots. After
//! every IR instruction the simulated stack must be empty again; a value left
//! behind or popped from an empty stack aborts generation.

mod context;
mod control;
pub mod descriptor;
pub mod emit;
mod frame;

pub use context::JasminGenerator;
pub use frame::MethodFrame;

use crate::error::CompileResult;
use crate::ir::IrClass;
use crate::options::CompilerOptions;

/// Generate Jasmin for an IR class
pub fn generate(class: &IrClass, options: &CompilerOptions) -> CompileResult<String> {
    JasminGenerator::new(class, options).generate()
}
