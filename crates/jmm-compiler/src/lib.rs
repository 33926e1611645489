//! Jmm Compiler - typed AST to Jasmin
//!
//! The backend of the Jmm teaching-language compiler. It lowers a validated
//! AST and its symbol table into a three-address IR, then emits Jasmin
//! assembly for the JVM.
//!
//! ```text
//! Node (JSON) → Program → Lowerer → IrClass → JasminGenerator → Jasmin text
//! ```

pub mod ast;
pub mod codegen;
pub mod context;
pub mod error;
pub mod ir;
pub mod lower;
pub mod options;
pub mod symbols;

pub use ast::{Node, Program};
pub use codegen::JasminGenerator;
pub use context::CompilationContext;
pub use error::{CompileError, CompileResult};
pub use ir::{IrClass, PrettyPrint};
pub use lower::Lowerer;
pub use options::CompilerOptions;
pub use symbols::SymbolTable;

use tracing::debug;

/// Output of one compilation unit
#[derive(Debug, Clone)]
pub struct CompiledClass {
    pub ir: IrClass,
    pub jasmin: String,
}

impl CompiledClass {
    /// OLLIR-style listing of the IR
    pub fn ir_listing(&self) -> String {
        self.ir.pretty_print()
    }
}

/// Main compiler entry point
pub struct Compiler {
    options: CompilerOptions,
}

impl Compiler {
    pub fn new(options: CompilerOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    /// Lower a program to IR. Each call uses a fresh [`CompilationContext`].
    pub fn lower(&self, program: &Program, symbols: &SymbolTable) -> CompileResult<IrClass> {
        let mut ctx = CompilationContext::new();
        Lowerer::new(symbols, &mut ctx).lower_program(program)
    }

    /// Lower and emit one class.
    pub fn compile(&self, program: &Program, symbols: &SymbolTable) -> CompileResult<CompiledClass> {
        let ir = self.lower(program, symbols)?;
        let jasmin = codegen::generate(&ir, &self.options)?;
        debug!(class = %ir.name, bytes = jasmin.len(), "compiled class");
        Ok(CompiledClass { ir, jasmin })
    }

    /// Compile a program whose symbol table is derived from its declarations.
    pub fn compile_program(&self, program: &Program) -> CompileResult<CompiledClass> {
        let symbols = SymbolTable::from_program(program);
        self.compile(program, &symbols)
    }

    /// Compile from the generic node tree.
    pub fn compile_node(
        &self,
        node: &Node,
        symbols: Option<&SymbolTable>,
    ) -> CompileResult<CompiledClass> {
        let program = Program::from_node(node)?;
        match symbols {
            Some(symbols) => self.compile(&program, symbols),
            None => self.compile_program(&program),
        }
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new(CompilerOptions::default())
    }
}
