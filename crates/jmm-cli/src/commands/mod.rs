//! Subcommand implementations and the input loading they share.

pub mod build;
pub mod ir;

use anyhow::Context;
use jmm_compiler::{CompiledClass, Compiler, CompilerOptions, Node, SymbolTable};
use std::path::Path;

/// Options from `--config`, or the defaults.
pub fn load_options(config: Option<&Path>) -> anyhow::Result<CompilerOptions> {
    let Some(path) = config else {
        return Ok(CompilerOptions::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    CompilerOptions::from_toml_str(&text)
        .with_context(|| format!("invalid config {}", path.display()))
}

pub fn load_ast(path: &Path) -> anyhow::Result<Node> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("{} is not an AST node tree", path.display()))
}

pub fn load_symbols(path: Option<&Path>) -> anyhow::Result<Option<SymbolTable>> {
    let Some(path) = path else {
        return Ok(None);
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let table = serde_json::from_str(&text)
        .with_context(|| format!("{} is not a symbol table", path.display()))?;
    Ok(Some(table))
}

/// Load everything and run the full pipeline.
pub fn compile(
    input: &Path,
    symbols: Option<&Path>,
    config: Option<&Path>,
) -> anyhow::Result<CompiledClass> {
    let options = load_options(config)?;
    let node = load_ast(input)?;
    let symbols = load_symbols(symbols)?;

    let compiler = Compiler::new(options);
    let compiled = compiler
        .compile_node(&node, symbols.as_ref())
        .with_context(|| format!("failed to compile {}", input.display()))?;
    tracing::debug!(class = %compiled.ir.name, "pipeline finished");
    Ok(compiled)
}
