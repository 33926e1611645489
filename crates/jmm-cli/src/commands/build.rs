//! `jmmc build`: Compile to Jasmin.

use crate::output::StyledOutput;
use crate::Emit;
use anyhow::Context;
use std::path::Path;

pub fn execute(
    input: &Path,
    symbols: Option<&Path>,
    config: Option<&Path>,
    output: Option<&Path>,
    emit: Emit,
    out: &mut StyledOutput,
) -> anyhow::Result<()> {
    let compiled = super::compile(input, symbols, config)?;

    let text = match emit {
        Emit::Ir => compiled.ir_listing(),
        Emit::Jasmin => compiled.jasmin.clone(),
        Emit::Both => format!("{}\n{}", compiled.ir_listing(), compiled.jasmin),
    };

    match output {
        Some(path) => {
            std::fs::write(path, &text)
                .with_context(|| format!("failed to write {}", path.display()))?;
            out.stderr_success("Compiled");
            out.stderr_plain(&format!(" {} -> {}\n", compiled.ir.name, path.display()));
        }
        None => print!("{}", text),
    }
    Ok(())
}
