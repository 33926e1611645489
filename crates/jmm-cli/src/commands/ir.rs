//! `jmmc ir`: Print the IR listing.

use std::path::Path;

pub fn execute(input: &Path, symbols: Option<&Path>, config: Option<&Path>) -> anyhow::Result<()> {
    let compiled = super::compile(input, symbols, config)?;
    print!("{}", compiled.ir_listing());
    Ok(())
}
