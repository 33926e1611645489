//! Compiler options
//!
//! Output formatting knobs. Loadable from TOML:
//!
//! ```toml
//! indent = "  "
//! root_class = "java/lang/Object"
//! emit_comments = false
//! ```

use crate::error::{CompileError, CompileResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompilerOptions {
    /// Prefix for every instruction line inside a method body
    pub indent: String,
    /// Superclass used when the class declares none
    pub root_class: String,
    /// Emit `;` comment lines in the Jasmin output
    pub emit_comments: bool,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            indent: "   ".to_string(),
            root_class: "java/lang/Object".to_string(),
            emit_comments: true,
        }
    }
}

impl CompilerOptions {
    pub fn from_toml_str(source: &str) -> CompileResult<Self> {
        let options: CompilerOptions = toml::from_str(source).map_err(|e| CompileError::Config {
            message: e.to_string(),
        })?;
        options.validate()?;
        Ok(options)
    }

    fn validate(&self) -> CompileResult<()> {
        if !self.indent.chars().all(|c| c == ' ' || c == '\t') {
            return Err(CompileError::Config {
                message: "indent may only contain spaces and tabs".to_string(),
            });
        }
        if self.root_class.is_empty() || self.root_class.contains('.') {
            return Err(CompileError::Config {
                message: format!(
                    "root_class must be a slash-separated class name, got `{}`",
                    self.root_class
                ),
            });
        }
        Ok(())
    }
}
