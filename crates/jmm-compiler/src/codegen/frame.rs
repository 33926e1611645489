//! Per-method emission state
//!
//! Tracks the simulated operand-stack depth, its running maximum and the
//! local-variable slot table. A frame is created for one method and dropped
//! with it; nothing carries over between methods.

use crate::error::{CompileError, CompileResult};
use crate::ir::IrMethod;
use rustc_hash::FxHashMap;

/// JVM limit on local variable slots
const MAX_LOCALS: usize = u16::MAX as usize;

pub struct MethodFrame {
    method: String,
    depth: u32,
    max_depth: u32,
    /// Variable name to slot
    slots: FxHashMap<String, u16>,
    slot_count: u16,
    indent: String,
    lines: Vec<String>,
}

impl MethodFrame {
    /// Build the slot table: `this` (instance methods), then parameters,
    /// declared locals and temporaries in order.
    pub fn new(method: &IrMethod, indent: &str) -> CompileResult<Self> {
        let mut frame = Self {
            method: method.name.clone(),
            depth: 0,
            max_depth: 0,
            slots: FxHashMap::default(),
            slot_count: 0,
            indent: indent.to_string(),
            lines: Vec::new(),
        };

        if !method.is_static {
            frame.bind("this")?;
        }
        for variable in method.variables() {
            frame.bind(&variable.name)?;
        }
        Ok(frame)
    }

    fn bind(&mut self, name: &str) -> CompileResult<()> {
        if self.slots.len() >= MAX_LOCALS {
            return Err(CompileError::TooManyLocals {
                method: self.method.clone(),
            });
        }
        let slot = self.slot_count;
        if self.slots.insert(name.to_string(), slot).is_some() {
            return Err(CompileError::internal(format!(
                "variable `{}` declared twice in method {}",
                name, self.method
            )));
        }
        self.slot_count += 1;
        Ok(())
    }

    pub fn slot(&self, name: &str) -> CompileResult<u16> {
        self.slots
            .get(name)
            .copied()
            .ok_or_else(|| CompileError::UnresolvedSymbol {
                name: name.to_string(),
                method: self.method.clone(),
            })
    }

    pub fn push(&mut self, count: u32) {
        self.depth += count;
        self.max_depth = self.max_depth.max(self.depth);
    }

    pub fn pop(&mut self, count: u32) -> CompileResult<()> {
        self.depth = self
            .depth
            .checked_sub(count)
            .ok_or_else(|| CompileError::StackUnderflow {
                method: self.method.clone(),
            })?;
        Ok(())
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// `.limit stack`
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// `.limit locals`
    pub fn locals(&self) -> u16 {
        self.slot_count
    }

    pub fn emit(&mut self, line: impl AsRef<str>) {
        self.lines.push(format!("{}{}", self.indent, line.as_ref()));
    }

    pub fn emit_label(&mut self, label: &str) {
        self.lines.push(format!("{}:", label));
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}
