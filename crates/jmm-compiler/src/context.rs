//! Per-compilation name allocation
//!
//! Temporaries and branch labels are numbered from counters owned by one
//! [`CompilationContext`]. A context lives exactly as long as one compilation
//! unit, so independent units can be compiled in parallel without sharing
//! state, and recompiling the same input always yields the same names.

use tracing::trace;

/// Kinds of compiler-generated labels, each with its own counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabelKind {
    IfThen,
    IfEnd,
    WhileCond,
    WhileEnd,
}

impl LabelKind {
    fn prefix(&self) -> &'static str {
        match self {
            LabelKind::IfThen => "ifThen",
            LabelKind::IfEnd => "ifEnd",
            LabelKind::WhileCond => "whileCond",
            LabelKind::WhileEnd => "whileEnd",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

#[derive(Debug, Default)]
pub struct CompilationContext {
    next_temp: u32,
    next_label: [u32; 4],
}

impl CompilationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh temporary name: `tmp0`, `tmp1`, ...
    pub fn new_temp(&mut self) -> String {
        let name = format!("tmp{}", self.next_temp);
        self.next_temp += 1;
        trace!(temp = %name, "allocated temporary");
        name
    }

    /// Fresh label of the given kind: `ifThen0`, `whileEnd3`, ...
    ///
    /// Numbering never repeats within one context, so nested constructs of
    /// the same kind get distinct labels.
    pub fn new_label(&mut self, kind: LabelKind) -> String {
        let counter = &mut self.next_label[kind.index()];
        let label = format!("{}{}", kind.prefix(), counter);
        *counter += 1;
        label
    }

    /// Allocate the label pair of one `if`: (then, end), sharing a number.
    pub fn if_labels(&mut self) -> (String, String) {
        (self.new_label(LabelKind::IfThen), self.new_label(LabelKind::IfEnd))
    }

    /// Allocate the label pair of one `while`: (cond, end), sharing a number.
    pub fn while_labels(&mut self) -> (String, String) {
        (
            self.new_label(LabelKind::WhileCond),
            self.new_label(LabelKind::WhileEnd),
        )
    }

    pub fn temps_allocated(&self) -> u32 {
        self.next_temp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temps_are_monotonic() {
        let mut ctx = CompilationContext::new();
        assert_eq!(ctx.new_temp(), "tmp0");
        assert_eq!(ctx.new_temp(), "tmp1");
        assert_eq!(ctx.temps_allocated(), 2);
    }

    #[test]
    fn test_label_kinds_count_independently() {
        let mut ctx = CompilationContext::new();
        assert_eq!(ctx.if_labels(), ("ifThen0".to_string(), "ifEnd0".to_string()));
        assert_eq!(
            ctx.while_labels(),
            ("whileCond0".to_string(), "whileEnd0".to_string())
        );
        assert_eq!(ctx.if_labels(), ("ifThen1".to_string(), "ifEnd1".to_string()));
    }

    #[test]
    fn test_fresh_contexts_are_isolated() {
        let mut a = CompilationContext::new();
        a.new_temp();
        a.new_label(LabelKind::WhileCond);
        let mut b = CompilationContext::new();
        assert_eq!(b.new_temp(), "tmp0");
        assert_eq!(b.new_label(LabelKind::WhileCond), "whileCond0");
    }
}
