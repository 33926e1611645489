//! Control flow and comparisons
//!
//! The JVM has no instruction that turns a comparison into a boolean, so each
//! relational operator becomes a small branch diamond with its own label pair.

use super::frame::MethodFrame;
use crate::error::CompileResult;
use crate::ir::BinaryOp;

/// Per-comparison-kind label counters for one compilation unit.
#[derive(Debug, Default)]
pub struct CompareLabels {
    counters: [u32; 6],
}

impl CompareLabels {
    /// Branch opcode and label prefix of a comparison.
    fn kind(op: BinaryOp) -> Option<(usize, &'static str, &'static str)> {
        let kind = match op {
            BinaryOp::Less => (0, "iflt", "lessThan"),
            BinaryOp::LessEqual => (1, "ifle", "lessEqual"),
            BinaryOp::Greater => (2, "ifgt", "greaterThan"),
            BinaryOp::GreaterEqual => (3, "ifge", "greaterEqual"),
            BinaryOp::Equal => (4, "ifeq", "equal"),
            BinaryOp::NotEqual => (5, "ifne", "notEqual"),
            _ => return None,
        };
        Some(kind)
    }

    fn next(&mut self, index: usize) -> u32 {
        let n = self.counters[index];
        self.counters[index] += 1;
        n
    }
}

/// Turn the two ints on top of the stack into 0/1.
///
/// ```text
/// isub
/// iflt lessThan0
/// iconst_0
/// goto lessThanEnd0
/// lessThan0:
/// iconst_1
/// lessThanEnd0:
/// ```
pub fn emit_comparison(
    frame: &mut MethodFrame,
    labels: &mut CompareLabels,
    op: BinaryOp,
) -> CompileResult<bool> {
    let Some((index, branch, prefix)) = CompareLabels::kind(op) else {
        return Ok(false);
    };
    let n = labels.next(index);
    let true_label = format!("{}{}", prefix, n);
    let end_label = format!("{}End{}", prefix, n);

    frame.emit("isub");
    frame.pop(1)?;
    frame.emit(format!("{} {}", branch, true_label));
    frame.pop(1)?;
    frame.emit("iconst_0");
    frame.push(1);
    frame.emit(format!("goto {}", end_label));
    frame.emit_label(&true_label);
    // the other path pushes the same single value
    frame.emit("iconst_1");
    frame.emit_label(&end_label);
    Ok(true)
}

pub fn emit_goto(frame: &mut MethodFrame, label: &str) {
    frame.emit(format!("goto {}", label));
}

/// Pops the condition already on the stack.
pub fn emit_cond_goto(frame: &mut MethodFrame, label: &str) -> CompileResult<()> {
    frame.emit(format!("ifne {}", label));
    frame.pop(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::IrMethod;
    use crate::symbols::Type;

    #[test]
    fn test_comparison_diamond() {
        let method = IrMethod::new("f", Type::boolean());
        let mut frame = MethodFrame::new(&method, "").expect("frame");
        let mut labels = CompareLabels::default();
        frame.push(2);

        assert!(emit_comparison(&mut frame, &mut labels, BinaryOp::Less).expect("emits"));
        assert_eq!(frame.depth(), 1);
        assert_eq!(
            frame.into_lines(),
            vec![
                "isub",
                "iflt lessThan0",
                "iconst_0",
                "goto lessThanEnd0",
                "lessThan0:",
                "iconst_1",
                "lessThanEnd0:",
            ]
        );
    }

    #[test]
    fn test_counters_are_per_kind() {
        let method = IrMethod::new("f", Type::boolean());
        let mut frame = MethodFrame::new(&method, "").expect("frame");
        let mut labels = CompareLabels::default();
        for op in [BinaryOp::Equal, BinaryOp::Equal, BinaryOp::NotEqual] {
            frame.push(2);
            emit_comparison(&mut frame, &mut labels, op).expect("emits");
            frame.pop(1).expect("pop");
        }
        let lines = frame.into_lines();
        assert!(lines.contains(&"equal1:".to_string()));
        assert!(lines.contains(&"notEqual0:".to_string()));
    }

    #[test]
    fn test_arithmetic_is_not_a_comparison() {
        let method = IrMethod::new("f", Type::int());
        let mut frame = MethodFrame::new(&method, "").expect("frame");
        let mut labels = CompareLabels::default();
        assert!(!emit_comparison(&mut frame, &mut labels, BinaryOp::Add).expect("ok"));
        assert!(frame.into_lines().is_empty());
    }
}
