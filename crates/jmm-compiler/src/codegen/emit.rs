//! Opcode selection
//!
//! Picks the most compact Jasmin opcode for constants, local loads/stores,
//! array access and returns.

use crate::error::{CompileError, CompileResult};
use crate::ir::BinaryOp;
use crate::symbols::Type;

/// Push an int constant.
pub fn push_int(value: i32) -> String {
    match value {
        -1 => "iconst_m1".to_string(),
        0..=5 => format!("iconst_{}", value),
        -128..=127 => format!("bipush {}", value),
        -32768..=32767 => format!("sipush {}", value),
        _ => format!("ldc {}", value),
    }
}

pub fn push_bool(value: bool) -> &'static str {
    if value {
        "iconst_1"
    } else {
        "iconst_0"
    }
}

/// `i` for int and boolean, `a` for references.
fn category(ty: &Type) -> CompileResult<char> {
    if ty.is_void() {
        return Err(CompileError::unsupported("void value on the operand stack"));
    }
    Ok(if ty.is_int_like() { 'i' } else { 'a' })
}

/// `iload_2`, `aload 7`, ...
fn slot_op(prefix: char, op: &str, slot: u16) -> String {
    if slot <= 3 {
        format!("{}{}_{}", prefix, op, slot)
    } else {
        format!("{}{} {}", prefix, op, slot)
    }
}

pub fn load(ty: &Type, slot: u16) -> CompileResult<String> {
    Ok(slot_op(category(ty)?, "load", slot))
}

pub fn store(ty: &Type, slot: u16) -> CompileResult<String> {
    Ok(slot_op(category(ty)?, "store", slot))
}

/// `ireturn`, `areturn`, or `return` for void.
pub fn return_op(ty: &Type) -> CompileResult<&'static str> {
    if ty.is_void() {
        return Ok("return");
    }
    Ok(match category(ty)? {
        'i' => "ireturn",
        _ => "areturn",
    })
}

pub fn array_load(elem: &Type) -> &'static str {
    if elem.is_int() {
        "iaload"
    } else if elem.is_boolean() {
        "baload"
    } else {
        "aaload"
    }
}

pub fn array_store(elem: &Type) -> &'static str {
    if elem.is_int() {
        "iastore"
    } else if elem.is_boolean() {
        "bastore"
    } else {
        "aastore"
    }
}

/// Single-opcode binary operations; comparisons have none.
pub fn binary_op(op: BinaryOp) -> Option<&'static str> {
    match op {
        BinaryOp::Add => Some("iadd"),
        BinaryOp::Sub => Some("isub"),
        BinaryOp::Mul => Some("imul"),
        BinaryOp::Div => Some("idiv"),
        BinaryOp::And => Some("iand"),
        _ => None,
    }
}

/// The `iinc` operand for `x := x + k` / `x := x - k`, when it fits.
pub fn iinc_delta(op: BinaryOp, constant: i32) -> Option<i8> {
    let delta = match op {
        BinaryOp::Add => Some(constant),
        BinaryOp::Sub => constant.checked_neg(),
        _ => None,
    }?;
    i8::try_from(delta).ok()
}
