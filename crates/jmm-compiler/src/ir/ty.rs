//! IR type suffixes
//!
//! Every IR value is printed as `name.suffix`; the suffix is derived from the
//! source type alone.

use crate::symbols::{Type, BOOLEAN, INT, STRING, VOID};

/// Suffix of a non-array type name.
fn base_suffix(name: &str) -> &str {
    match name {
        INT => "i32",
        BOOLEAN => "bool",
        VOID => "V",
        STRING => "string",
        class => class,
    }
}

/// `int` -> `i32`, `int[]` -> `array.i32`, `Foo` -> `Foo`.
///
/// Vararg parameters are arrays at the IR level and share the array suffix.
pub fn type_suffix(ty: &Type) -> String {
    if ty.is_array {
        format!("array.{}", base_suffix(&ty.name))
    } else {
        base_suffix(&ty.name).to_string()
    }
}
