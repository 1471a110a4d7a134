use thiserror::Error;

use crate::property::value_type::ValueType;

/// Errors reported by property creation and the typed accessors.
///
/// Every failure is synchronous and caller-correctable; the record involved
/// is left observably unchanged. Two error kinds of the original C interface
/// have no Rust counterpart: null arguments are unrepresentable, and unknown
/// type codes are ruled out by the closed [`ValueType`] enum.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyError {
    #[error("property name must not be empty")]
    EmptyName,

    #[error("element count must be positive")]
    IllegalSize,

    #[error("property has type `{found}`, accessor expects `{expected}`")]
    TypeMismatch {
        expected: ValueType,
        found: ValueType,
    },
}

impl PropertyError {
    pub fn mismatch(expected: ValueType, found: ValueType) -> PropertyError {
        PropertyError::TypeMismatch { expected, found }
    }
}
