use thiserror::Error;

use crate::value::FieldKind;

/// Errors produced when reading or writing record members by name.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FieldError {
    /// The record declares no member under this name.
    #[error("no such field: {0}")]
    NoSuchField(String),

    /// The value's kind does not match the member's declared kind.
    #[error("field '{field}' expects {expected}, got {got}")]
    KindMismatch {
        field: String,
        expected: FieldKind,
        got: FieldKind,
    },

    /// A self-describing scalar rejected the text it was given.
    #[error("field '{field}': {message}")]
    Parse { field: String, message: String },
}
