use thiserror::Error;

use stow_types::FieldKind;

/// Errors produced by the value codec.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    /// Attribute text does not parse as the declared kind.
    #[error("cannot parse {kind} from '{text}'")]
    Unparsable { kind: FieldKind, text: String },

    /// An encoded attribute is not valid base64.
    #[error("invalid base64 in encoded attribute: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    /// An encoded attribute does not decode as UTF-16.
    #[error("encoded attribute is not valid UTF-16")]
    InvalidUtf16,

    /// The member kind has no codec support.
    #[error("member kind has no codec support")]
    Unsupported,
}

/// Convenience alias for codec results.
pub type CodecResult<T> = Result<T, CodecError>;
