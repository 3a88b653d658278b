//! Error types for store operations.

use thiserror::Error;

use stow_types::ItemId;

/// Errors produced by store and persistence operations.
///
/// Lookups and enumeration never produce these; absence is an `Option`
/// there. Every variant is permanent for the same input — there is no
/// transient class and nothing is retried internally.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The operation references an unregistered logical type name.
    #[error("type '{type_name}' is not registered")]
    UnknownType { type_name: String },

    /// An item with this name already exists within the type.
    #[error("item '{name}' of type '{type_name}' already exists")]
    DuplicateItem { type_name: String, name: String },

    /// An item with this identifier already exists.
    #[error("item with id {id} already exists")]
    DuplicateId { id: ItemId },

    /// A storable member of the item has no codec support.
    #[error("member '{member}' of item {item} has no codec support")]
    UnsupportedMember { item: ItemId, member: String },

    /// Attribute text failed to parse as the declared member kind.
    #[error("cannot parse member '{member}' of item {item} from '{text}': {reason}")]
    UnparsableValue {
        item: ItemId,
        member: String,
        text: String,
        reason: String,
    },

    /// Structural violation in persisted data.
    #[error("malformed storage data: {reason}")]
    Malformed { reason: String },

    /// I/O error from the underlying stream.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        StoreError::Malformed {
            reason: reason.into(),
        }
    }
}

/// Convenience alias for store results.
pub type StoreResult<T> = Result<T, StoreError>;
