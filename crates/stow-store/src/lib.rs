//! Dual-indexed record store with self-describing text persistence.
//!
//! A [`Storage`] holds live instances of any registered record shape and
//! keeps two consistent indices over them: identifier to item and
//! (type, name) to item. Persistence walks the registered shapes' member
//! tables instead of per-type codecs, so any shape implementing the
//! [`Record`](stow_types::Record) contract saves and loads without its own
//! serialization code.
//!
//! # Components
//!
//! - [`TypeRegistry`] — logical type names bound to record shapes, with
//!   the storable member list computed once per registration
//! - [`Storage`] — the item store: creation, lookup, rename, delete,
//!   enumeration, and the identifier counter
//! - [`StorageItem`] — one live item: base capability plus record data
//! - persistence — `write_data`/`read_data` on [`Storage`], emitting and
//!   reconstructing the attribute text format
//!
//! # Concurrency
//!
//! None internal. Mutation requires exclusive access to the instance;
//! callers needing shared access serialize externally. Enumeration takes a
//! read-only snapshot view and must not be interleaved with mutation.

pub mod error;
pub mod item;
mod persist;
pub mod registry;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use item::StorageItem;
pub use registry::{
    RegisteredType, TypeRegistry, UnsupportedPolicy, INTERNAL_PREFIX, RESERVED_NAMES,
};
pub use store::Storage;
