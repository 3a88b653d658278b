//! Foundation types for stow, the self-describing record store.
//!
//! This crate provides the types every other stow crate builds on: item
//! identity, the scalar value model, and the capability contract a record
//! shape implements so the store can enumerate and persist its members
//! without per-type serialization code.
//!
//! # Key Types
//!
//! - [`ItemId`] — store-issued identifier, strictly increasing, never reused
//! - [`Value`] / [`FieldKind`] — the scalar value model the codec understands
//! - [`Record`] — the capability contract of a registrable record shape
//! - [`ShapeDescriptor`] / [`FieldSpec`] — a shape's declared member table
//! - [`TextScalar`] — the self-describing scalar extension point
//! - [`define_record!`](crate::define_record) — declarative record definitions

pub mod error;
pub mod id;
pub mod macros;
pub mod record;
pub mod value;

pub use error::FieldError;
pub use id::ItemId;
pub use record::{BuiltinScalar, FieldSpec, Record, ShapeDescriptor, TextScalar};
pub use value::{FieldKind, Value};
