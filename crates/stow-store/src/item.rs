//! One live instance of a registered record shape.

use std::fmt;

use stow_types::{ItemId, Record};

/// An item owned by a [`Storage`](crate::Storage).
///
/// The base capability (identifier, name, logical type name) lives here;
/// the member data lives in the boxed record. The identifier and type name
/// are fixed at creation. The name is mutable, but only through
/// [`Storage::try_rename_item`](crate::Storage::try_rename_item), so the
/// (type, name) index always moves in lock-step with it.
pub struct StorageItem {
    id: ItemId,
    name: String,
    type_name: String,
    record: Box<dyn Record>,
}

impl StorageItem {
    pub(crate) fn new(
        id: ItemId,
        name: String,
        type_name: String,
        record: Box<dyn Record>,
    ) -> Self {
        Self {
            id,
            name,
            type_name,
            record,
        }
    }

    /// The store-issued identifier. Immutable.
    pub fn id(&self) -> ItemId {
        self.id
    }

    /// The current name, unique within items of the same logical type.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The logical type name the item was created under. Immutable.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// The record data behind the capability contract.
    pub fn record(&self) -> &dyn Record {
        &*self.record
    }

    /// Mutable access to the record data.
    pub fn record_mut(&mut self) -> &mut dyn Record {
        &mut *self.record
    }

    /// Typed view of the record, if the shape is `T`.
    pub fn downcast_ref<T: Record>(&self) -> Option<&T> {
        self.record.as_any().downcast_ref::<T>()
    }

    /// Typed mutable view of the record, if the shape is `T`.
    pub fn downcast_mut<T: Record>(&mut self) -> Option<&mut T> {
        self.record.as_any_mut().downcast_mut::<T>()
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }
}

impl fmt::Debug for StorageItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageItem")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("type_name", &self.type_name)
            .finish()
    }
}
