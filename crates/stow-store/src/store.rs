//! The dual-indexed item store.
//!
//! A [`Storage`] owns its items and keeps two indices over them: identifier
//! to item, and (type, name) to item. Every mutation touches both indices
//! in the same call, so for every live item exactly one entry exists in
//! each. The identifier counter only ever moves forward; deletion never
//! reclaims ids.
//!
//! There is no internal locking. All mutating operations require exclusive
//! access to the instance, and callers needing concurrency serialize
//! externally — including across check-then-create sequences that must
//! appear atomic.

use std::collections::HashMap;
use std::io;

use indexmap::IndexMap;
use tracing::debug;

use stow_types::{ItemId, Record};

use crate::error::{StoreError, StoreResult};
use crate::item::StorageItem;
use crate::persist;
use crate::registry::{RegisteredType, TypeRegistry, UnsupportedPolicy};

/// In-memory store of record items, generic over every registered shape.
pub struct Storage {
    last_id: u64,
    registry: TypeRegistry,
    by_id: IndexMap<ItemId, StorageItem>,
    by_name: HashMap<String, IndexMap<String, ItemId>>,
}

impl Storage {
    /// An empty store with the default unsupported-member policy.
    pub fn new() -> Self {
        Self::with_policy(UnsupportedPolicy::default())
    }

    /// An empty store with an explicit unsupported-member policy.
    pub fn with_policy(policy: UnsupportedPolicy) -> Self {
        Self {
            last_id: 0,
            registry: TypeRegistry::with_policy(policy),
            by_id: IndexMap::new(),
            by_name: HashMap::new(),
        }
    }

    // -------------------------------------------------------------------
    // Types
    // -------------------------------------------------------------------

    /// Register the shape `T` under a logical type name.
    ///
    /// Returns `false` if the name is already bound or the shape is already
    /// registered under another name.
    pub fn register_type<T: Record + Default + 'static>(&mut self, name: &str) -> bool {
        let registered = self.registry.register::<T>(name);
        if registered {
            self.by_name.entry(name.to_string()).or_default();
            debug!(type_name = name, "registered record type");
        }
        registered
    }

    /// Resolve a logical type name to its registration.
    pub fn type_by_name(&self, name: &str) -> Option<&RegisteredType> {
        self.registry.get(name)
    }

    /// The registration behind an item's logical type name.
    pub fn shape_of(&self, item: &StorageItem) -> Option<&RegisteredType> {
        self.registry.get(item.type_name())
    }

    /// The type registry.
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    // -------------------------------------------------------------------
    // Identifiers
    // -------------------------------------------------------------------

    /// Issue the next identifier.
    ///
    /// Identifiers are strictly increasing and never reused, even after
    /// deletion. Only [`clear_items`](Storage::clear_items) resets the
    /// counter.
    pub fn next_id(&mut self) -> ItemId {
        self.last_id += 1;
        ItemId::new(self.last_id)
    }

    /// The last identifier issued.
    pub fn last_id(&self) -> ItemId {
        ItemId::new(self.last_id)
    }

    pub(crate) fn set_last_id(&mut self, raw: u64) {
        self.last_id = raw;
    }

    // -------------------------------------------------------------------
    // Item lifecycle
    // -------------------------------------------------------------------

    /// Create an item of a registered type.
    ///
    /// Fails with [`StoreError::UnknownType`] if the type is unregistered
    /// and [`StoreError::DuplicateItem`] if the (type, name) pair is taken.
    /// No identifier is consumed on failure.
    pub fn create_item(&mut self, type_name: &str, name: &str) -> StoreResult<&mut StorageItem> {
        if self.registry.get(type_name).is_none() {
            return Err(StoreError::UnknownType {
                type_name: type_name.to_string(),
            });
        }
        if self.item_by_name(type_name, name).is_some() {
            return Err(StoreError::DuplicateItem {
                type_name: type_name.to_string(),
                name: name.to_string(),
            });
        }
        let id = self.next_id();
        self.insert_item(type_name, name, id)
    }

    /// Shared insertion routine for both creation paths: API creation and
    /// persistence reload. Checks both indices before touching either, so
    /// a failure leaves the store unchanged.
    pub(crate) fn insert_item(
        &mut self,
        type_name: &str,
        name: &str,
        id: ItemId,
    ) -> StoreResult<&mut StorageItem> {
        let registered =
            self.registry
                .get(type_name)
                .ok_or_else(|| StoreError::UnknownType {
                    type_name: type_name.to_string(),
                })?;
        let record = registered.instantiate();
        if self.by_id.contains_key(&id) {
            return Err(StoreError::DuplicateId { id });
        }
        if self.item_by_name(type_name, name).is_some() {
            return Err(StoreError::DuplicateItem {
                type_name: type_name.to_string(),
                name: name.to_string(),
            });
        }
        self.by_id.insert(
            id,
            StorageItem::new(id, name.to_string(), type_name.to_string(), record),
        );
        self.by_name
            .entry(type_name.to_string())
            .or_default()
            .insert(name.to_string(), id);
        debug!(%id, type_name, name, "created item");
        Ok(self.by_id.get_mut(&id).expect("item was just inserted"))
    }

    /// Rename an item if the new name is free within its type.
    ///
    /// Returns `false` without mutation if the item is not live here or the
    /// name already occupies a slot in the type bucket. An empty new name
    /// is a successful no-op: the current name is retained. The identifier
    /// index is untouched either way — identity persists by id, not name.
    pub fn try_rename_item(&mut self, id: ItemId, new_name: &str) -> bool {
        let Some(item) = self.by_id.get(&id) else {
            return false;
        };
        if new_name.is_empty() {
            return true;
        }
        let type_name = item.type_name().to_string();
        let old_name = item.name().to_string();
        let Some(bucket) = self.by_name.get_mut(&type_name) else {
            return false;
        };
        if bucket.contains_key(new_name) {
            return false;
        }
        bucket.shift_remove(&old_name);
        bucket.insert(new_name.to_string(), id);
        self.by_id
            .get_mut(&id)
            .expect("item is live")
            .set_name(new_name.to_string());
        debug!(%id, from = %old_name, to = new_name, "renamed item");
        true
    }

    /// Delete an item. A no-op if the id is not live in this store.
    ///
    /// Removes both index entries; the identifier counter is not touched.
    pub fn delete_item(&mut self, id: ItemId) {
        let Some(item) = self.by_id.shift_remove(&id) else {
            return;
        };
        if let Some(bucket) = self.by_name.get_mut(item.type_name()) {
            bucket.shift_remove(item.name());
        }
        debug!(%id, "deleted item");
    }

    /// Remove every item and reset the identifier counter to zero.
    ///
    /// Type registrations survive. Used before a full reload, never as a
    /// partial clear.
    pub fn clear_items(&mut self) {
        self.by_id.clear();
        for bucket in self.by_name.values_mut() {
            bucket.clear();
        }
        self.last_id = 0;
        debug!("cleared all items");
    }

    // -------------------------------------------------------------------
    // Lookups and enumeration
    // -------------------------------------------------------------------

    /// Look up an item by identifier. Never fails; absence is `None`.
    pub fn item_by_id(&self, id: ItemId) -> Option<&StorageItem> {
        self.by_id.get(&id)
    }

    /// Mutable lookup by identifier.
    pub fn item_by_id_mut(&mut self, id: ItemId) -> Option<&mut StorageItem> {
        self.by_id.get_mut(&id)
    }

    /// Look up an item by logical type and name. Never fails.
    pub fn item_by_name(&self, type_name: &str, name: &str) -> Option<&StorageItem> {
        let id = self.by_name.get(type_name)?.get(name)?;
        self.by_id.get(id)
    }

    /// Mutable lookup by logical type and name.
    pub fn item_by_name_mut(&mut self, type_name: &str, name: &str) -> Option<&mut StorageItem> {
        let id = *self.by_name.get(type_name)?.get(name)?;
        self.by_id.get_mut(&id)
    }

    /// All live items, in insertion order of the identifier index.
    pub fn items(&self) -> impl Iterator<Item = &StorageItem> {
        self.by_id.values()
    }

    /// All live items of one logical type, in insertion order of the type's
    /// name bucket.
    pub fn items_of_type<'a>(
        &'a self,
        type_name: &str,
    ) -> impl Iterator<Item = &'a StorageItem> + 'a {
        self.by_name
            .get(type_name)
            .into_iter()
            .flat_map(|bucket| bucket.values())
            .filter_map(|id| self.by_id.get(id))
    }

    /// Number of live items.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Returns `true` if no items are live.
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    // -------------------------------------------------------------------
    // Persistence
    // -------------------------------------------------------------------

    /// Serialize the full item set to a sink in the attribute text format.
    pub fn write_data<W: io::Write>(&self, sink: W) -> StoreResult<()> {
        persist::write_data(self, sink)
    }

    /// Reconstruct the item set from a source in the attribute text format.
    ///
    /// Destructive: all existing items are cleared first — this is a full
    /// reload, not a merge. On any failure the store is reset to empty, so
    /// a half-populated store is never observable.
    pub fn read_data<R: io::Read>(&mut self, source: R) -> StoreResult<()> {
        persist::read_data(self, source)
    }
}

impl Default for Storage {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage")
            .field("last_id", &self.last_id)
            .field("items", &self.by_id.len())
            .field("types", &self.registry.len())
            .finish()
    }
}
