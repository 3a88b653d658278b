//! Persistence reader/writer for the attribute text format.
//!
//! The format is a flat, attribute-bearing markup document: one root
//! `Storage` element carrying the identifier counter and the live item
//! count, and exactly that many self-closing `Item` children, one per item.
//! Values that fail the codec's clean-text rule travel base64-encoded under
//! the `x:`-prefixed form of their attribute key.

mod markup;
mod reader;
mod writer;

pub(crate) use reader::read_data;
pub(crate) use writer::write_data;

pub(crate) const ROOT_ELEMENT: &str = "Storage";
pub(crate) const ITEM_ELEMENT: &str = "Item";
pub(crate) const ATTR_LAST_ID: &str = "LastID";
pub(crate) const ATTR_ITEMS_COUNT: &str = "ItemsCount";
pub(crate) const ATTR_TYPE: &str = "Type";
pub(crate) const ATTR_ID: &str = "ID";
pub(crate) const ATTR_NAME: &str = "Name";

/// Prefix of the namespaced key a base64-encoded attribute is stored under.
pub(crate) const ENCODED_PREFIX: &str = "x:";

/// The namespaced key for a logical attribute name.
pub(crate) fn encoded_key(name: &str) -> String {
    format!("{ENCODED_PREFIX}{name}")
}
