//! Serializes the full item set to the attribute text format.

use std::io::Write;

use tracing::debug;

use stow_codec::{render, AttrText};
use stow_types::FieldKind;

use crate::error::{StoreError, StoreResult};
use crate::persist::markup::ElementWriter;
use crate::persist::{
    encoded_key, ATTR_ID, ATTR_ITEMS_COUNT, ATTR_LAST_ID, ATTR_NAME, ATTR_TYPE, ITEM_ELEMENT,
    ROOT_ELEMENT,
};
use crate::store::Storage;

/// Write one attribute, picking the plain or the namespaced encoded key per
/// the clean-text rule.
fn push_attr(attrs: &mut Vec<(String, String)>, name: &str, raw: &str) {
    match AttrText::from_raw(raw) {
        AttrText::Plain(value) => attrs.push((name.to_string(), value)),
        AttrText::Encoded(value) => attrs.push((encoded_key(name), value)),
    }
}

pub(crate) fn write_data<W: Write>(store: &Storage, sink: W) -> StoreResult<()> {
    let mut out = ElementWriter::new(sink);

    let mut root_attrs = Vec::new();
    push_attr(&mut root_attrs, ATTR_LAST_ID, &store.last_id().to_string());
    push_attr(&mut root_attrs, ATTR_ITEMS_COUNT, &store.len().to_string());
    out.open(ROOT_ELEMENT, &root_attrs)?;

    for item in store.items() {
        let registered =
            store
                .type_by_name(item.type_name())
                .ok_or_else(|| StoreError::UnknownType {
                    type_name: item.type_name().to_string(),
                })?;

        let mut attrs = Vec::new();
        push_attr(&mut attrs, ATTR_TYPE, item.type_name());
        push_attr(&mut attrs, ATTR_ID, &item.id().to_string());
        push_attr(&mut attrs, ATTR_NAME, item.name());

        for spec in registered.fields() {
            if spec.kind == FieldKind::Opaque {
                return Err(StoreError::UnsupportedMember {
                    item: item.id(),
                    member: spec.name.clone(),
                });
            }
            let value = item.record().get(&spec.name).ok_or_else(|| {
                StoreError::malformed(format!(
                    "item {} does not expose member '{}'",
                    item.id(),
                    spec.name
                ))
            })?;
            push_attr(&mut attrs, &spec.name, &render(&value));
        }
        out.empty(ITEM_ELEMENT, &attrs)?;
    }

    out.close(ROOT_ELEMENT)?;
    debug!(items = store.len(), "wrote storage data");
    Ok(())
}
