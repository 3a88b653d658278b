//! Reconstructs the item set from the attribute text format.

use std::io::Read;

use tracing::debug;

use stow_codec::{decode_text, parse};
use stow_types::{FieldKind, FieldSpec, ItemId};

use crate::error::{StoreError, StoreResult};
use crate::persist::markup::{parse_document, Element};
use crate::persist::{
    encoded_key, ATTR_ID, ATTR_ITEMS_COUNT, ATTR_LAST_ID, ATTR_NAME, ATTR_TYPE, ITEM_ELEMENT,
    ROOT_ELEMENT,
};
use crate::store::Storage;

pub(crate) fn read_data<R: Read>(store: &mut Storage, mut source: R) -> StoreResult<()> {
    store.clear_items();
    let result = read_into(store, &mut source);
    if result.is_err() {
        // Never leave the store half-populated.
        store.clear_items();
    }
    result
}

fn read_into<R: Read>(store: &mut Storage, source: &mut R) -> StoreResult<()> {
    let mut input = String::new();
    source.read_to_string(&mut input)?;

    let (root, children) = parse_document(&input)?;
    if root.name != ROOT_ELEMENT {
        return Err(StoreError::malformed(format!(
            "expected root element '{ROOT_ELEMENT}', found '{}'",
            root.name
        )));
    }
    let last_id = parse_counter(&root, ATTR_LAST_ID)?;
    let items_count = parse_counter(&root, ATTR_ITEMS_COUNT)?;
    if children.len() as u64 != items_count {
        return Err(StoreError::malformed(format!(
            "{ATTR_ITEMS_COUNT} declares {items_count} items, found {}",
            children.len()
        )));
    }
    store.set_last_id(last_id);

    for (index, element) in children.iter().enumerate() {
        if element.name != ITEM_ELEMENT {
            return Err(StoreError::malformed(format!(
                "unexpected element '{}' at item #{index}",
                element.name
            )));
        }
        read_item(store, element, index)?;
    }
    debug!(items = store.len(), "read storage data");
    Ok(())
}

fn parse_counter(root: &Element, attr: &str) -> StoreResult<u64> {
    let text = root.attr(attr).ok_or_else(|| {
        StoreError::malformed(format!("root element has no {attr} attribute"))
    })?;
    text.parse::<u64>()
        .map_err(|_| StoreError::malformed(format!("root element has wrong {attr} attribute")))
}

fn read_item(store: &mut Storage, element: &Element, index: usize) -> StoreResult<()> {
    let type_name = element
        .attr(ATTR_TYPE)
        .ok_or_else(|| StoreError::malformed(format!("item #{index} has no Type attribute")))?
        .to_string();
    let id: ItemId = element
        .attr(ATTR_ID)
        .ok_or_else(|| StoreError::malformed(format!("item #{index} has no ID attribute")))?
        .parse()
        .map_err(|_| StoreError::malformed(format!("item #{index} has wrong ID attribute")))?;
    let name = match element.attr(ATTR_NAME) {
        Some(plain) => plain.to_string(),
        None => {
            let encoded = element.attr(&encoded_key(ATTR_NAME)).ok_or_else(|| {
                StoreError::malformed(format!("item #{index} has no Name attribute"))
            })?;
            decode_text(encoded).map_err(|e| {
                StoreError::malformed(format!("item #{index} has undecodable Name: {e}"))
            })?
        }
    };

    // Same instantiation path as create_item, with the persisted id.
    store.insert_item(&type_name, &name, id)?;
    let fields: Vec<FieldSpec> = store
        .type_by_name(&type_name)
        .map(|t| t.fields().to_vec())
        .unwrap_or_default();
    let item = store.item_by_id_mut(id).expect("item was just inserted");

    for spec in &fields {
        if spec.kind == FieldKind::Opaque {
            return Err(StoreError::UnsupportedMember {
                item: id,
                member: spec.name.clone(),
            });
        }
        let text = match element.attr(&spec.name) {
            Some(plain) => plain.to_string(),
            None => match element.attr(&encoded_key(&spec.name)) {
                Some(encoded) => decode_text(encoded).map_err(|e| StoreError::UnparsableValue {
                    item: id,
                    member: spec.name.clone(),
                    text: encoded.to_string(),
                    reason: e.to_string(),
                })?,
                None => {
                    return Err(StoreError::malformed(format!(
                        "can't find attribute '{}' in item with id {id}",
                        spec.name
                    )));
                }
            },
        };
        let value = parse(&text, spec.kind).map_err(|e| StoreError::UnparsableValue {
            item: id,
            member: spec.name.clone(),
            text: text.clone(),
            reason: e.to_string(),
        })?;
        item.record_mut()
            .set(&spec.name, value)
            .map_err(|e| StoreError::UnparsableValue {
                item: id,
                member: spec.name.clone(),
                text,
                reason: e.to_string(),
            })?;
    }
    Ok(())
}
