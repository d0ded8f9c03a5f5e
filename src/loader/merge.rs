//! Collection/merge policy for inserting a key into an in-progress mapping,
//! and the deep-merge rule shared by `mergeduplicateblocks` and
//! `defaultconfig` finalization.

use indexmap::IndexMap;

use crate::errors::{Error, Result};
use crate::value::Value;

/// Whether the value being inserted came from a `Block` (mapping) or an
/// `Option` (scalar/list/table-via-flagbits) — the collection policy treats
/// duplicate blocks and duplicate options under separate toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Block,
    Option,
}

#[allow(clippy::too_many_arguments)]
pub fn insert(
    map: &mut IndexMap<String, Value>,
    key: String,
    value: Value,
    origin: Origin,
    allowmultioptions: bool,
    mergeduplicateblocks: bool,
    mergeduplicateoptions: bool,
    source_id: &str,
    line: usize,
) -> Result<()> {
    if !map.contains_key(&key) {
        map.insert(key, value);
        return Ok(());
    }

    let merge_this = match origin {
        Origin::Block => mergeduplicateblocks,
        Origin::Option => mergeduplicateoptions,
    };

    if merge_this {
        let existing = map.get_mut(&key).unwrap();
        match origin {
            Origin::Block => deep_merge(existing, value),
            Origin::Option => *existing = value,
        }
        return Ok(());
    }

    if allowmultioptions {
        let existing = map.get_mut(&key).unwrap();
        match existing {
            Value::List(items) => items.push(value),
            other => {
                let first = std::mem::replace(other, Value::Null);
                *other = Value::List(vec![first, value]);
            }
        }
        return Ok(());
    }

    Err(Error::DuplicateKey { key, source_id: source_id.to_string(), line })
}

/// Mappings recurse key-wise; scalars (and anything else) at the same key
/// overwrite. `incoming` wins on scalar collision; on a table/table
/// collision both sides' keys survive, `incoming`'s values winning ties.
pub fn deep_merge(existing: &mut Value, incoming: Value) {
    match (existing, incoming) {
        (Value::Table(existing_map), Value::Table(incoming_map)) => {
            for (k, v) in incoming_map {
                match existing_map.get_mut(&k) {
                    Some(slot) => deep_merge(slot, v),
                    None => {
                        existing_map.insert(k, v);
                    }
                }
            }
        }
        (slot, incoming) => {
            *slot = incoming;
        }
    }
}

/// `defaultconfig` finalization: merge `defaults` underneath `result`,
/// existing keys in `result` winning ties.
pub fn merge_defaults(result: Value, defaults: Value) -> Value {
    let mut merged = defaults;
    deep_merge(&mut merged, result);
    merged
}
