//! Copy-on-write writes into option documents.
//!
//! Writes create missing intermediate objects, fold index 0 of a bare object
//! into the object itself, promote a bare object to a one-element array when
//! a higher index is written, and pad short arrays with `{}`. A `null` value
//! is a removal: a key is deleted, an array slot is cleared to `{}` so later
//! instances keep their indices. Splicing an instance out is only done by
//! [`remove_instance`].

use serde_json::{Map, Value};
use thiserror::Error;

use crate::types::{FieldPath, PathStep};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MutateError {
    #[error("cannot write through non-container value at {path:?}")]
    NotAContainer { path: String },
    #[error("cannot address array at {path:?} with a key")]
    KeyOnArray { path: String },
    #[error("index {index} at {path:?} is too far past the end of the array")]
    IndexTooLarge { path: String, index: usize },
}

/// How many `{}` slots a single write may append to an array.
pub const MAX_PAD: usize = 1024;

fn prefix(path: &FieldPath, depth: usize) -> String {
    FieldPath::from(path.steps()[..depth].to_vec()).to_string()
}

/// Write `value` at `path` into a copy of `document`.
///
/// The input is never changed. A write that cannot be performed (a scalar in
/// the middle of the path, a key addressed into an array) is logged and
/// leaves the result equal to the input.
///
/// # Example
///
/// ```
/// use chart_option_path::{write, field_path};
/// use serde_json::json;
///
/// let doc = json!({"xAxis": {"name": "time"}});
/// let next = write(&doc, &field_path!["xAxis", 2, "name"], json!("rate"));
/// assert_eq!(next, json!({"xAxis": [{"name": "time"}, {}, {"name": "rate"}]}));
/// assert_eq!(doc, json!({"xAxis": {"name": "time"}}));
/// ```
pub fn write(document: &Value, path: &FieldPath, value: Value) -> Value {
    match try_write(document, path, value) {
        Ok(next) => next,
        Err(err) => {
            tracing::warn!(path = %path, error = %err, "write rejected");
            document.clone()
        }
    }
}

/// Fallible variant of [`write`].
pub fn try_write(document: &Value, path: &FieldPath, value: Value) -> Result<Value, MutateError> {
    let mut next = document.clone();
    apply(&mut next, path, value)?;
    Ok(next)
}

/// Write a text-input value: the empty string removes the key.
pub fn write_text(document: &Value, path: &FieldPath, text: &str) -> Value {
    write(document, path, text_value(text))
}

pub(crate) fn text_value(text: &str) -> Value {
    if text.is_empty() {
        Value::Null
    } else {
        Value::String(text.to_string())
    }
}

/// Remove instance `index` of the repeatable field at `base` from a copy of
/// `document`.
///
/// Removing index 0 of a bare object removes the field itself. Indices past
/// the end are ignored.
pub fn remove_instance(document: &Value, base: &FieldPath, index: usize) -> Value {
    let mut next = document.clone();
    splice_instance(&mut next, base, index);
    next
}

/// In-place [`remove_instance`]. Returns whether anything was removed.
pub fn splice_instance(document: &mut Value, base: &FieldPath, index: usize) -> bool {
    remove_instance_in_place(document, base.steps(), index)
}

/// In-place write used by [`write`] and by the document store's drafts.
///
/// On error the document may be partially changed (intermediates created);
/// callers that need atomicity work on a copy.
pub fn apply(document: &mut Value, path: &FieldPath, value: Value) -> Result<(), MutateError> {
    if document.is_null() {
        return Ok(());
    }
    let Some((last, parents)) = path.steps().split_last() else {
        if !value.is_null() {
            *document = value;
        }
        return Ok(());
    };
    // Removals never create intermediates.
    if value.is_null() {
        match last {
            PathStep::Index(_) => clear_instance(document, path.steps()),
            PathStep::Key(_) => {
                remove_field(document, path.steps());
            }
        }
        return Ok(());
    }
    let mut current = document;
    for (depth, step) in parents.iter().enumerate() {
        current = descend(current, step, path, depth)?;
    }
    set_leaf(current, last, value, path, parents.len())
}

fn descend<'a>(
    current: &'a mut Value,
    step: &PathStep,
    path: &FieldPath,
    depth: usize,
) -> Result<&'a mut Value, MutateError> {
    let slot = match (step, current) {
        (PathStep::Key(key), Value::Object(map)) => map.entry(key.clone()).or_insert(Value::Null),
        (PathStep::Key(_), Value::Array(_)) => {
            return Err(MutateError::KeyOnArray {
                path: prefix(path, depth),
            })
        }
        (PathStep::Index(0), obj) if obj.is_object() => return Ok(obj),
        (PathStep::Index(idx), container) => {
            let arr = ensure_array(container, path, depth)?;
            pad(arr, *idx, path, depth)?;
            &mut arr[*idx]
        }
        (PathStep::Key(_), _) => {
            return Err(MutateError::NotAContainer {
                path: prefix(path, depth),
            })
        }
    };
    if slot.is_null() {
        *slot = Value::Object(Map::new());
    }
    Ok(slot)
}

fn set_leaf(
    current: &mut Value,
    last: &PathStep,
    value: Value,
    path: &FieldPath,
    depth: usize,
) -> Result<(), MutateError> {
    match (last, current) {
        (PathStep::Key(key), Value::Object(map)) => {
            if value.is_null() {
                map.shift_remove(key);
            } else {
                map.insert(key.clone(), value);
            }
            Ok(())
        }
        (PathStep::Key(_), Value::Array(_)) => Err(MutateError::KeyOnArray {
            path: prefix(path, depth),
        }),
        (PathStep::Key(_), _) => Err(MutateError::NotAContainer {
            path: prefix(path, depth),
        }),
        (PathStep::Index(0), bare) if !bare.is_array() => {
            *bare = value;
            Ok(())
        }
        (PathStep::Index(idx), container) => {
            let arr = ensure_array(container, path, depth)?;
            pad(arr, *idx, path, depth)?;
            arr[*idx] = value;
            Ok(())
        }
    }
}

/// Turn a bare object into a one-element array; arrays pass through.
fn ensure_array<'a>(
    current: &'a mut Value,
    path: &FieldPath,
    depth: usize,
) -> Result<&'a mut Vec<Value>, MutateError> {
    if current.is_object() {
        let instance = std::mem::take(current);
        *current = Value::Array(vec![instance]);
    }
    match current {
        Value::Array(arr) => Ok(arr),
        _ => Err(MutateError::NotAContainer {
            path: prefix(path, depth),
        }),
    }
}

/// Grow `arr` with `{}` until `idx` is in bounds, at most [`MAX_PAD`] slots.
fn pad(arr: &mut Vec<Value>, idx: usize, path: &FieldPath, depth: usize) -> Result<(), MutateError> {
    let len = idx
        .checked_add(1)
        .filter(|len| len.saturating_sub(arr.len()) <= MAX_PAD)
        .ok_or_else(|| MutateError::IndexTooLarge {
            path: prefix(path, depth),
            index: idx,
        })?;
    arr.resize_with(len.max(arr.len()), || Value::Object(Map::new()));
    Ok(())
}

/// Lookup without creation, folding index 0 of bare objects.
fn lookup_mut<'a>(value: &'a mut Value, path: &[PathStep]) -> Option<&'a mut Value> {
    let mut current = value;
    for step in path {
        current = match (step, current) {
            (PathStep::Key(key), Value::Object(map)) => map.get_mut(key)?,
            (PathStep::Index(idx), Value::Array(arr)) => arr.get_mut(*idx)?,
            (PathStep::Index(0), bare) if !bare.is_array() => bare,
            _ => return None,
        };
    }
    Some(current)
}

/// Null write at an index: the instance becomes `{}` in place, so later
/// instances keep their indices. Index 0 of a bare value clears the value.
fn clear_instance(document: &mut Value, path: &[PathStep]) {
    if let Some(slot) = lookup_mut(document, path).filter(|slot| !slot.is_null()) {
        *slot = Value::Object(Map::new());
    }
}

pub(crate) fn remove_instance_in_place(document: &mut Value, base: &[PathStep], index: usize) -> bool {
    let bare = match lookup_mut(document, base) {
        Some(Value::Array(arr)) => {
            if index < arr.len() {
                arr.remove(index);
                return true;
            }
            return false;
        }
        Some(_) => index == 0,
        None => false,
    };
    bare && remove_field(document, base)
}

fn remove_field(document: &mut Value, path: &[PathStep]) -> bool {
    let Some((last, parent)) = path.split_last() else {
        return false;
    };
    match last {
        PathStep::Key(key) => match lookup_mut(document, parent) {
            Some(Value::Object(map)) => map.shift_remove(key).is_some(),
            _ => false,
        },
        PathStep::Index(idx) => remove_instance_in_place(document, parent, *idx),
    }
}
