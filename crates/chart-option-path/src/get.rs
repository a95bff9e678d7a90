//! Lenient lookup over option documents.

use serde_json::Value;

use crate::types::PathStep;

/// Get the value at `path`, treating a chart option's singleton/array duality
/// uniformly.
///
/// - `Index(0)` applied to a non-array value resolves to the value itself; any
///   other index on a non-array is absent.
/// - Missing keys, out-of-range indices, scalars in the middle of the path and
///   `null` values all resolve to `None`.
///
/// # Example
///
/// ```
/// use chart_option_path::{get, field_path};
/// use serde_json::json;
///
/// let doc = json!({"xAxis": {"name": "time"}});
/// assert_eq!(get(&doc, field_path!["xAxis", 0, "name"].steps()), Some(&json!("time")));
/// assert_eq!(get(&doc, field_path!["xAxis", 1, "name"].steps()), None);
/// ```
pub fn get<'a>(val: &'a Value, path: &[PathStep]) -> Option<&'a Value> {
    let mut current = val;
    for step in path {
        current = step_into(current, step)?;
    }
    if current.is_null() {
        None
    } else {
        Some(current)
    }
}

/// Resolve a single step, `None` when the step does not apply.
pub(crate) fn step_into<'a>(current: &'a Value, step: &PathStep) -> Option<&'a Value> {
    let next = match (step, current) {
        (PathStep::Key(key), Value::Object(map)) => map.get(key)?,
        (PathStep::Index(idx), Value::Array(arr)) => arr.get(*idx)?,
        (PathStep::Index(0), bare) if !bare.is_array() => bare,
        _ => return None,
    };
    if next.is_null() {
        None
    } else {
        Some(next)
    }
}

/// Strict lookup: no singleton folding, `null` values are returned as-is.
pub fn get_exact<'a>(val: &'a Value, path: &[PathStep]) -> Option<&'a Value> {
    let mut current = val;
    for step in path {
        current = match (step, current) {
            (PathStep::Key(key), Value::Object(map)) => map.get(key)?,
            (PathStep::Index(idx), Value::Array(arr)) => arr.get(*idx)?,
            _ => return None,
        };
    }
    Some(current)
}
