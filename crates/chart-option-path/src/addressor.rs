//! Uniform addressing of fields that hold one object or an array of them.
//!
//! `xAxis`, `yAxis`, `grid`, `legend`, `visualMap`, `dataZoom` and friends may
//! be written either as a bare object or as an array of per-instance objects.
//! Panels address instance `i` through [`RepeatableField`] without caring
//! which form the document currently uses.

use std::borrow::Cow;

use serde_json::{Map, Value};

use crate::get::get;
use crate::schema::{NormalizedView, SubtreeSchema};
use crate::types::FieldPath;

/// Number of addressable instances: `max(1, len)` for arrays, `1` otherwise.
pub fn available_count(document: &Value, base: &FieldPath) -> usize {
    match get(document, base.steps()) {
        Some(Value::Array(arr)) => arr.len().max(1),
        _ => 1,
    }
}

/// Instance `index` of the field at `base`.
///
/// Arrays yield `field[index]`, or `{}` past the end or for a `null` slot. A
/// bare object is instance 0; higher indices are past the end and yield `{}`,
/// as [`crate::read`] does for `base.index(k)`. Absent fields yield `{}`.
/// Never writes.
pub fn resolve<'a>(document: &'a Value, base: &FieldPath, index: usize) -> Cow<'a, Value> {
    let found = match get(document, base.steps()) {
        Some(Value::Array(arr)) => arr.get(index).filter(|v| !v.is_null()),
        Some(obj @ Value::Object(_)) if index == 0 => Some(obj),
        _ => None,
    };
    match found {
        Some(value) => Cow::Borrowed(value),
        None => Cow::Owned(Value::Object(Map::new())),
    }
}

/// Instance `index` merged over `schema`.
pub fn resolve_view(
    document: &Value,
    base: &FieldPath,
    index: usize,
    schema: &SubtreeSchema,
) -> NormalizedView {
    let instance = resolve(document, base, index);
    NormalizedView::from_schema(schema, instance.as_object())
}

/// The path a panel writes through for instance `index`.
///
/// The mutator decides whether the bare form survives the write.
pub fn instance_path(base: &FieldPath, index: usize) -> FieldPath {
    base.index(index)
}

/// Is the field currently stored as an array?
pub fn is_array_form(document: &Value, base: &FieldPath) -> bool {
    matches!(get(document, base.steps()), Some(Value::Array(_)))
}

/// A repeatable field bound to one document version.
///
/// # Example
///
/// ```
/// use chart_option_path::{RepeatableField, field_path};
/// use serde_json::json;
///
/// let doc = json!({"yAxis": [{"name": "left"}]});
/// let axes = RepeatableField::new(&doc, field_path!["yAxis"]);
/// assert_eq!(axes.available_count(), 1);
/// assert_eq!(*axes.resolve(2), json!({}));
/// ```
#[derive(Debug, Clone)]
pub struct RepeatableField<'a> {
    document: &'a Value,
    base: FieldPath,
}

impl<'a> RepeatableField<'a> {
    pub fn new(document: &'a Value, base: FieldPath) -> Self {
        Self { document, base }
    }

    pub fn base(&self) -> &FieldPath {
        &self.base
    }

    pub fn available_count(&self) -> usize {
        available_count(self.document, &self.base)
    }

    pub fn resolve(&self, index: usize) -> Cow<'a, Value> {
        resolve(self.document, &self.base, index)
    }

    pub fn view(&self, index: usize, schema: &SubtreeSchema) -> NormalizedView {
        resolve_view(self.document, &self.base, index, schema)
    }

    pub fn instance_path(&self, index: usize) -> FieldPath {
        instance_path(&self.base, index)
    }

    pub fn is_array_form(&self) -> bool {
        is_array_form(self.document, &self.base)
    }

    /// Index choices for an instance picker: `0..available_count()`.
    pub fn indices(&self) -> std::ops::Range<usize> {
        0..self.available_count()
    }
}
