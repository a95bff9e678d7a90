//! Defaulted reads for form binding.

use serde_json::Value;

use crate::get::get;
use crate::schema::{NormalizedView, SubtreeSchema};
use crate::types::FieldPath;

/// Read the subtree at `path` as a [`NormalizedView`] over `schema`.
///
/// Missing intermediates, `null`s and non-object values at `path` read as an
/// empty object, so the result is the all-defaults view. Never fails.
///
/// # Example
///
/// ```
/// use chart_option_path::{read, field_path, SubtreeSchema};
/// use serde_json::json;
///
/// let schema = SubtreeSchema::new().bool("show", true).text("text", "");
/// let doc = json!({"title": {"text": "Revenue"}});
/// let view = read(&doc, &field_path!["title"], &schema);
/// assert_eq!(view.get("text"), &json!("Revenue"));
/// assert_eq!(view.get("show"), &json!(true));
/// ```
pub fn read(document: &Value, path: &FieldPath, schema: &SubtreeSchema) -> NormalizedView {
    let source = get(document, path.steps()).and_then(Value::as_object);
    NormalizedView::from_schema(schema, source)
}

/// Raw lenient lookup of the value at `path`.
pub fn read_value<'a>(document: &'a Value, path: &FieldPath) -> Option<&'a Value> {
    get(document, path.steps())
}

/// The value at `path`, or `default` when absent or null.
pub fn read_or(document: &Value, path: &FieldPath, default: Value) -> Value {
    read_value(document, path).cloned().unwrap_or(default)
}
