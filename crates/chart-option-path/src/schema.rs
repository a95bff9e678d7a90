//! Subtree schemas and the defaulted views built from them.
//!
//! A [`SubtreeSchema`] declares, for one panel's subtree, which keys a form
//! binds to, the engine default for each, and the kind of value the control
//! can display. [`NormalizedView`] is the result of merging a document
//! subtree over such a schema.

use std::sync::OnceLock;

use indexmap::IndexMap;
use regex::Regex;
use serde_json::{Map, Number, Value};

/// What a bound control accepts. Stored values that do not fit fall back.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// Anything non-null is kept.
    Any,
    Bool,
    /// Numbers outside `min..=max` are clamped.
    Number { min: Option<f64>, max: Option<f64> },
    /// A number or a percentage string like `"12.5%"` (grid offsets, radii).
    NumberOrPercent,
    Text,
    /// A fixed option set. Out-of-set values fall back to the first option.
    Enum(Vec<Value>),
    /// CSS color string, or a gradient object.
    Color,
}

fn percent_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^-?\d+(\.\d+)?%$").unwrap())
}

fn color_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)^(#[0-9a-f]{3,4}|#[0-9a-f]{6}|#[0-9a-f]{8}|(rgb|rgba|hsl|hsla)\(\s*[-\d.%]+(\s*,\s*[-\d.%]+){2,3}\s*\)|[a-z]+)$",
        )
        .unwrap()
    })
}

pub fn is_color(s: &str) -> bool {
    color_regex().is_match(s.trim())
}

pub fn is_percent(s: &str) -> bool {
    percent_regex().is_match(s)
}

/// One declared field: its engine default and accepted kind.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub default: Value,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub fn new(default: Value, kind: FieldKind) -> Self {
        Self { default, kind }
    }

    /// Resolve the value a control should display for `stored`.
    pub fn coerce(&self, stored: Option<&Value>) -> Value {
        let Some(stored) = stored.filter(|v| !v.is_null()) else {
            return self.default.clone();
        };
        match &self.kind {
            FieldKind::Any => stored.clone(),
            FieldKind::Bool => match stored {
                Value::Bool(_) => stored.clone(),
                _ => self.default.clone(),
            },
            FieldKind::Number { min, max } => match stored.as_f64() {
                Some(n) => clamp_number(stored, n, *min, *max),
                None => self.default.clone(),
            },
            FieldKind::NumberOrPercent => match stored {
                Value::Number(_) => stored.clone(),
                Value::String(s) if is_percent(s) => stored.clone(),
                _ => self.default.clone(),
            },
            FieldKind::Text => match stored {
                Value::String(_) => stored.clone(),
                _ => self.default.clone(),
            },
            FieldKind::Enum(options) => {
                if options.contains(stored) {
                    stored.clone()
                } else {
                    options
                        .first()
                        .cloned()
                        .unwrap_or_else(|| self.default.clone())
                }
            }
            FieldKind::Color => match stored {
                Value::String(s) if is_color(s) => stored.clone(),
                Value::Object(_) => stored.clone(),
                _ => self.default.clone(),
            },
        }
    }
}

fn clamp_number(stored: &Value, n: f64, min: Option<f64>, max: Option<f64>) -> Value {
    let mut clamped = n;
    if let Some(lo) = min {
        clamped = clamped.max(lo);
    }
    if let Some(hi) = max {
        clamped = clamped.min(hi);
    }
    if clamped == n {
        return stored.clone();
    }
    Number::from_f64(clamped)
        .map(Value::Number)
        .unwrap_or_else(|| stored.clone())
}

/// Ordered set of declared fields for one subtree.
///
/// # Example
///
/// ```
/// use chart_option_path::SubtreeSchema;
/// use serde_json::json;
///
/// let legend = SubtreeSchema::new()
///     .bool("show", true)
///     .enumeration("orient", ["horizontal", "vertical"]);
/// let view = legend.defaults_view();
/// assert_eq!(view.get("orient"), &json!("horizontal"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubtreeSchema {
    fields: IndexMap<String, FieldSpec>,
}

impl SubtreeSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, key: impl Into<String>, spec: FieldSpec) -> Self {
        self.fields.insert(key.into(), spec);
        self
    }

    pub fn any(self, key: impl Into<String>, default: Value) -> Self {
        self.field(key, FieldSpec::new(default, FieldKind::Any))
    }

    pub fn bool(self, key: impl Into<String>, default: bool) -> Self {
        self.field(key, FieldSpec::new(Value::Bool(default), FieldKind::Bool))
    }

    pub fn number(self, key: impl Into<String>, default: f64) -> Self {
        self.field(
            key,
            FieldSpec::new(
                number_value(default),
                FieldKind::Number {
                    min: None,
                    max: None,
                },
            ),
        )
    }

    pub fn number_in(self, key: impl Into<String>, default: f64, min: f64, max: f64) -> Self {
        self.field(
            key,
            FieldSpec::new(
                number_value(default),
                FieldKind::Number {
                    min: Some(min),
                    max: Some(max),
                },
            ),
        )
    }

    pub fn number_or_percent(self, key: impl Into<String>, default: Value) -> Self {
        self.field(key, FieldSpec::new(default, FieldKind::NumberOrPercent))
    }

    pub fn text(self, key: impl Into<String>, default: &str) -> Self {
        self.field(
            key,
            FieldSpec::new(Value::String(default.to_string()), FieldKind::Text),
        )
    }

    /// Enumerated string field; the first option is the default.
    pub fn enumeration<I, S>(self, key: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let options: Vec<Value> = options
            .into_iter()
            .map(|s| Value::String(s.into()))
            .collect();
        let default = options.first().cloned().unwrap_or(Value::Null);
        self.field(key, FieldSpec::new(default, FieldKind::Enum(options)))
    }

    pub fn color(self, key: impl Into<String>, default: &str) -> Self {
        self.field(
            key,
            FieldSpec::new(Value::String(default.to_string()), FieldKind::Color),
        )
    }

    /// Nested object field; its default is the nested schema's defaults.
    pub fn nested(self, key: impl Into<String>, schema: &SubtreeSchema) -> Self {
        self.any(key, Value::Object(schema.defaults_object()))
    }

    pub fn spec(&self, key: &str) -> Option<&FieldSpec> {
        self.fields.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub(crate) fn fields(&self) -> impl Iterator<Item = (&String, &FieldSpec)> {
        self.fields.iter()
    }

    fn defaults_object(&self) -> Map<String, Value> {
        self.fields
            .iter()
            .filter(|(_, spec)| !spec.default.is_null())
            .map(|(k, spec)| (k.clone(), spec.default.clone()))
            .collect()
    }

    /// The view of an entirely absent subtree.
    pub fn defaults_view(&self) -> NormalizedView {
        NormalizedView::from_schema(self, None)
    }
}

fn number_value(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        Value::from(n as i64)
    } else {
        Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
    }
}

/// A read-only, fully defaulted snapshot of one subtree.
///
/// Every declared key is present; undeclared keys found in the document are
/// passed through. Equality ignores key order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedView {
    values: IndexMap<String, Value>,
}

impl NormalizedView {
    pub(crate) fn from_schema(schema: &SubtreeSchema, source: Option<&Map<String, Value>>) -> Self {
        let mut values = IndexMap::with_capacity(schema.len());
        for (key, spec) in schema.fields() {
            let stored = source.and_then(|map| map.get(key));
            values.insert(key.clone(), spec.coerce(stored));
        }
        if let Some(map) = source {
            for (key, value) in map {
                if value.is_null() || values.contains_key(key) {
                    continue;
                }
                values.insert(key.clone(), value.clone());
            }
        }
        Self { values }
    }

    /// Value for `key`; `Value::Null` only for keys neither declared nor stored.
    pub fn get(&self, key: &str) -> &Value {
        static NULL: Value = Value::Null;
        self.values.get(key).unwrap_or(&NULL)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn bool(&self, key: &str) -> Option<bool> {
        self.get(key).as_bool()
    }

    pub fn f64(&self, key: &str) -> Option<f64> {
        self.get(key).as_f64()
    }

    pub fn str(&self, key: &str) -> Option<&str> {
        self.get(key).as_str()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn to_value(&self) -> Value {
        Value::Object(
            self.values
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn axis_line() -> SubtreeSchema {
        SubtreeSchema::new()
            .bool("show", true)
            .number_in("width", 1.0, 0.0, 20.0)
            .enumeration("type", ["solid", "dashed", "dotted"])
            .color("color", "#6E7079")
    }

    #[test]
    fn test_defaults_view() {
        let view = axis_line().defaults_view();
        assert_eq!(view.get("show"), &json!(true));
        assert_eq!(view.get("width"), &json!(1));
        assert_eq!(view.get("type"), &json!("solid"));
        assert_eq!(view.get("color"), &json!("#6E7079"));
        assert_eq!(view.get("undeclared"), &Value::Null);
    }

    #[test]
    fn test_enum_out_of_set_falls_back_to_first_option() {
        let spec = FieldSpec::new(
            json!("dashed"),
            FieldKind::Enum(vec![json!("solid"), json!("dashed")]),
        );
        assert_eq!(spec.coerce(Some(&json!("wavy"))), json!("solid"));
        assert_eq!(spec.coerce(Some(&json!("dashed"))), json!("dashed"));
        assert_eq!(spec.coerce(None), json!("dashed"));
    }

    #[test]
    fn test_number_clamps_and_rejects_strings() {
        let spec = FieldSpec::new(
            json!(1),
            FieldKind::Number {
                min: Some(0.0),
                max: Some(10.0),
            },
        );
        assert_eq!(spec.coerce(Some(&json!(4))), json!(4));
        assert_eq!(spec.coerce(Some(&json!(40))), json!(10.0));
        assert_eq!(spec.coerce(Some(&json!(-3.5))), json!(0.0));
        assert_eq!(spec.coerce(Some(&json!("4"))), json!(1));
    }

    #[test]
    fn test_null_uses_default() {
        let spec = FieldSpec::new(json!(true), FieldKind::Bool);
        assert_eq!(spec.coerce(Some(&Value::Null)), json!(true));
        assert_eq!(spec.coerce(Some(&json!("yes"))), json!(true));
        assert_eq!(spec.coerce(Some(&json!(false))), json!(false));
    }

    #[test]
    fn test_number_or_percent() {
        let spec = FieldSpec::new(json!("10%"), FieldKind::NumberOrPercent);
        assert_eq!(spec.coerce(Some(&json!(60))), json!(60));
        assert_eq!(spec.coerce(Some(&json!("12.5%"))), json!("12.5%"));
        assert_eq!(spec.coerce(Some(&json!("wide"))), json!("10%"));
    }

    #[test]
    fn test_color_kinds() {
        assert!(is_color("#fff"));
        assert!(is_color("#A1B2C3"));
        assert!(is_color("rgba(0, 0, 0, 0.5)"));
        assert!(is_color("steelblue"));
        assert!(!is_color("#12"));
        assert!(!is_color("rgb(1,2)"));
        let spec = FieldSpec::new(json!("#000"), FieldKind::Color);
        let gradient = json!({"type": "linear", "colorStops": []});
        assert_eq!(spec.coerce(Some(&gradient)), gradient);
        assert_eq!(spec.coerce(Some(&json!(12))), json!("#000"));
    }

    #[test]
    fn test_view_passes_through_undeclared_keys() {
        let source = json!({"show": false, "shadowBlur": 4, "extra": null});
        let view = NormalizedView::from_schema(&axis_line(), source.as_object());
        assert_eq!(view.bool("show"), Some(false));
        assert_eq!(view.f64("shadowBlur"), Some(4.0));
        assert!(!view.contains("extra"));
        assert_eq!(view.len(), 5);
    }

    #[test]
    fn test_nested_defaults() {
        let text_style = SubtreeSchema::new().number("fontSize", 12.0);
        let title = SubtreeSchema::new().nested("textStyle", &text_style);
        assert_eq!(
            title.defaults_view().get("textStyle"),
            &json!({"fontSize": 12})
        );
    }
}
