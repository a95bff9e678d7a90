//! Structural validators for subtrees edited as raw JSON text.
//!
//! Each validator checks one narrow rule set after the text has parsed, so
//! its messages can name the offending entry and key precisely.

use std::fmt;

use serde_json::{Map, Value};

// ── Violation ──────────────────────────────────────────────────────────────

/// First structural problem found in a parsed subtree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaViolation {
    /// 1-indexed entry for array subtrees.
    pub entry: Option<usize>,
    pub key: Option<String>,
    pub reason: String,
}

impl SchemaViolation {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            entry: None,
            key: None,
            reason: reason.into(),
        }
    }

    pub fn at_entry(entry: usize, reason: impl Into<String>) -> Self {
        Self {
            entry: Some(entry),
            key: None,
            reason: reason.into(),
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.entry {
            Some(entry) => write!(f, "Entry {}: {}", entry, self.reason),
            None => f.write_str(&self.reason),
        }
    }
}

impl std::error::Error for SchemaViolation {}

// ── Trait ──────────────────────────────────────────────────────────────────

/// A subtree-specific rule set checked before commit.
pub trait SubtreeValidator {
    fn name(&self) -> &str;

    fn validate(&self, value: &Value) -> Result<(), SchemaViolation>;

    /// Serialized into the buffer when the subtree is absent.
    fn empty_value(&self) -> Value {
        Value::Null
    }
}

impl<V: SubtreeValidator + ?Sized> SubtreeValidator for Box<V> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn validate(&self, value: &Value) -> Result<(), SchemaViolation> {
        (**self).validate(value)
    }

    fn empty_value(&self) -> Value {
        (**self).empty_value()
    }
}

// ── Helpers ────────────────────────────────────────────────────────────────

fn list_keys(keys: &[&str]) -> String {
    keys.join(", ")
}

/// Check every entry of an array of non-empty objects with `check`.
fn each_object_entry<F>(value: &Value, mut check: F) -> Result<(), SchemaViolation>
where
    F: FnMut(usize, &Map<String, Value>) -> Result<(), SchemaViolation>,
{
    let entries = value
        .as_array()
        .ok_or_else(|| SchemaViolation::new("must be an array"))?;
    for (i, entry) in entries.iter().enumerate() {
        let n = i + 1;
        let map = entry
            .as_object()
            .ok_or_else(|| SchemaViolation::at_entry(n, "each entry must be an object"))?;
        if map.is_empty() {
            return Err(SchemaViolation::at_entry(
                n,
                "each entry must be a non-empty object",
            ));
        }
        check(n, map)?;
    }
    Ok(())
}

fn allowed_keys_only(
    n: usize,
    map: &Map<String, Value>,
    allowed: &[&str],
) -> Result<(), SchemaViolation> {
    match map.keys().find(|k| !allowed.contains(&k.as_str())) {
        Some(key) => Err(SchemaViolation::at_entry(
            n,
            format!(
                "illegal key \"{}\"; allowed keys are {}",
                key,
                list_keys(allowed)
            ),
        )
        .with_key(key.clone())),
        None => Ok(()),
    }
}

// ── Axis breaks ────────────────────────────────────────────────────────────

pub const BREAK_KEYS: [&str; 4] = ["start", "end", "gap", "isExpanded"];

/// Axis `breaks`: an array of `{start, end, gap, isExpanded}` objects.
#[derive(Debug, Clone, Copy, Default)]
pub struct BreaksValidator;

impl SubtreeValidator for BreaksValidator {
    fn name(&self) -> &str {
        "breaks"
    }

    fn validate(&self, value: &Value) -> Result<(), SchemaViolation> {
        each_object_entry(value, |n, map| {
            allowed_keys_only(n, map, &BREAK_KEYS)?;
            match map.get("isExpanded") {
                Some(flag) if !flag.is_boolean() => {
                    Err(SchemaViolation::at_entry(n, "isExpanded must be boolean")
                        .with_key("isExpanded"))
                }
                _ => Ok(()),
            }
        })
    }

    fn empty_value(&self) -> Value {
        Value::Array(Vec::new())
    }
}

// ── Visual map ─────────────────────────────────────────────────────────────

/// `visualMap`: a single component object or an array of them.
#[derive(Debug, Clone, Copy, Default)]
pub struct VisualMapValidator;

impl SubtreeValidator for VisualMapValidator {
    fn name(&self) -> &str {
        "visualMap"
    }

    fn validate(&self, value: &Value) -> Result<(), SchemaViolation> {
        match value {
            Value::Array(_) | Value::Object(_) => Ok(()),
            _ => Err(SchemaViolation::new("must be a JSON array or object")),
        }
    }

    fn empty_value(&self) -> Value {
        Value::Array(Vec::new())
    }
}

// ── Piecewise visual map pieces ────────────────────────────────────────────

pub const PIECE_KEYS: [&str; 12] = [
    "min",
    "max",
    "lt",
    "lte",
    "gt",
    "gte",
    "value",
    "label",
    "color",
    "symbol",
    "symbolSize",
    "opacity",
];

const PIECE_BOUNDS: [&str; 6] = ["min", "max", "lt", "lte", "gt", "gte"];

/// `visualMap.pieces`: an array of non-empty piece objects with numeric bounds.
#[derive(Debug, Clone, Copy, Default)]
pub struct PiecesValidator;

impl SubtreeValidator for PiecesValidator {
    fn name(&self) -> &str {
        "pieces"
    }

    fn validate(&self, value: &Value) -> Result<(), SchemaViolation> {
        each_object_entry(value, |n, map| {
            allowed_keys_only(n, map, &PIECE_KEYS)?;
            for bound in PIECE_BOUNDS {
                if let Some(v) = map.get(bound) {
                    if !v.is_number() {
                        return Err(SchemaViolation::at_entry(
                            n,
                            format!("{} must be a number", bound),
                        )
                        .with_key(bound));
                    }
                }
            }
            Ok(())
        })
    }

    fn empty_value(&self) -> Value {
        Value::Array(Vec::new())
    }
}

// ── Rich text styles ───────────────────────────────────────────────────────

/// Label `rich`: an object mapping style names to style objects.
#[derive(Debug, Clone, Copy, Default)]
pub struct RichStyleValidator;

impl SubtreeValidator for RichStyleValidator {
    fn name(&self) -> &str {
        "rich"
    }

    fn validate(&self, value: &Value) -> Result<(), SchemaViolation> {
        let styles = value
            .as_object()
            .ok_or_else(|| SchemaViolation::new("must be an object"))?;
        for (name, style) in styles {
            if !style.is_object() {
                return Err(
                    SchemaViolation::new(format!("style \"{}\" must be an object", name))
                        .with_key(name.clone()),
                );
            }
        }
        Ok(())
    }

    fn empty_value(&self) -> Value {
        Value::Object(Map::new())
    }
}

// ── Closure adapter ────────────────────────────────────────────────────────

/// Wrap a closure as a validator for one-off subtrees.
pub struct FnValidator<F> {
    name: String,
    empty: Value,
    check: F,
}

impl<F> FnValidator<F>
where
    F: Fn(&Value) -> Result<(), SchemaViolation>,
{
    pub fn new(name: impl Into<String>, check: F) -> Self {
        Self {
            name: name.into(),
            empty: Value::Null,
            check,
        }
    }

    pub fn with_empty_value(mut self, empty: Value) -> Self {
        self.empty = empty;
        self
    }
}

impl<F> fmt::Debug for FnValidator<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnValidator")
            .field("name", &self.name)
            .finish()
    }
}

impl<F> SubtreeValidator for FnValidator<F>
where
    F: Fn(&Value) -> Result<(), SchemaViolation>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn validate(&self, value: &Value) -> Result<(), SchemaViolation> {
        (self.check)(value)
    }

    fn empty_value(&self) -> Value {
        self.empty.clone()
    }
}

/// Look up a built-in validator by name.
pub fn validator_for(name: &str) -> Option<Box<dyn SubtreeValidator>> {
    match name {
        "breaks" => Some(Box::new(BreaksValidator)),
        "visualMap" | "visual-map" => Some(Box::new(VisualMapValidator)),
        "pieces" => Some(Box::new(PiecesValidator)),
        "rich" => Some(Box::new(RichStyleValidator)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_breaks_accepts_allowed_keys() {
        let v = json!([{"start": 1, "end": 2}, {"start": 5, "end": 9, "gap": "2%", "isExpanded": false}]);
        assert_eq!(BreaksValidator.validate(&v), Ok(()));
        assert_eq!(BreaksValidator.validate(&json!([])), Ok(()));
    }

    #[test]
    fn test_breaks_illegal_key_names_entry_and_key() {
        let err = BreaksValidator.validate(&json!([{"foo": 1}])).unwrap_err();
        assert_eq!(err.entry, Some(1));
        assert_eq!(err.key.as_deref(), Some("foo"));
        assert_eq!(
            err.to_string(),
            "Entry 1: illegal key \"foo\"; allowed keys are start, end, gap, isExpanded"
        );
    }

    #[test]
    fn test_breaks_shape_errors() {
        let err = BreaksValidator.validate(&json!({"start": 1})).unwrap_err();
        assert_eq!(err.to_string(), "must be an array");

        let err = BreaksValidator
            .validate(&json!([{"start": 1}, 3]))
            .unwrap_err();
        assert_eq!(err.to_string(), "Entry 2: each entry must be an object");

        let err = BreaksValidator.validate(&json!([{}])).unwrap_err();
        assert_eq!(err.to_string(), "Entry 1: each entry must be a non-empty object");
    }

    #[test]
    fn test_breaks_is_expanded_must_be_boolean() {
        let err = BreaksValidator
            .validate(&json!([{"start": 1, "isExpanded": "yes"}]))
            .unwrap_err();
        assert_eq!(err.key.as_deref(), Some("isExpanded"));
        assert_eq!(err.to_string(), "Entry 1: isExpanded must be boolean");
    }

    #[test]
    fn test_visual_map_shapes() {
        assert!(VisualMapValidator.validate(&json!({"type": "piecewise"})).is_ok());
        assert!(VisualMapValidator.validate(&json!([{}, {}])).is_ok());
        assert!(VisualMapValidator.validate(&json!("continuous")).is_err());
        assert!(VisualMapValidator.validate(&json!(3)).is_err());
        assert!(VisualMapValidator.validate(&Value::Null).is_err());
    }

    #[test]
    fn test_pieces() {
        assert!(PiecesValidator
            .validate(&json!([{"min": 0, "max": 10, "color": "#f00"}, {"value": 42}]))
            .is_ok());
        let err = PiecesValidator
            .validate(&json!([{"min": 0}, {"lt": "10"}]))
            .unwrap_err();
        assert_eq!(err.to_string(), "Entry 2: lt must be a number");
        let err = PiecesValidator.validate(&json!([{"start": 0}])).unwrap_err();
        assert_eq!(err.key.as_deref(), Some("start"));
    }

    #[test]
    fn test_rich_styles() {
        assert!(RichStyleValidator
            .validate(&json!({"a": {"color": "red"}, "b": {}}))
            .is_ok());
        let err = RichStyleValidator.validate(&json!({"a": 1})).unwrap_err();
        assert_eq!(err.to_string(), "style \"a\" must be an object");
        assert!(RichStyleValidator.validate(&json!([])).is_err());
        assert_eq!(RichStyleValidator.empty_value(), json!({}));
    }

    #[test]
    fn test_fn_validator() {
        let v = FnValidator::new("positive", |value: &Value| match value.as_f64() {
            Some(n) if n > 0.0 => Ok(()),
            _ => Err(SchemaViolation::new("must be positive")),
        })
        .with_empty_value(json!(1));
        assert_eq!(v.name(), "positive");
        assert!(v.validate(&json!(3)).is_ok());
        assert!(v.validate(&json!(-3)).is_err());
        assert_eq!(v.empty_value(), json!(1));
    }

    #[test]
    fn test_validator_for() {
        assert_eq!(validator_for("breaks").map(|v| v.name().to_string()), Some("breaks".into()));
        assert_eq!(
            validator_for("visual-map").map(|v| v.name().to_string()),
            Some("visualMap".into())
        );
        assert!(validator_for("series").is_none());
    }
}
