//! Path-addressed reads and writes over chart option documents.
//!
//! A chart option document is a deep `serde_json::Value` tree in which many
//! fields are either one object or an array of per-instance objects, and most
//! nested properties are optional with engine-side defaults. This crate gives
//! panels three primitives over such trees:
//!
//! - [`read`]: a fully defaulted [`NormalizedView`] of a subtree;
//! - [`RepeatableField`]: uniform addressing of instance `i` of a field that
//!   may be a bare object or an array;
//! - [`write`]: a copy-on-write update that creates intermediates, pads
//!   arrays and never touches sibling data.
//!
//! # Example
//!
//! ```
//! use chart_option_path::{field_path, read, write, SubtreeSchema};
//! use serde_json::json;
//!
//! let schema = SubtreeSchema::new().bool("show", true).number("width", 1.0);
//! let doc = json!({"yAxis": {"name": "left"}});
//!
//! let next = write(&doc, &field_path!["yAxis", 1, "axisLine", "show"], json!(false));
//! let view = read(&next, &field_path!["yAxis", 1, "axisLine"], &schema);
//! assert_eq!(view.bool("show"), Some(false));
//! assert_eq!(view.f64("width"), Some(1.0));
//! ```

pub mod accessor;
pub mod addressor;
pub mod get;
pub mod mutator;
pub mod pointer;
pub mod schema;
pub mod types;

pub use accessor::{read, read_or, read_value};
pub use addressor::{available_count, instance_path, resolve, resolve_view, RepeatableField};
pub use get::{get, get_exact};
pub use mutator::{
    apply, remove_instance, splice_instance, try_write, write, write_text, MutateError, MAX_PAD,
};
pub use pointer::{
    escape_component, format_pointer, parse_pointer, parse_pointer_strict, unescape_component,
    PathError,
};
pub use schema::{FieldKind, FieldSpec, NormalizedView, SubtreeSchema};
pub use types::{FieldPath, PathStep};

/// Text-input value: the empty string is a removal.
pub fn text_value(text: &str) -> serde_json::Value {
    mutator::text_value(text)
}
