//! JSON Pointer (RFC 6901) encoding for [`FieldPath`].

use thiserror::Error;

use crate::types::{FieldPath, PathStep};

/// Maximum allowed pointer string length.
const MAX_POINTER_LENGTH: usize = 1024;

/// Maximum allowed path depth.
const MAX_PATH_LENGTH: usize = 256;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("pointer must be empty or start with '/': {0:?}")]
    PointerInvalid(String),
    #[error("pointer exceeds {MAX_POINTER_LENGTH} characters")]
    PointerTooLong,
    #[error("path exceeds {MAX_PATH_LENGTH} steps")]
    PathTooLong,
}

/// Unescapes a JSON Pointer path component (`~1` → `/`, `~0` → `~`).
pub fn unescape_component(component: &str) -> String {
    if !component.contains('~') {
        return component.to_string();
    }
    // ~1 before ~0, otherwise "~01" would decode to "/"
    component.replace("~1", "/").replace("~0", "~")
}

/// Escapes a JSON Pointer path component (`~` → `~0`, `/` → `~1`).
pub fn escape_component(component: &str) -> String {
    if !component.contains('/') && !component.contains('~') {
        return component.to_string();
    }
    component.replace('~', "~0").replace('/', "~1")
}

/// Parse a JSON Pointer into a [`FieldPath`].
///
/// The leading `/` is optional, so `xAxis/0` and `/xAxis/0` are the same
/// path. All-digit components become [`PathStep::Index`].
///
/// # Example
///
/// ```
/// use chart_option_path::{parse_pointer, field_path};
///
/// assert_eq!(parse_pointer("/xAxis/0/name").unwrap(), field_path!["xAxis", 0, "name"]);
/// assert_eq!(parse_pointer("").unwrap(), field_path![]);
/// ```
pub fn parse_pointer(pointer: &str) -> Result<FieldPath, PathError> {
    if pointer.is_empty() {
        return Ok(FieldPath::root());
    }
    if pointer.len() > MAX_POINTER_LENGTH {
        return Err(PathError::PointerTooLong);
    }
    let body = pointer.strip_prefix('/').unwrap_or(pointer);
    let steps: Vec<PathStep> = body
        .split('/')
        .map(|component| PathStep::from_token(&unescape_component(component)))
        .collect();
    if steps.len() > MAX_PATH_LENGTH {
        return Err(PathError::PathTooLong);
    }
    Ok(FieldPath::from(steps))
}

/// Strict variant of [`parse_pointer`]: rejects pointers without a leading `/`.
pub fn parse_pointer_strict(pointer: &str) -> Result<FieldPath, PathError> {
    if !pointer.is_empty() && !pointer.starts_with('/') {
        return Err(PathError::PointerInvalid(pointer.to_string()));
    }
    parse_pointer(pointer)
}

/// Format a path as a JSON Pointer. Same as `path.to_string()`.
pub fn format_pointer(path: &FieldPath) -> String {
    path.to_string()
}
