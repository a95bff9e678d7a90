//! Type definitions for field paths.

use std::fmt;

use crate::pointer::escape_component;

/// A step in a [`FieldPath`].
///
/// `Key` addresses an object property, `Index` addresses an array slot. An
/// `Index` step also carries array semantics for the mutator: writing through
/// it creates or pads an array.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PathStep {
    Key(String),
    Index(usize),
}

impl PathStep {
    /// Parse a raw token. All-digit tokens become indices.
    pub fn from_token(token: &str) -> Self {
        if is_index_token(token) {
            if let Ok(idx) = token.parse::<usize>() {
                return PathStep::Index(idx);
            }
        }
        PathStep::Key(token.to_string())
    }

    pub fn as_key(&self) -> Option<&str> {
        match self {
            PathStep::Key(key) => Some(key),
            PathStep::Index(_) => None,
        }
    }

    pub fn as_index(&self) -> Option<usize> {
        match self {
            PathStep::Index(idx) => Some(*idx),
            PathStep::Key(_) => None,
        }
    }

    pub fn is_index(&self) -> bool {
        matches!(self, PathStep::Index(_))
    }
}

/// `"0"` and `"12"` are indices; `"01"`, `"-1"` and `""` are keys.
fn is_index_token(token: &str) -> bool {
    let bytes = token.as_bytes();
    if bytes.is_empty() || (bytes.len() > 1 && bytes[0] == b'0') {
        return false;
    }
    bytes.iter().all(|b| b.is_ascii_digit())
}

impl fmt::Display for PathStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathStep::Key(key) => f.write_str(&escape_component(key)),
            PathStep::Index(idx) => write!(f, "{idx}"),
        }
    }
}

impl From<&str> for PathStep {
    fn from(key: &str) -> Self {
        PathStep::Key(key.to_string())
    }
}

impl From<String> for PathStep {
    fn from(key: String) -> Self {
        PathStep::Key(key)
    }
}

impl From<usize> for PathStep {
    fn from(idx: usize) -> Self {
        PathStep::Index(idx)
    }
}

/// An immutable location inside a chart option document, e.g.
/// `xAxis/0/axisLine/lineStyle/color`.
///
/// Builder methods (`key`, `index`, `join`) return new paths; the receiver is
/// never changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldPath {
    steps: Vec<PathStep>,
}

impl FieldPath {
    /// The root path (empty step list).
    pub fn root() -> Self {
        Self::default()
    }

    pub fn from_steps<I, S>(steps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<PathStep>,
    {
        Self {
            steps: steps.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse a dotted path such as `xAxis.0.axisLine.show`.
    ///
    /// The empty string is the root path.
    pub fn parse_dotted(path: &str) -> Self {
        if path.is_empty() {
            return Self::root();
        }
        Self {
            steps: path.split('.').map(PathStep::from_token).collect(),
        }
    }

    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_root(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.is_root()
    }

    /// Child path with an object key appended.
    pub fn key(&self, key: impl Into<String>) -> Self {
        self.push(PathStep::Key(key.into()))
    }

    /// Child path with an array index appended.
    pub fn index(&self, idx: usize) -> Self {
        self.push(PathStep::Index(idx))
    }

    pub fn push(&self, step: PathStep) -> Self {
        let mut steps = Vec::with_capacity(self.steps.len() + 1);
        steps.extend_from_slice(&self.steps);
        steps.push(step);
        Self { steps }
    }

    /// Concatenate `other` onto this path.
    pub fn join(&self, other: &FieldPath) -> Self {
        let mut steps = Vec::with_capacity(self.steps.len() + other.steps.len());
        steps.extend_from_slice(&self.steps);
        steps.extend_from_slice(&other.steps);
        Self { steps }
    }

    /// Parent path, `None` for the root.
    pub fn parent(&self) -> Option<Self> {
        self.split_last().map(|(parent, _)| parent)
    }

    pub fn last(&self) -> Option<&PathStep> {
        self.steps.last()
    }

    pub fn split_last(&self) -> Option<(Self, &PathStep)> {
        let (last, rest) = self.steps.split_last()?;
        Some((
            Self {
                steps: rest.to_vec(),
            },
            last,
        ))
    }

    /// True when `self` is a strict ancestor of `other`.
    pub fn is_ancestor_of(&self, other: &FieldPath) -> bool {
        self.steps.len() < other.steps.len() && other.steps.starts_with(&self.steps)
    }

    /// True when the two paths address overlapping subtrees.
    pub fn overlaps(&self, other: &FieldPath) -> bool {
        self == other || self.is_ancestor_of(other) || other.is_ancestor_of(self)
    }
}

impl fmt::Display for FieldPath {
    /// Renders the path as a JSON Pointer.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for step in &self.steps {
            write!(f, "/{step}")?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a FieldPath {
    type Item = &'a PathStep;
    type IntoIter = std::slice::Iter<'a, PathStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

impl From<Vec<PathStep>> for FieldPath {
    fn from(steps: Vec<PathStep>) -> Self {
        Self { steps }
    }
}

impl AsRef<[PathStep]> for FieldPath {
    fn as_ref(&self) -> &[PathStep] {
        &self.steps
    }
}

/// Build a [`FieldPath`] from keys and indices.
///
/// ```
/// use chart_option_path::{field_path, PathStep};
///
/// let path = field_path!["xAxis", 0, "axisLine"];
/// assert_eq!(path.steps()[1], PathStep::Index(0));
/// assert_eq!(path.to_string(), "/xAxis/0/axisLine");
/// ```
#[macro_export]
macro_rules! field_path {
    () => {
        $crate::FieldPath::root()
    };
    ($($step:expr),+ $(,)?) => {
        $crate::FieldPath::from(vec![$($crate::PathStep::from($step)),+])
    };
}
