//! Raw JSON text editing for one document subtree.
//!
//! A [`JsonTextBridge`] owns a text buffer mirroring the subtree at its path.
//! Keystrokes are parsed and validated on every change, but the document only
//! changes through [`JsonTextBridge::on_commit`], and only with text that
//! parsed and validated. After a commit or reset the buffer holds the
//! canonical pretty form of the stored value.

mod validate;

use std::fmt;

use chart_option_path::{read_value, FieldPath};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use thiserror::Error;

use crate::notify::{NotificationQueue, Severity};
use crate::store::{DocumentStore, StoreError};

pub use validate::{
    validator_for, BreaksValidator, FnValidator, PiecesValidator, RichStyleValidator,
    SchemaViolation, SubtreeValidator, VisualMapValidator, BREAK_KEYS, PIECE_KEYS,
};

pub const DEFAULT_INDENT: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeState {
    /// Text equals the canonical form.
    Clean,
    EditingValid,
    EditingInvalid,
}

/// The text a user edits plus what the bridge knows about it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonBuffer {
    pub text: String,
    pub parsed_valid: bool,
    pub error_message: Option<String>,
    /// Pretty form of the subtree as last committed or seen in the document.
    pub canonical: String,
}

impl JsonBuffer {
    fn clean(canonical: String) -> Self {
        Self {
            text: canonical.clone(),
            parsed_valid: true,
            error_message: None,
            canonical,
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.text != self.canonical
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum BridgeError {
    #[error("Invalid JSON: {0}")]
    Syntax(String),
    #[error("{0}")]
    Schema(SchemaViolation),
    #[error("{0}")]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum CommitOutcome {
    Committed { version: u64 },
    /// Nothing to commit: the buffer is clean.
    Unchanged,
    Rejected(BridgeError),
}

impl CommitOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, CommitOutcome::Committed { .. })
    }
}

/// Parse `text` and run `validator` over the result.
pub fn check_text(text: &str, validator: &dyn SubtreeValidator) -> Result<Value, BridgeError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| BridgeError::Syntax(e.to_string()))?;
    validator.validate(&value).map_err(BridgeError::Schema)?;
    Ok(value)
}

/// Pretty-print with `indent` spaces per level.
pub fn to_pretty(value: &Value, indent: usize) -> String {
    let pad = " ".repeat(indent);
    let mut out = Vec::new();
    let mut ser =
        serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(pad.as_bytes()));
    match value.serialize(&mut ser) {
        Ok(()) => String::from_utf8(out).unwrap_or_else(|_| value.to_string()),
        Err(_) => value.to_string(),
    }
}

pub struct JsonTextBridge {
    path: FieldPath,
    validator: Box<dyn SubtreeValidator>,
    indent: usize,
    buffer: JsonBuffer,
    state: BridgeState,
    /// Subtree value the canonical text was derived from.
    source: Option<Value>,
    last_error: Option<BridgeError>,
}

impl fmt::Debug for JsonTextBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonTextBridge")
            .field("path", &self.path)
            .field("validator", &self.validator.name())
            .field("state", &self.state)
            .field("buffer", &self.buffer)
            .finish()
    }
}

impl JsonTextBridge {
    /// Mount a bridge on the subtree at `path`, clean.
    pub fn new<V>(store: &DocumentStore, path: FieldPath, validator: V) -> Self
    where
        V: SubtreeValidator + 'static,
    {
        Self::with_indent(store, path, validator, DEFAULT_INDENT)
    }

    pub fn with_indent<V>(store: &DocumentStore, path: FieldPath, validator: V, indent: usize) -> Self
    where
        V: SubtreeValidator + 'static,
    {
        let mut bridge = Self {
            path,
            validator: Box::new(validator),
            indent,
            buffer: JsonBuffer::clean(String::new()),
            state: BridgeState::Clean,
            source: None,
            last_error: None,
        };
        bridge.on_reset(store);
        bridge
    }

    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    pub fn buffer(&self) -> &JsonBuffer {
        &self.buffer
    }

    pub fn text(&self) -> &str {
        &self.buffer.text
    }

    pub fn state(&self) -> BridgeState {
        self.state
    }

    pub fn error(&self) -> Option<&BridgeError> {
        self.last_error.as_ref()
    }

    pub fn is_dirty(&self) -> bool {
        self.buffer.is_dirty()
    }

    pub fn can_commit(&self) -> bool {
        self.state == BridgeState::EditingValid && self.is_dirty()
    }

    fn canonical_of(&self, source: Option<&Value>) -> String {
        match source {
            Some(value) => to_pretty(value, self.indent),
            None => to_pretty(&self.validator.empty_value(), self.indent),
        }
    }

    fn set_clean(&mut self) {
        self.state = BridgeState::Clean;
        self.last_error = None;
        self.buffer.text = self.buffer.canonical.clone();
        self.buffer.parsed_valid = true;
        self.buffer.error_message = None;
    }

    /// Re-check the buffer after a keystroke.
    pub fn on_text_change(&mut self, text: impl Into<String>) -> BridgeState {
        self.buffer.text = text.into();
        if !self.buffer.is_dirty() {
            self.set_clean();
            return self.state;
        }
        match check_text(&self.buffer.text, self.validator.as_ref()) {
            Ok(_) => {
                self.state = BridgeState::EditingValid;
                self.last_error = None;
                self.buffer.parsed_valid = true;
                self.buffer.error_message = None;
            }
            Err(err) => {
                self.state = BridgeState::EditingInvalid;
                self.buffer.parsed_valid = false;
                self.buffer.error_message = Some(err.to_string());
                self.last_error = Some(err);
            }
        }
        tracing::trace!(path = %self.path, state = ?self.state, "buffer changed");
        self.state
    }

    /// Write the buffer into the document if it is dirty and valid.
    pub fn on_commit(
        &mut self,
        store: &mut DocumentStore,
        notifications: &mut NotificationQueue,
    ) -> CommitOutcome {
        if self.state == BridgeState::Clean || !self.is_dirty() {
            return CommitOutcome::Unchanged;
        }
        let value = match check_text(&self.buffer.text, self.validator.as_ref()) {
            Ok(value) => value,
            Err(err) => return self.reject(err, notifications),
        };
        let path = &self.path;
        let version = match store.mutate(|draft| {
            draft.set(path, value);
        }) {
            Ok(version) => version,
            Err(err) => return self.reject(BridgeError::Store(err), notifications),
        };
        self.on_reset(store);
        tracing::info!(path = %self.path, version, "committed JSON text");
        notifications.show(
            format!("{} updated", self.validator.name()),
            Severity::Success,
        );
        CommitOutcome::Committed { version }
    }

    fn reject(&mut self, err: BridgeError, notifications: &mut NotificationQueue) -> CommitOutcome {
        tracing::debug!(path = %self.path, error = %err, "commit rejected");
        notifications.show(err.to_string(), Severity::Error);
        if !matches!(err, BridgeError::Store(_)) {
            self.state = BridgeState::EditingInvalid;
            self.buffer.parsed_valid = false;
        }
        self.buffer.error_message = Some(err.to_string());
        self.last_error = Some(err.clone());
        CommitOutcome::Rejected(err)
    }

    /// Discard edits and reload the canonical text from the document.
    pub fn on_reset(&mut self, store: &DocumentStore) {
        self.source = read_value(store.current_document(), &self.path).cloned();
        self.buffer.canonical = self.canonical_of(self.source.as_ref());
        self.set_clean();
    }

    /// Pick up changes another panel made to the subtree.
    ///
    /// A clean buffer follows the document; a dirty buffer keeps its text.
    /// Returns whether the subtree changed since last seen.
    pub fn sync(&mut self, store: &DocumentStore) -> bool {
        let current = read_value(store.current_document(), &self.path);
        if current == self.source.as_ref() {
            return false;
        }
        self.source = current.cloned();
        self.buffer.canonical = self.canonical_of(self.source.as_ref());
        if self.state == BridgeState::Clean || !self.is_dirty() {
            self.set_clean();
        }
        tracing::debug!(path = %self.path, dirty = self.is_dirty(), "subtree changed underneath bridge");
        true
    }
}
