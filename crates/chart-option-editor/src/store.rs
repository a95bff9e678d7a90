//! The single canonical chart option document.
//!
//! Every change goes through [`DocumentStore::mutate`]: the recipe edits a
//! [`Draft`], and the store publishes the result as a new immutable version.
//! Versions are shared `Arc<Value>` snapshots, so a panel holding an older
//! snapshot never observes a partially applied edit.

use std::collections::BTreeMap;
use std::sync::Arc;

use chart_option_path::{
    read, read_value, FieldPath, MutateError, NormalizedView, RepeatableField, SubtreeSchema,
};
use serde_json::Value;
use thiserror::Error;

use crate::draft::{Draft, DraftOp};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum StoreError {
    #[error("mutation aborted: {0}")]
    Aborted(#[from] MutateError),
    #[error("mutation cancelled: {0}")]
    Cancelled(String),
}

/// Published after every version change.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeEvent {
    pub version: u64,
    pub before: Arc<Value>,
    pub after: Arc<Value>,
    pub ops: Vec<DraftOp>,
}

/// Published to [`DocumentStore::subscribe_at`] listeners when their subtree changed.
#[derive(Debug, Clone, PartialEq)]
pub struct ScopedChangeEvent {
    pub version: u64,
    pub path: FieldPath,
    pub before: Option<Value>,
    pub after: Option<Value>,
}

type Listener = Box<dyn FnMut(&ChangeEvent)>;

pub struct DocumentStore {
    current: Arc<Value>,
    version: u64,
    next_listener_id: u64,
    listeners: BTreeMap<u64, Listener>,
}

impl std::fmt::Debug for DocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentStore")
            .field("version", &self.version)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl DocumentStore {
    pub fn new(initial: Value) -> Self {
        Self {
            current: Arc::new(initial),
            version: 0,
            next_listener_id: 1,
            listeners: BTreeMap::new(),
        }
    }

    pub fn current_document(&self) -> &Value {
        &self.current
    }

    /// Cheap handle on the current version.
    pub fn snapshot(&self) -> Arc<Value> {
        Arc::clone(&self.current)
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn get(&self, path: &FieldPath) -> Option<&Value> {
        read_value(&self.current, path)
    }

    pub fn read(&self, path: &FieldPath, schema: &SubtreeSchema) -> NormalizedView {
        read(&self.current, path, schema)
    }

    pub fn repeatable(&self, base: FieldPath) -> RepeatableField<'_> {
        RepeatableField::new(&self.current, base)
    }

    /// Run `recipe` against a working copy and publish the result.
    ///
    /// Returns the resulting version. A recipe that changes nothing returns
    /// the current version without notifying anyone. If any edit fails, no
    /// edit is applied.
    ///
    /// # Example
    ///
    /// ```
    /// use chart_option_editor::DocumentStore;
    /// use chart_option_path::field_path;
    /// use serde_json::json;
    ///
    /// let mut store = DocumentStore::new(json!({"legend": {"show": true}}));
    /// let version = store
    ///     .mutate(|draft| {
    ///         draft.set(&field_path!["legend", "show"], false);
    ///     })
    ///     .unwrap();
    /// assert_eq!(version, 1);
    /// assert_eq!(store.current_document(), &json!({"legend": {"show": false}}));
    /// ```
    pub fn mutate<F>(&mut self, recipe: F) -> Result<u64, StoreError>
    where
        F: FnOnce(&mut Draft),
    {
        self.try_mutate(|draft| {
            recipe(draft);
            Ok(())
        })
    }

    /// Like [`mutate`](Self::mutate), but the recipe may cancel.
    pub fn try_mutate<F>(&mut self, recipe: F) -> Result<u64, StoreError>
    where
        F: FnOnce(&mut Draft) -> Result<(), StoreError>,
    {
        let mut draft = Draft::new(&self.current);
        if let Err(err) = recipe(&mut draft) {
            tracing::warn!(version = self.version, error = %err, "mutation cancelled");
            return Err(err);
        }
        let (next, ops) = draft.finish().map_err(|err| {
            tracing::warn!(version = self.version, error = %err, "mutation aborted");
            StoreError::from(err)
        })?;
        if ops.is_empty() || next == *self.current {
            tracing::trace!(version = self.version, "mutation produced no change");
            return Ok(self.version);
        }
        Ok(self.publish(next, ops))
    }

    /// Load a new document wholesale.
    pub fn replace(&mut self, document: Value) -> u64 {
        if document == *self.current {
            return self.version;
        }
        let ops = vec![DraftOp::Set {
            path: FieldPath::root(),
            value: document.clone(),
        }];
        self.publish(document, ops)
    }

    fn publish(&mut self, next: Value, ops: Vec<DraftOp>) -> u64 {
        let before = std::mem::replace(&mut self.current, Arc::new(next));
        self.version += 1;
        tracing::debug!(version = self.version, ops = ops.len(), "published document version");
        let event = ChangeEvent {
            version: self.version,
            before,
            after: Arc::clone(&self.current),
            ops,
        };
        for listener in self.listeners.values_mut() {
            listener(&event);
        }
        self.version
    }

    /// Register a listener for every published version, in subscription order.
    pub fn subscribe<F>(&mut self, listener: F) -> u64
    where
        F: FnMut(&ChangeEvent) + 'static,
    {
        let id = self.next_listener_id;
        self.next_listener_id = self.next_listener_id.saturating_add(1);
        self.listeners.insert(id, Box::new(listener));
        id
    }

    /// Register a listener that only fires when the subtree at `path` changed.
    pub fn subscribe_at<F>(&mut self, path: FieldPath, mut listener: F) -> u64
    where
        F: FnMut(&ScopedChangeEvent) + 'static,
    {
        self.subscribe(move |ev| {
            let before = read_value(&ev.before, &path).cloned();
            let after = read_value(&ev.after, &path).cloned();
            if before != after {
                listener(&ScopedChangeEvent {
                    version: ev.version,
                    path: path.clone(),
                    before,
                    after,
                });
            }
        })
    }

    pub fn unsubscribe(&mut self, listener_id: u64) -> bool {
        self.listeners.remove(&listener_id).is_some()
    }

    /// Hand the final document to the renderer.
    pub fn into_document(self) -> Value {
        Arc::try_unwrap(self.current).unwrap_or_else(|shared| (*shared).clone())
    }
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new(Value::Object(serde_json::Map::new()))
    }
}
