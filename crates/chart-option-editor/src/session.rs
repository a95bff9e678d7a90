use chart_option_path::{FieldPath, NormalizedView, RepeatableField, SubtreeSchema};
use serde_json::Value;

use crate::bridge::{CommitOutcome, JsonTextBridge, SubtreeValidator};
use crate::config::EditorConfig;
use crate::notify::{NotificationQueue, Severity};
use crate::store::{DocumentStore, StoreError};

/// One editing session: the document, its feedback queue and settings.
///
/// Panels go through the session rather than the document; when the session
/// ends, [`EditorSession::finish`] hands the document to the renderer.
#[derive(Debug)]
pub struct EditorSession {
    store: DocumentStore,
    notifications: NotificationQueue,
    config: EditorConfig,
}

impl EditorSession {
    pub fn new(document: Value) -> Self {
        Self::with_config(document, EditorConfig::default())
    }

    pub fn with_config(document: Value, config: EditorConfig) -> Self {
        Self {
            store: DocumentStore::new(document),
            notifications: NotificationQueue::from_config(&config.notifications),
            config,
        }
    }

    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut DocumentStore {
        &mut self.store
    }

    pub fn notifications(&self) -> &NotificationQueue {
        &self.notifications
    }

    pub fn notifications_mut(&mut self) -> &mut NotificationQueue {
        &mut self.notifications
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn read(&self, path: &FieldPath, schema: &SubtreeSchema) -> NormalizedView {
        self.store.read(path, schema)
    }

    pub fn repeatable(&self, base: FieldPath) -> RepeatableField<'_> {
        self.store.repeatable(base)
    }

    /// Form-control write of a single value; failures are reported as notifications.
    pub fn set(&mut self, path: &FieldPath, value: Value) -> Result<u64, StoreError> {
        let result = self.store.mutate(|draft| {
            draft.set(path, value);
        });
        if let Err(err) = &result {
            self.notifications.show(err.to_string(), Severity::Error);
        }
        result
    }

    /// Text-input write: clearing the input removes the key.
    pub fn set_text(&mut self, path: &FieldPath, text: &str) -> Result<u64, StoreError> {
        let result = self.store.mutate(|draft| {
            draft.set_text(path, text);
        });
        if let Err(err) = &result {
            self.notifications.show(err.to_string(), Severity::Error);
        }
        result
    }

    /// Mount a text bridge using the configured indent.
    pub fn open_text<V>(&self, path: FieldPath, validator: V) -> JsonTextBridge
    where
        V: SubtreeValidator + 'static,
    {
        JsonTextBridge::with_indent(&self.store, path, validator, self.config.bridge.indent)
    }

    pub fn commit(&mut self, bridge: &mut JsonTextBridge) -> CommitOutcome {
        bridge.on_commit(&mut self.store, &mut self.notifications)
    }

    pub fn reset(&self, bridge: &mut JsonTextBridge) {
        bridge.on_reset(&self.store);
    }

    pub fn finish(self) -> Value {
        self.store.into_document()
    }
}
