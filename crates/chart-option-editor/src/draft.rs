//! Working copies handed to [`DocumentStore::mutate`](crate::DocumentStore::mutate) recipes.

use chart_option_path::{
    apply, available_count, read, read_value, splice_instance, text_value, FieldPath, MutateError,
    NormalizedView, SubtreeSchema,
};
use serde_json::Value;

/// One recorded edit, replayable as a path write.
#[derive(Debug, Clone, PartialEq)]
pub enum DraftOp {
    Set { path: FieldPath, value: Value },
    Remove { path: FieldPath },
    RemoveInstance { base: FieldPath, index: usize },
}

impl DraftOp {
    pub fn path(&self) -> &FieldPath {
        match self {
            DraftOp::Set { path, .. } | DraftOp::Remove { path } => path,
            DraftOp::RemoveInstance { base, .. } => base,
        }
    }

    /// Replay this edit onto `document`.
    pub fn apply_to(&self, document: &mut Value) -> Result<(), MutateError> {
        match self {
            DraftOp::Set { path, value } => apply(document, path, value.clone()),
            DraftOp::Remove { path } => apply(document, path, Value::Null),
            DraftOp::RemoveInstance { base, index } => {
                splice_instance(document, base, *index);
                Ok(())
            }
        }
    }
}

/// A writable working copy of the current document.
///
/// Edits read like in-place mutation and are visible to later reads through
/// the same draft. The first failing edit poisons the draft: later edits are
/// skipped and the store discards the whole recipe.
#[derive(Debug)]
pub struct Draft {
    working: Value,
    ops: Vec<DraftOp>,
    error: Option<MutateError>,
}

impl Draft {
    pub(crate) fn new(base: &Value) -> Self {
        Self {
            working: base.clone(),
            ops: Vec::new(),
            error: None,
        }
    }

    pub fn get(&self, path: &FieldPath) -> Option<&Value> {
        read_value(&self.working, path)
    }

    pub fn view(&self, path: &FieldPath, schema: &SubtreeSchema) -> NormalizedView {
        read(&self.working, path, schema)
    }

    pub fn count(&self, base: &FieldPath) -> usize {
        available_count(&self.working, base)
    }

    pub fn set(&mut self, path: &FieldPath, value: impl Into<Value>) -> &mut Self {
        self.record(DraftOp::Set {
            path: path.clone(),
            value: value.into(),
        })
    }

    /// Text-input write: the empty string removes the key.
    pub fn set_text(&mut self, path: &FieldPath, text: &str) -> &mut Self {
        match text_value(text) {
            Value::Null => self.remove(path),
            value => self.set(path, value),
        }
    }

    /// Remove the value at `path`. At an index this clears the instance to
    /// `{}`; use [`remove_instance`](Self::remove_instance) to splice it out.
    pub fn remove(&mut self, path: &FieldPath) -> &mut Self {
        self.record(DraftOp::Remove { path: path.clone() })
    }

    pub fn remove_instance(&mut self, base: &FieldPath, index: usize) -> &mut Self {
        self.record(DraftOp::RemoveInstance {
            base: base.clone(),
            index,
        })
    }

    pub fn ops(&self) -> &[DraftOp] {
        &self.ops
    }

    pub fn error(&self) -> Option<&MutateError> {
        self.error.as_ref()
    }

    fn record(&mut self, op: DraftOp) -> &mut Self {
        if self.error.is_some() {
            return self;
        }
        match op.apply_to(&mut self.working) {
            Ok(()) => self.ops.push(op),
            Err(err) => {
                tracing::debug!(path = %op.path(), error = %err, "draft edit failed");
                self.error = Some(err);
            }
        }
        self
    }

    pub(crate) fn finish(self) -> Result<(Value, Vec<DraftOp>), MutateError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok((self.working, self.ops)),
        }
    }
}
