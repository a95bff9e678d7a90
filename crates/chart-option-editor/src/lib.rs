//! Editing core for chart option documents.
//!
//! - [`DocumentStore`]: the single canonical document, changed only through
//!   [`DocumentStore::mutate`] recipes that edit a [`Draft`] and publish an
//!   immutable version;
//! - [`JsonTextBridge`]: buffered raw-JSON editing of one subtree, with a
//!   pluggable [`SubtreeValidator`] gating commits;
//! - [`NotificationQueue`]: transient success/error feedback;
//! - [`EditorSession`]: the three together, configured from [`EditorConfig`].
//!
//! Path reads and writes come from `chart_option_path`.
//!
//! # Example
//!
//! ```
//! use chart_option_editor::{BreaksValidator, CommitOutcome, EditorSession};
//! use chart_option_path::field_path;
//! use serde_json::json;
//!
//! let mut session = EditorSession::new(json!({"yAxis": {"type": "value"}}));
//! let mut breaks = session.open_text(field_path!["yAxis", "breaks"], BreaksValidator);
//! breaks.on_text_change(r#"[{"start": 1, "end": 2}]"#);
//! assert_eq!(session.commit(&mut breaks), CommitOutcome::Committed { version: 1 });
//! assert_eq!(
//!     session.finish(),
//!     json!({"yAxis": {"type": "value", "breaks": [{"start": 1, "end": 2}]}})
//! );
//! ```

pub mod bridge;
pub mod cli;
pub mod config;
pub mod draft;
pub mod logging;
pub mod notify;
pub mod presets;
pub mod session;
pub mod store;

pub use bridge::{
    check_text, to_pretty, validator_for, BreaksValidator, BridgeError, BridgeState,
    CommitOutcome, FnValidator, JsonBuffer, JsonTextBridge, PiecesValidator, RichStyleValidator,
    SchemaViolation, SubtreeValidator, VisualMapValidator,
};
pub use config::{BridgeConfig, ConfigError, EditorConfig, LogConfig, NotificationConfig};
pub use draft::{Draft, DraftOp};
pub use notify::{Notification, NotificationQueue, Severity};
pub use session::EditorSession;
pub use store::{ChangeEvent, DocumentStore, ScopedChangeEvent, StoreError};
