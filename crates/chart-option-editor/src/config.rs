use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Editor settings, loadable from TOML. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub notifications: NotificationConfig,
    pub bridge: BridgeConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    pub ttl_ms: u64,
    pub capacity: usize,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            ttl_ms: 3000,
            capacity: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Spaces per level in canonical text.
    pub indent: usize,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self { indent: 2 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".into(),
        }
    }
}

impl EditorConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: EditorConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), "loaded editor config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.notifications.capacity == 0 {
            return Err(ConfigError::Invalid(
                "notifications.capacity must be at least 1".into(),
            ));
        }
        if self.bridge.indent > 16 {
            return Err(ConfigError::Invalid(
                "bridge.indent must be at most 16".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert_eq!(config.notifications.ttl_ms, 3000);
        assert_eq!(config.notifications.capacity, 5);
        assert_eq!(config.bridge.indent, 2);
        assert_eq!(config.log.filter, "info");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = EditorConfig::from_toml_str("[bridge]\nindent = 4\n").unwrap();
        assert_eq!(config.bridge.indent, 4);
        assert_eq!(config.notifications, NotificationConfig::default());
        assert_eq!(EditorConfig::from_toml_str("").unwrap(), EditorConfig::default());
    }

    #[test]
    fn test_full_toml() {
        let text = r#"
[notifications]
ttl_ms = 1500
capacity = 2

[log]
filter = "chart_option_editor=debug"
"#;
        let config = EditorConfig::from_toml_str(text).unwrap();
        assert_eq!(config.notifications.ttl_ms, 1500);
        assert_eq!(config.notifications.capacity, 2);
        assert_eq!(config.log.filter, "chart_option_editor=debug");
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            EditorConfig::from_toml_str("[notifications]\ncapacity = 0\n"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            EditorConfig::from_toml_str("[bridge]\nindent = \"two\"\n"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = EditorConfig::load("/nonexistent/chart-option.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
