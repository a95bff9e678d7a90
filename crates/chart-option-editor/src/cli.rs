//! Logic behind the `chart-option` binary.
//!
//! Commands operate on one option document read from stdin (or `--file`):
//!
//! - `get <pointer>`: print the value at a path
//! - `set <pointer> <json>`: write a value and print the new document
//! - `count <pointer>`: number of addressable instances of a repeatable field
//! - `view <pointer> <preset> [index]`: print a defaulted view
//! - `check <validator>`: validate the input as JSON text for a subtree

use chart_option_path::{available_count, parse_pointer, read_value, PathError};
use serde_json::Value;
use thiserror::Error;

use crate::bridge::{check_text, to_pretty, validator_for, BridgeError};
use crate::config::{ConfigError, EditorConfig};
use crate::presets::preset;
use crate::store::{DocumentStore, StoreError};

pub const USAGE: &str = "usage: chart-option [--config <file>] [--file <file>] <command> [args]\n\
commands:\n  get <pointer>\n  set <pointer> <json>\n  count <pointer>\n  view <pointer> <preset> [index]\n  check <validator>";

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Path(#[from] PathError),
    #[error("nothing at {0}")]
    NotFound(String),
    #[error("unknown preset: {0}")]
    UnknownPreset(String),
    #[error("unknown validator: {0}")]
    UnknownValidator(String),
    #[error("{0}")]
    Store(#[from] StoreError),
    #[error("{0}")]
    Bridge(#[from] BridgeError),
    #[error("{0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Io(#[from] std::io::Error),
}

fn arg<'a>(args: &'a [String], i: usize, what: &str) -> Result<&'a str, CliError> {
    args.get(i)
        .map(String::as_str)
        .ok_or_else(|| CliError::Usage(format!("missing {what}\n{USAGE}")))
}

fn parse_document(input: &str) -> Result<Value, CliError> {
    Ok(serde_json::from_str(input.trim())?)
}

/// Print the value at `pointer`.
pub fn get(input: &str, pointer: &str, config: &EditorConfig) -> Result<String, CliError> {
    let doc = parse_document(input)?;
    let path = parse_pointer(pointer)?;
    let value = read_value(&doc, &path).ok_or_else(|| CliError::NotFound(pointer.to_string()))?;
    Ok(to_pretty(value, config.bridge.indent))
}

/// Write `value_json` at `pointer` and print the resulting document.
pub fn set(
    input: &str,
    pointer: &str,
    value_json: &str,
    config: &EditorConfig,
) -> Result<String, CliError> {
    let path = parse_pointer(pointer)?;
    let value: Value = serde_json::from_str(value_json)?;
    let mut store = DocumentStore::new(parse_document(input)?);
    store.mutate(|draft| {
        draft.set(&path, value);
    })?;
    Ok(to_pretty(store.current_document(), config.bridge.indent))
}

pub fn count(input: &str, pointer: &str) -> Result<String, CliError> {
    let doc = parse_document(input)?;
    let path = parse_pointer(pointer)?;
    Ok(available_count(&doc, &path).to_string())
}

/// Print the defaulted view of `pointer` (instance `index` if given).
pub fn view(
    input: &str,
    pointer: &str,
    preset_name: &str,
    index: Option<usize>,
    config: &EditorConfig,
) -> Result<String, CliError> {
    let doc = parse_document(input)?;
    let path = parse_pointer(pointer)?;
    let schema =
        preset(preset_name).ok_or_else(|| CliError::UnknownPreset(preset_name.to_string()))?;
    let store = DocumentStore::new(doc);
    let view = match index {
        Some(i) => store.repeatable(path).view(i, &schema),
        None => store.read(&path, &schema),
    };
    Ok(to_pretty(&view.to_value(), config.bridge.indent))
}

/// Validate `input` as JSON text for the named subtree.
pub fn check(input: &str, validator_name: &str) -> Result<String, CliError> {
    let validator = validator_for(validator_name)
        .ok_or_else(|| CliError::UnknownValidator(validator_name.to_string()))?;
    check_text(input.trim(), validator.as_ref())?;
    Ok(format!("ok: valid {}", validator.name()))
}

/// Dispatch `args` (without the program name or global options).
pub fn run(args: &[String], input: &str, config: &EditorConfig) -> Result<String, CliError> {
    let command = arg(args, 0, "command")?;
    tracing::debug!(command, "running command");
    match command {
        "get" => get(input, arg(args, 1, "pointer")?, config),
        "set" => set(
            input,
            arg(args, 1, "pointer")?,
            arg(args, 2, "value")?,
            config,
        ),
        "count" => count(input, arg(args, 1, "pointer")?),
        "view" => {
            let index = match args.get(3) {
                Some(raw) => Some(
                    raw.parse::<usize>()
                        .map_err(|_| CliError::Usage(format!("invalid index: {raw}")))?,
                ),
                None => None,
            };
            view(
                input,
                arg(args, 1, "pointer")?,
                arg(args, 2, "preset")?,
                index,
                config,
            )
        }
        "check" => check(input, arg(args, 1, "validator")?),
        other => Err(CliError::Usage(format!("unknown command: {other}\n{USAGE}"))),
    }
}
