//! `chart-option`: inspect and edit a chart option document.
//!
//! Usage:
//!   chart-option [--config <file>] [--file <file>] <command> [args]
//!
//! The document is read from stdin unless `--file` is given. See
//! `chart_option_editor::cli` for the commands.

use std::io::{self, Read, Write};

use chart_option_editor::cli::{run, CliError, USAGE};
use chart_option_editor::{logging, EditorConfig};

fn split_options(args: &[String]) -> Result<(Option<String>, Option<String>, Vec<String>), CliError> {
    let mut config = None;
    let mut file = None;
    let mut rest = Vec::new();
    let mut iter = args.iter();
    while let Some(a) = iter.next() {
        match a.as_str() {
            "--config" | "--file" => {
                let value = iter
                    .next()
                    .cloned()
                    .ok_or_else(|| CliError::Usage(format!("{a} needs a path\n{USAGE}")))?;
                if a == "--config" {
                    config = Some(value);
                } else {
                    file = Some(value);
                }
            }
            "-h" | "--help" => return Err(CliError::Usage(USAGE.to_string())),
            _ => rest.push(a.clone()),
        }
    }
    Ok((config, file, rest))
}

fn main_inner() -> Result<String, CliError> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (config_path, file, rest) = split_options(&args)?;
    let config = match config_path {
        Some(path) => EditorConfig::load(path)?,
        None => EditorConfig::default(),
    };
    logging::init(&config.log.filter);

    let input = match file {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    run(&rest, &input, &config)
}

fn main() {
    match main_inner() {
        Ok(result) => {
            let mut out = io::stdout();
            if out
                .write_all(result.as_bytes())
                .and_then(|_| out.write_all(b"\n"))
                .is_err()
            {
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
