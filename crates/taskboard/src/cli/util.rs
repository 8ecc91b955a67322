//! Shared utilities for CLI commands

use serde::Serialize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use taskboard_core::config::Config;
use taskboard_core::error::{BoardError, Result};
use taskboard_core::{BoardSnapshot, ChangeEvent};

/// Load config from an explicit file, or from the default location.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

/// Directory holding the board files: `--root`, then `local_root`, then the
/// current directory.
pub fn board_root(config: &Config, root_override: Option<PathBuf>) -> PathBuf {
    root_override
        .or_else(|| config.local_root.clone())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Read a board snapshot from a JSON file on disk.
pub fn read_snapshot(path: &Path) -> Result<BoardSnapshot> {
    let content = std::fs::read_to_string(path)?;
    BoardSnapshot::from_json(&content)
}

/// Print a value as pretty JSON. Returns false if it could not be serialized.
pub fn print_json<T: Serialize>(value: &T) -> bool {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{}", json);
            true
        }
        Err(e) => {
            eprintln!("✗ Failed to serialize output: {}", e);
            false
        }
    }
}

/// Report an error, as JSON on stdout or as text on stderr.
pub fn report_error(err: &BoardError, json: bool) {
    log::debug!("{:?}", err);
    if json {
        print_json(&err.to_serializable());
    } else {
        eprintln!("✗ {}", err.user_message());
        if !matches!(err, BoardError::IncorrectCredential(_)) {
            eprintln!("  ({})", err);
        }
    }
}

/// Print one side's changes under a heading.
pub fn print_changes(heading: &str, changes: &[ChangeEvent]) {
    if changes.is_empty() {
        println!("{}: none", heading);
        return;
    }
    println!("{}:", heading);
    for change in changes {
        println!("  - {}", change);
    }
}

/// Ask a yes/no question on stdin. Anything but "y"/"yes" is a no.
pub fn confirm(prompt: &str) -> bool {
    print!("{} [y/N] ", prompt);
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    if io::stdin().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
