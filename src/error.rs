//! # Error Handling
//!
//! This module defines the centralized error type for `mirror-split`. It uses
//! `thiserror` to derive an `Error` enum covering every failure the engine can
//! report, each carrying enough context (usually a path) to act on.
//!
//! Errors fall into three groups:
//!
//! - **Configuration**: the YAML file is malformed or describes impossible
//!   targets (`ConfigParse`).
//! - **Environment**: the master tree cannot be read or contains an entry the
//!   engine cannot mirror (`Scan`, `UnsupportedEntry`, `NonUtf8Path`), a
//!   filesystem call against a target fails (`Link`), or a persisted snapshot
//!   cannot be loaded or saved (`Snapshot`).
//! - **Run outcome**: one or more targets aborted (`TargetsFailed`).
//!
//! Every environment error is fatal for the target being processed. No partial
//! snapshot is written after one.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for mirror-split operations
#[derive(Error, Debug)]
pub enum Error {
    /// The configuration file could not be parsed or failed validation.
    #[error("Configuration parsing error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ConfigParse {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// A directory in the master tree could not be listed or inspected.
    #[error("Scan error at {}: {message}", path.display())]
    Scan { path: PathBuf, message: String },

    /// The master tree contains something other than a directory, regular
    /// file or symbolic link.
    #[error("Unsupported entry at {}: not a directory, regular file or symlink", path.display())]
    UnsupportedEntry { path: PathBuf },

    /// A file name or symlink destination is not valid UTF-8.
    #[error("Non UTF-8 path: {}", path.display())]
    NonUtf8Path { path: PathBuf },

    /// A filesystem operation against a target tree failed.
    #[error("Failed to {operation} {}: {source}", path.display())]
    Link {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A persisted target snapshot could not be loaded or saved.
    #[error("Snapshot error for {}: {message}", path.display())]
    Snapshot { path: PathBuf, message: String },

    /// At least one target failed to reconcile during a run.
    #[error("Reconciliation failed for {} target(s): {}", names.len(), names.join(", "))]
    TargetsFailed { names: Vec<String> },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A JSON (de)serialization error, wrapped from `serde_json::Error`.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A directory walk error, wrapped from `walkdir::Error`.
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
