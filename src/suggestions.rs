//! # Error Suggestions
//!
//! Helpers that turn common failures into messages saying what went wrong
//! and how to fix it. They return `anyhow::Error` for use at the CLI layer.

use std::path::Path;

use crate::config::CONFIG_ENV_VAR;

/// Generate an error for when the configuration file is not found.
///
/// Includes hints about:
/// - Creating a config file
/// - Using the -c/--config flag
/// - Using the MIRROR_SPLIT_CONFIG environment variable
pub fn config_not_found(path: &Path) -> anyhow::Error {
    anyhow::anyhow!(
        "Configuration file not found: {path}\n\n\
         hint: Create a mirror-split.yaml with ftp-path, tree-root-path and tree-database-path\n\
         hint: Use -c/--config to specify a different path\n\
         hint: Set {env} environment variable",
        path = path.display(),
        env = CONFIG_ENV_VAR,
    )
}

/// Generate an error for a run in which some targets failed.
///
/// Failed targets keep their previous snapshot, so rerunning is safe.
pub fn targets_failed(names: &[String]) -> anyhow::Error {
    anyhow::anyhow!(
        "Reconciliation failed for: {names}\n\n\
         hint: Fix the reported error and run again; failed trees keep their previous snapshot\n\
         hint: Use --log-level debug to see each filesystem operation",
        names = names.join(", ")
    )
}
