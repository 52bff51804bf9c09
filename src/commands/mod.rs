//! # CLI Command Implementations
//!
//! One module per mode of the `mirror-split` binary. Each exposes an
//! `execute` function taking the loaded configuration.
//!
//! - `list`: print the configuration and derived targets; read-only.
//! - `run`: scan the master and reconcile every target.

pub mod list;
pub mod run;
