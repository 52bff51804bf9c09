//! # mirror-split CLI
//!
//! This is the binary entry point for the `mirror-split` command-line tool.
//!
//! Its primary responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Setting up logging.
//! - Dispatching to the list or run command and turning failures into a
//!   non-zero exit status.
//!
//! The engine itself lives in the `mirror_split` library crate.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
