//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use mirror_split::config::{self, CONFIG_ENV_VAR, DEFAULT_CONFIG_FILENAME};

use crate::commands;

/// Generate hardlink trees of certain architectures
#[derive(Parser, Debug)]
#[command(name = "mirror-split")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// List the configuration and exit
    #[arg(short, long)]
    list: bool,

    /// Path to the configuration file
    #[arg(short, long, value_name = "FILE", env = CONFIG_ENV_VAR, default_value = DEFAULT_CONFIG_FILENAME)]
    config: PathBuf,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    log_level: String,
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(&self.log_level);

        if !self.config.exists() {
            return Err(mirror_split::suggestions::config_not_found(&self.config));
        }
        let config = config::from_file(&self.config).map_err(|e| {
            anyhow::anyhow!(
                "Failed to load config from {}: {}",
                self.config.display(),
                e
            )
        })?;

        if self.list {
            commands::list::execute(&config)
        } else {
            commands::run::execute(&config)
        }
    }
}

/// Install the `env_logger` backend. `RUST_LOG` wins over `--log-level`.
fn init_logging(level: &str) {
    let env = env_logger::Env::default().default_filter_or(level);
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_target(false)
        .try_init();
}
