//! # Run Command Implementation
//!
//! Scans the master tree and reconciles every configured target, printing a
//! one-line summary per target. Exits non-zero if the scan fails or any
//! target fails.

use anyhow::Result;
use std::time::Instant;

use mirror_split::config::Config;
use mirror_split::runner;

/// Execute the run mode.
pub fn execute(config: &Config) -> Result<()> {
    let start_time = Instant::now();

    let report = runner::run(config)?;

    for target in &report.targets {
        match &target.outcome {
            Ok(summary) => println!("{}: {}", target.name, summary),
            Err(e) => println!("{}: FAILED ({})", target.name, e),
        }
    }

    let failed = report.failed();
    if !failed.is_empty() {
        return Err(mirror_split::suggestions::targets_failed(&failed));
    }

    println!(
        "Reconciled {} tree(s) in {:.2}s",
        report.targets.len(),
        start_time.elapsed().as_secs_f64()
    );
    Ok(())
}
