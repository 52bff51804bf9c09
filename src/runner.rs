//! # Run Orchestration
//!
//! One run scans the master tree once, then reconciles every configured
//! target against that scan:
//!
//! 1. **Scan**: build a fresh [`DirNode`] of the master. A failure here aborts
//!    the run before any target is touched.
//! 2. **Per target**: load the persisted snapshot (empty if absent),
//!    reconcile it and the target tree on disk, then save the snapshot.
//!
//! Targets are independent. A failure aborts only the target it happened
//! in, and that target's snapshot is not saved; the remaining targets still
//! run and the failure is reported at the end.

use std::path::Path;

use log::{info, warn};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::linker::DiskLinker;
use crate::reconcile::{reconcile, ReconcileSummary};
use crate::scanner::scan;
use crate::target::Target;
use crate::tree::{DirNode, Snapshot};

/// Outcome of reconciling one target.
#[derive(Debug)]
pub struct TargetReport {
    pub name: String,
    pub outcome: Result<ReconcileSummary>,
}

/// Outcome of a whole run.
#[derive(Debug, Default)]
pub struct RunReport {
    pub targets: Vec<TargetReport>,
}

impl RunReport {
    /// Names of the targets that failed.
    pub fn failed(&self) -> Vec<String> {
        self.targets
            .iter()
            .filter(|report| report.outcome.is_err())
            .map(|report| report.name.clone())
            .collect()
    }

    /// `Ok` when every target succeeded.
    pub fn ensure_success(&self) -> Result<()> {
        let names = self.failed();
        if names.is_empty() {
            Ok(())
        } else {
            Err(Error::TargetsFailed { names })
        }
    }
}

/// Reconcile every target in `config` against a fresh scan of the master.
pub fn run(config: &Config) -> Result<RunReport> {
    let master = scan(&config.ftp_path)?;

    let targets = config
        .targets()
        .into_iter()
        .map(|target| {
            let outcome = reconcile_target(&config.ftp_path, &master, &target);
            if let Err(e) = &outcome {
                warn!("Target {} failed: {}", target.name, e);
            }
            TargetReport {
                name: target.name,
                outcome,
            }
        })
        .collect();

    Ok(RunReport { targets })
}

/// Reconcile one target against an already scanned master and persist its
/// snapshot.
pub fn reconcile_target(
    master_root: &Path,
    master: &DirNode,
    target: &Target,
) -> Result<ReconcileSummary> {
    info!("Reconciling tree: {}", target.name);

    let mut snapshot = Snapshot::load(&target.db_path)?;
    let mut linker = DiskLinker::new(master_root, &target.root);
    let summary = reconcile(master, &mut snapshot.root, target, &mut linker)?;

    info!("Tree {}: {}", target.name, summary);
    snapshot.save(&target.db_path)?;
    Ok(summary)
}
