//! # Reconciliation
//!
//! Brings one target in line with a freshly scanned master tree. The engine
//! walks the master snapshot and the target's persisted snapshot together,
//! one directory at a time, and issues [`LinkOps`] for every difference that
//! the target's selection cares about. The target snapshot is updated in
//! step with each successful operation.
//!
//! Per directory, the passes run in this order so that removals free a name
//! before an addition reuses it (for instance a file that became a symlink):
//!
//! 1. prune links that are inapplicable or gone from the master,
//! 2. prune files likewise,
//! 3. remove whole subtrees for directories gone from the master,
//! 4. link new files and relink files whose token changed,
//! 5. create new symlinks and recreate those whose destination changed,
//! 6. recurse into every master directory.
//!
//! Directories themselves are never filtered; only the files and links
//! inside them are. A directory removed from the master is deleted outright,
//! including entries that would still be applicable.
//!
//! A file's token is its master inode, so equal tokens mean "already linked
//! to this content" and are a no-op. A deleted master file whose inode is
//! later reused by a different file would read as unchanged; that trade-off
//! is accepted in exchange for never reading file content.

use std::fmt;

use crate::error::Result;
use crate::linker::LinkOps;
use crate::matcher::applicable;
use crate::target::Target;
use crate::tree::DirNode;

/// Counts of the operations performed by one reconciliation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    /// New files hardlinked
    pub linked: usize,
    /// Files unlinked and hardlinked again after a token change
    pub relinked: usize,
    /// New symlinks created
    pub symlinked: usize,
    /// Symlinks recreated after a destination change
    pub resymlinked: usize,
    /// Files removed
    pub unlinked_files: usize,
    /// Symlinks removed
    pub unlinked_links: usize,
    /// Directory subtrees removed
    pub removed_dirs: usize,
}

impl ReconcileSummary {
    /// Number of filesystem calls issued (a relink counts as two).
    pub fn total_operations(&self) -> usize {
        self.linked
            + 2 * self.relinked
            + self.symlinked
            + 2 * self.resymlinked
            + self.unlinked_files
            + self.unlinked_links
            + self.removed_dirs
    }

    /// True when the target was already in sync.
    pub fn is_noop(&self) -> bool {
        self.total_operations() == 0
    }
}

impl fmt::Display for ReconcileSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} linked, {} relinked, {} symlinked, {} resymlinked, {} removed, {} pruned dirs",
            self.linked,
            self.relinked,
            self.symlinked,
            self.resymlinked,
            self.unlinked_files + self.unlinked_links,
            self.removed_dirs
        )
    }
}

/// Reconcile `snapshot` (and the target tree on disk) against `master`.
///
/// `snapshot` is mutated in place. On error it reflects every operation that
/// completed before the failure, but the caller is expected to discard it.
pub fn reconcile<L: LinkOps>(
    master: &DirNode,
    snapshot: &mut DirNode,
    target: &Target,
    ops: &mut L,
) -> Result<ReconcileSummary> {
    let mut reconciler = Reconciler {
        target,
        ops,
        summary: ReconcileSummary::default(),
    };
    reconciler.reconcile_dir("", master, snapshot)?;
    Ok(reconciler.summary)
}

struct Reconciler<'a, L> {
    target: &'a Target,
    ops: &'a mut L,
    summary: ReconcileSummary,
}

fn join(prefix: &str, name: &str) -> String {
    format!("{}/{}", prefix, name)
}

impl<L: LinkOps> Reconciler<'_, L> {
    fn reconcile_dir(&mut self, prefix: &str, source: &DirNode, node: &mut DirNode) -> Result<()> {
        let target = self.target;

        let stale_links: Vec<String> = node
            .links
            .keys()
            .filter(|name| {
                !applicable(&join(prefix, name), target) || !source.links.contains_key(*name)
            })
            .cloned()
            .collect();
        for name in stale_links {
            self.ops.remove_file(&join(prefix, &name))?;
            node.links.remove(&name);
            self.summary.unlinked_links += 1;
        }

        let stale_files: Vec<String> = node
            .files
            .keys()
            .filter(|name| {
                !applicable(&join(prefix, name), target) || !source.files.contains_key(*name)
            })
            .cloned()
            .collect();
        for name in stale_files {
            self.ops.remove_file(&join(prefix, &name))?;
            node.files.remove(&name);
            self.summary.unlinked_files += 1;
        }

        let stale_dirs: Vec<String> = node
            .dirs
            .keys()
            .filter(|name| !source.dirs.contains_key(*name))
            .cloned()
            .collect();
        for name in stale_dirs {
            self.ops.remove_subtree(&join(prefix, &name))?;
            node.dirs.remove(&name);
            self.summary.removed_dirs += 1;
        }

        for (name, &token) in &source.files {
            let path = join(prefix, name);
            if !applicable(&path, target) {
                continue;
            }
            match node.files.get(name) {
                None => {
                    self.ops.hardlink(&path)?;
                    self.summary.linked += 1;
                }
                Some(&current) if current != token => {
                    self.ops.remove_file(&path)?;
                    self.ops.hardlink(&path)?;
                    self.summary.relinked += 1;
                }
                Some(_) => continue,
            }
            node.files.insert(name.clone(), token);
        }

        for (name, dest) in &source.links {
            let path = join(prefix, name);
            if !applicable(&path, target) {
                continue;
            }
            match node.links.get(name) {
                None => {
                    self.ops.symlink(dest, &path)?;
                    self.summary.symlinked += 1;
                }
                Some(current) if current != dest => {
                    self.ops.remove_file(&path)?;
                    self.ops.symlink(dest, &path)?;
                    self.summary.resymlinked += 1;
                }
                Some(_) => continue,
            }
            node.links.insert(name.clone(), dest.clone());
        }

        for (name, child_source) in &source.dirs {
            let child = node.dirs.entry(name.clone()).or_default();
            self.reconcile_dir(&join(prefix, name), child_source, child)?;
        }

        Ok(())
    }
}
