//! # mirror-split
//!
//! Maintains partial, per-architecture copies ("targets") of a large package
//! archive. Each target is a tree of hardlinks into the master archive, so it
//! takes no extra space for file content, and contains only the files
//! relevant to its architectures (plus source packages when asked, and a few
//! always-copied paths such as documentation).
//!
//! ## Quick Example
//!
//! ```
//! use mirror_split::linker::RecordingLinker;
//! use mirror_split::reconcile::reconcile;
//! use mirror_split::target::Target;
//! use mirror_split::tree::DirNode;
//!
//! let mut pool = DirNode::new();
//! pool.files.insert("a_amd64.deb".to_string(), 100);
//! pool.files.insert("a_i386.deb".to_string(), 101);
//! let mut master = DirNode::new();
//! master.dirs.insert("pool".to_string(), pool);
//!
//! let target = Target::new("amd64", "/trees/amd64".into(), "/db/amd64.db".into(), ["amd64", "all"], false);
//! let mut snapshot = DirNode::new();
//! let mut ops = RecordingLinker::new();
//!
//! let summary = reconcile(&master, &mut snapshot, &target, &mut ops).unwrap();
//! assert_eq!(summary.linked, 1);
//! assert_eq!(snapshot.file_count(), 1);
//! ```
//!
//! ## Core Concepts
//!
//! - **Targets (`target`, `config`)**: what to build, derived from the YAML
//!   configuration.
//! - **Applicability (`matcher`)**: whether a master path belongs in a target.
//! - **Snapshots (`tree`)**: the directories, files (by inode) and symlinks
//!   (by destination) of a tree, persisted per target between runs.
//! - **Scanning (`scanner`)**: a fresh snapshot of the master on every run.
//! - **Reconciliation (`reconcile`, `linker`)**: the diff-and-apply pass that
//!   brings a target and its snapshot in line with the master.
//!
//! ## Execution Flow
//!
//! [`runner::run`] scans the master once, then for every target loads its
//! snapshot, reconciles, and saves the updated snapshot.

pub mod config;
pub mod error;
pub mod linker;
pub mod matcher;
pub mod reconcile;
pub mod runner;
pub mod scanner;
pub mod suggestions;
pub mod target;
pub mod tree;

#[cfg(test)]
mod matcher_proptest;
