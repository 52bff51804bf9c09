//! # Tree Snapshots
//!
//! A [`DirNode`] records the contents of one directory: child directories,
//! regular files keyed by their change-detection [`Token`], and symbolic
//! links keyed by their destination string. Nodes own their children, so a
//! whole subtree is a plain owned value.
//!
//! A [`Snapshot`] wraps the root node of a target and handles persistence.
//! The on-disk form is JSON:
//!
//! ```json
//! {"version": 1, "root": {"dirs": {}, "files": {"README": 1234}, "links": {}}}
//! ```
//!
//! The snapshot is the engine's only memory of what a target contains. A
//! missing file means an empty target; a damaged one is an error, never an
//! empty target, since treating it as empty would relink everything on top
//! of entries already present.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Change-detection token for a regular file: its inode number.
///
/// Targets are hardlinks into the master, so a name's identity is exactly
/// which master inode it is linked to. A replaced master file gets a new
/// inode and therefore reads as changed.
pub type Token = u64;

/// Current persisted snapshot format.
pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

/// Kind of entry a name refers to within a directory node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Dir,
    File,
    Link,
}

/// One directory of a tree snapshot.
///
/// Within a node a name appears in at most one of `dirs`, `files` and
/// `links`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirNode {
    /// Child directories by name
    #[serde(default)]
    pub dirs: BTreeMap<String, DirNode>,
    /// Regular files by name, with their token
    #[serde(default)]
    pub files: BTreeMap<String, Token>,
    /// Symbolic links by name, with their destination
    #[serde(default)]
    pub links: BTreeMap<String, String>,
}

impl DirNode {
    /// Create an empty node
    pub fn new() -> Self {
        Self::default()
    }

    /// Which map, if any, holds `name`.
    pub fn kind_of(&self, name: &str) -> Option<EntryKind> {
        if self.dirs.contains_key(name) {
            Some(EntryKind::Dir)
        } else if self.files.contains_key(name) {
            Some(EntryKind::File)
        } else if self.links.contains_key(name) {
            Some(EntryKind::Link)
        } else {
            None
        }
    }

    /// True when the node has no entries at all.
    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty() && self.files.is_empty() && self.links.is_empty()
    }

    /// Look up a descendant directory by a `/`-separated relative path.
    ///
    /// An empty path (or `/`) returns `self`.
    pub fn dir(&self, path: &str) -> Option<&DirNode> {
        path.split('/')
            .filter(|part| !part.is_empty())
            .try_fold(self, |node, part| node.dirs.get(part))
    }

    /// Number of regular files in this subtree.
    pub fn file_count(&self) -> usize {
        self.files.len() + self.dirs.values().map(DirNode::file_count).sum::<usize>()
    }

    /// Number of symbolic links in this subtree.
    pub fn link_count(&self) -> usize {
        self.links.len() + self.dirs.values().map(DirNode::link_count).sum::<usize>()
    }

    /// Number of directories below this node (the node itself excluded).
    pub fn dir_count(&self) -> usize {
        self.dirs.len() + self.dirs.values().map(DirNode::dir_count).sum::<usize>()
    }
}

#[derive(Deserialize)]
struct SnapshotFile {
    version: u32,
    root: DirNode,
}

/// Borrowing form of [`SnapshotFile`] for writing.
#[derive(Serialize)]
struct SnapshotFileRef<'a> {
    version: u32,
    root: &'a DirNode,
}

/// The persisted state of one target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    /// Root directory of the target
    pub root: DirNode,
}

impl Snapshot {
    /// An empty snapshot, as for a target that has never been reconciled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing tree.
    pub fn from_root(root: DirNode) -> Self {
        Self { root }
    }

    /// Load a snapshot, treating a missing file as an empty target.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(
                    "No snapshot at {}; treating target as empty",
                    path.display()
                );
                return Ok(Self::new());
            }
            Err(e) => {
                return Err(Error::Snapshot {
                    path: path.to_path_buf(),
                    message: format!("failed to read: {}", e),
                })
            }
        };

        let file: SnapshotFile = serde_json::from_str(&content).map_err(|e| Error::Snapshot {
            path: path.to_path_buf(),
            message: format!("malformed snapshot: {}", e),
        })?;

        if file.version != SNAPSHOT_FORMAT_VERSION {
            return Err(Error::Snapshot {
                path: path.to_path_buf(),
                message: format!(
                    "unsupported snapshot version {} (expected {})",
                    file.version, SNAPSHOT_FORMAT_VERSION
                ),
            });
        }

        Ok(Self { root: file.root })
    }

    /// Persist the snapshot, replacing any previous file atomically.
    pub fn save(&self, path: &Path) -> Result<()> {
        let snapshot_err = |message: String| Error::Snapshot {
            path: path.to_path_buf(),
            message,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                snapshot_err(format!(
                    "failed to create directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let file = SnapshotFileRef {
            version: SNAPSHOT_FORMAT_VERSION,
            root: &self.root,
        };
        let content = serde_json::to_string(&file)?;

        let tmp_path = temp_path_for(path);
        fs::write(&tmp_path, content)
            .map_err(|e| snapshot_err(format!("failed to write '{}': {}", tmp_path.display(), e)))?;
        fs::rename(&tmp_path, path)
            .map_err(|e| snapshot_err(format!("failed to replace snapshot: {}", e)))?;

        info!(
            "Saved snapshot {} ({} files, {} links)",
            path.display(),
            self.root.file_count(),
            self.root.link_count()
        );
        Ok(())
    }
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}
