//! # Link Applier
//!
//! The filesystem side of reconciliation. [`LinkOps`] is the seam between the
//! engine and the disk: the engine decides *what* to do, an implementation
//! does it.
//!
//! - [`DiskLinker`] performs real hardlink/symlink/unlink calls under a
//!   target root, linking from the shared master root.
//! - [`RecordingLinker`] records the requested [`LinkAction`]s and touches
//!   nothing. Tests use it to count operations.
//!
//! All paths passed to [`LinkOps`] are `/`-rooted paths relative to the
//! master (and therefore to the target), e.g. `/pool/main/a/a_amd64.deb`.
//! Parent directories are created lazily, on the first entry that needs
//! them. The target root belongs to the engine, so a stale file or symlink
//! found where a link is about to be made is replaced. Any other failure is
//! returned to the caller.

use std::fs;
use std::io::ErrorKind;
use std::os::unix::fs::{symlink, MetadataExt};
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{Error, Result};

/// Filesystem operations issued by the reconciliation engine.
pub trait LinkOps {
    /// Hardlink the master file at `relpath` to the same path in the target.
    fn hardlink(&mut self, relpath: &str) -> Result<()>;

    /// Create a symlink at `relpath` pointing to `dest`.
    fn symlink(&mut self, dest: &str, relpath: &str) -> Result<()>;

    /// Remove the file or symlink at `relpath`.
    fn remove_file(&mut self, relpath: &str) -> Result<()>;

    /// Remove the directory at `relpath` and everything below it.
    fn remove_subtree(&mut self, relpath: &str) -> Result<()>;
}

/// Join a `/`-rooted relative path under `root`.
pub fn resolve(root: &Path, relpath: &str) -> PathBuf {
    root.join(relpath.trim_start_matches('/'))
}

/// Applies operations to one target tree on disk.
#[derive(Debug, Clone)]
pub struct DiskLinker {
    master_root: PathBuf,
    target_root: PathBuf,
}

impl DiskLinker {
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(master_root: P, target_root: Q) -> Self {
        Self {
            master_root: master_root.as_ref().to_path_buf(),
            target_root: target_root.as_ref().to_path_buf(),
        }
    }

    /// Root of the target tree being written.
    pub fn target_root(&self) -> &Path {
        &self.target_root
    }

    /// Make sure the directory at `relpath` exists in the target.
    pub fn ensure_dir(&self, relpath: &str) -> Result<()> {
        let path = resolve(&self.target_root, relpath);
        fs::create_dir_all(&path).map_err(|source| Error::Link {
            operation: "create directory",
            path,
            source,
        })
    }

    /// Make sure the parent directory of `relpath` exists in the target.
    fn ensure_parent(&self, relpath: &str) -> Result<()> {
        match relpath.rfind('/') {
            Some(idx) => self.ensure_dir(&relpath[..idx]),
            None => self.ensure_dir(""),
        }
    }
}

impl LinkOps for DiskLinker {
    fn hardlink(&mut self, relpath: &str) -> Result<()> {
        self.ensure_parent(relpath)?;
        let master_path = resolve(&self.master_root, relpath);
        let dest = resolve(&self.target_root, relpath);
        debug!("link {}", relpath);

        match fs::hard_link(&master_path, &dest) {
            Ok(()) => Ok(()),
            // Left behind by an interrupted run or a lost snapshot.
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                if same_inode(&master_path, &dest) {
                    debug!("link {} already in place", relpath);
                    return Ok(());
                }
                replace_stale(&dest, relpath, "hardlink", || {
                    fs::hard_link(&master_path, &dest)
                })
            }
            Err(source) => Err(Error::Link {
                operation: "hardlink",
                path: dest,
                source,
            }),
        }
    }

    fn symlink(&mut self, dest: &str, relpath: &str) -> Result<()> {
        self.ensure_parent(relpath)?;
        let path = resolve(&self.target_root, relpath);
        debug!("symlink {} -> {}", relpath, dest);

        match symlink(dest, &path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                if fs::read_link(&path).is_ok_and(|existing| existing == Path::new(dest)) {
                    debug!("symlink {} already in place", relpath);
                    return Ok(());
                }
                replace_stale(&path, relpath, "symlink", || symlink(dest, &path))
            }
            Err(source) => Err(Error::Link {
                operation: "symlink",
                path,
                source,
            }),
        }
    }

    fn remove_file(&mut self, relpath: &str) -> Result<()> {
        let path = resolve(&self.target_root, relpath);
        debug!("unlink {}", relpath);
        fs::remove_file(&path).map_err(|source| Error::Link {
            operation: "unlink",
            path,
            source,
        })
    }

    fn remove_subtree(&mut self, relpath: &str) -> Result<()> {
        let path = resolve(&self.target_root, relpath);
        debug!("rmtree {}", relpath);
        match fs::remove_dir_all(&path) {
            Ok(()) => Ok(()),
            // Directories are created on first leaf, so a tracked directory
            // that never received one does not exist on disk.
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(Error::Link {
                operation: "remove directory",
                path,
                source,
            }),
        }
    }
}

/// Unlink a stale file or symlink at `path` and retry `create`.
///
/// Directories are left alone and reported as the original conflict.
fn replace_stale<F>(path: &Path, relpath: &str, operation: &'static str, create: F) -> Result<()>
where
    F: FnOnce() -> std::io::Result<()>,
{
    let link_err = |source| Error::Link {
        operation,
        path: path.to_path_buf(),
        source,
    };

    let metadata = fs::symlink_metadata(path).map_err(link_err)?;
    if metadata.is_dir() {
        return Err(link_err(std::io::Error::from(ErrorKind::AlreadyExists)));
    }

    debug!("replace stale {}", relpath);
    fs::remove_file(path).map_err(link_err)?;
    create().map_err(link_err)
}

fn same_inode(a: &Path, b: &Path) -> bool {
    match (fs::symlink_metadata(a), fs::symlink_metadata(b)) {
        (Ok(a), Ok(b)) => a.dev() == b.dev() && a.ino() == b.ino(),
        _ => false,
    }
}

/// An operation requested through [`LinkOps`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkAction {
    Hardlink(String),
    Symlink { dest: String, path: String },
    RemoveFile(String),
    RemoveSubtree(String),
}

/// Records operations without touching the filesystem.
#[derive(Debug, Clone, Default)]
pub struct RecordingLinker {
    pub actions: Vec<LinkAction>,
}

impl RecordingLinker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl LinkOps for RecordingLinker {
    fn hardlink(&mut self, relpath: &str) -> Result<()> {
        self.actions.push(LinkAction::Hardlink(relpath.to_string()));
        Ok(())
    }

    fn symlink(&mut self, dest: &str, relpath: &str) -> Result<()> {
        self.actions.push(LinkAction::Symlink {
            dest: dest.to_string(),
            path: relpath.to_string(),
        });
        Ok(())
    }

    fn remove_file(&mut self, relpath: &str) -> Result<()> {
        self.actions.push(LinkAction::RemoveFile(relpath.to_string()));
        Ok(())
    }

    fn remove_subtree(&mut self, relpath: &str) -> Result<()> {
        self.actions
            .push(LinkAction::RemoveSubtree(relpath.to_string()));
        Ok(())
    }
}
