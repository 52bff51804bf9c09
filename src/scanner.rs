//! # Master Tree Scanner
//!
//! Builds a fresh [`DirNode`] for a directory tree on disk. Each directory is
//! listed one level at a time with `walkdir` (sorted by file name, symlinks
//! not followed) and every entry is classified from its `lstat` data:
//!
//! - directories are scanned recursively,
//! - regular files record their inode number as the token,
//! - symbolic links record their literal destination.
//!
//! The root may itself be a symlink to a directory; only entries below it are
//! taken as they are.
//!
//! Anything else (devices, sockets, fifos) aborts the scan. So does any
//! listing failure: an incomplete master tree would make reconciliation
//! delete valid target content.

use std::fs;
use std::os::unix::fs::MetadataExt;
use std::path::Path;

use log::info;
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::tree::DirNode;

/// Scan the tree rooted at `root`.
pub fn scan(root: &Path) -> Result<DirNode> {
    info!("Scanning {}", root.display());

    // The root itself may be a symlink to the real archive; entries below
    // it are never followed.
    let metadata = fs::metadata(root).map_err(|e| Error::Scan {
        path: root.to_path_buf(),
        message: e.to_string(),
    })?;
    if !metadata.is_dir() {
        return Err(Error::Scan {
            path: root.to_path_buf(),
            message: "not a directory".to_string(),
        });
    }

    let tree = scan_dir(root)?;
    info!(
        "Scanned {}: {} directories, {} files, {} links",
        root.display(),
        tree.dir_count(),
        tree.file_count(),
        tree.link_count()
    );
    Ok(tree)
}

fn scan_dir(path: &Path) -> Result<DirNode> {
    let mut node = DirNode::new();

    let walker = WalkDir::new(path)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .follow_root_links(true)
        .sort_by_file_name();

    for entry in walker {
        let entry = entry.map_err(|e| Error::Scan {
            path: e.path().unwrap_or(path).to_path_buf(),
            message: e.to_string(),
        })?;
        let entry_path = entry.path();
        let name = entry
            .file_name()
            .to_str()
            .ok_or_else(|| Error::NonUtf8Path {
                path: entry_path.to_path_buf(),
            })?
            .to_string();
        let file_type = entry.file_type();

        if file_type.is_dir() {
            node.dirs.insert(name, scan_dir(entry_path)?);
        } else if file_type.is_symlink() {
            let dest = fs::read_link(entry_path).map_err(|e| Error::Scan {
                path: entry_path.to_path_buf(),
                message: format!("failed to read link: {}", e),
            })?;
            let dest = dest
                .to_str()
                .ok_or_else(|| Error::NonUtf8Path {
                    path: entry_path.to_path_buf(),
                })?
                .to_string();
            node.links.insert(name, dest);
        } else if file_type.is_file() {
            let metadata = entry.metadata()?;
            node.files.insert(name, metadata.ino());
        } else {
            return Err(Error::UnsupportedEntry {
                path: entry_path.to_path_buf(),
            });
        }
    }

    Ok(node)
}
