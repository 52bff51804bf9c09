//! Shared test utilities for integration and E2E tests.
//!
//! This module provides an archive fixture: a temporary directory holding a
//! master tree, a tree root for the targets, a database root for their
//! snapshots, and a `mirror-split.yaml` tying them together.
//!
//! ## Usage
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = ArchiveFixture::new()
//!         .with_master_file("pool/main/a/a_amd64.deb", "deb")
//!         .with_config("basic-trees: [amd64]\n");
//!     fixture.command().assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::os::unix::fs::MetadataExt;
use std::path::{Path, PathBuf};

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    #[allow(unused_imports)]
    pub use assert_cmd::cargo::cargo_bin_cmd;
    #[allow(unused_imports)]
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::inode;
    pub use super::ArchiveFixture;
}

/// Inode number of `path`, without following symlinks.
#[allow(dead_code)]
pub fn inode(path: &Path) -> u64 {
    std::fs::symlink_metadata(path)
        .expect("Failed to stat path")
        .ino()
}

fn ensure_parent(path: &Path) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create parent directory");
    }
}

/// A temporary archive layout with a config file pointing into it.
pub struct ArchiveFixture {
    temp_dir: assert_fs::TempDir,
}

#[allow(dead_code)]
impl ArchiveFixture {
    /// Create a fixture with an empty master directory.
    pub fn new() -> Self {
        let temp_dir = assert_fs::TempDir::new().expect("Failed to create temp directory");
        temp_dir
            .child("master")
            .create_dir_all()
            .expect("Failed to create master directory");
        Self { temp_dir }
    }

    /// Write `mirror-split.yaml` with the fixture's paths followed by the
    /// given tree definitions.
    pub fn with_config(self, trees: &str) -> Self {
        let yaml = format!(
            "ftp-path: {}\ntree-root-path: {}\ntree-database-path: {}\n{}",
            self.master().display(),
            self.trees().display(),
            self.db().display(),
            trees
        );
        self.temp_dir
            .child("mirror-split.yaml")
            .write_str(&yaml)
            .expect("Failed to write config file");
        self
    }

    /// Add a regular file to the master tree.
    pub fn with_master_file(self, path: &str, content: &str) -> Self {
        self.write_master_file(path, content);
        self
    }

    /// Add a symlink to the master tree.
    pub fn with_master_symlink(self, path: &str, dest: &str) -> Self {
        let full = self.master_path(path);
        ensure_parent(&full);
        std::os::unix::fs::symlink(dest, &full).expect("Failed to create symlink");
        self
    }

    /// Write a master file, creating parent directories.
    pub fn write_master_file(&self, path: &str, content: &str) {
        let full = self.master_path(path);
        ensure_parent(&full);
        std::fs::write(&full, content).expect("Failed to write master file");
    }

    /// Replace a master file with new content under a new inode.
    pub fn replace_master_file(&self, path: &str, content: &str) {
        let full = self.master_path(path);
        let staged = full.with_extension("staged");
        std::fs::write(&staged, content).expect("Failed to stage replacement");
        std::fs::rename(&staged, &full).expect("Failed to replace master file");
    }

    /// Root of the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Path to the config file.
    pub fn config_path(&self) -> PathBuf {
        self.path().join("mirror-split.yaml")
    }

    /// Root of the master tree.
    pub fn master(&self) -> PathBuf {
        self.path().join("master")
    }

    /// Parent directory of all target trees.
    pub fn trees(&self) -> PathBuf {
        self.path().join("trees")
    }

    /// Parent directory of all snapshots.
    pub fn db(&self) -> PathBuf {
        self.path().join("db")
    }

    /// A path inside the master tree.
    pub fn master_path(&self, path: &str) -> PathBuf {
        self.master().join(path)
    }

    /// A path inside a target tree.
    pub fn target_path(&self, target: &str, path: &str) -> PathBuf {
        self.trees().join(target).join(path)
    }

    /// Create a command running in the fixture directory with its config.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("mirror-split");
        cmd.current_dir(self.path())
            .env_remove("MIRROR_SPLIT_CONFIG")
            .env_remove("RUST_LOG")
            .arg("--config")
            .arg(self.config_path());
        cmd
    }
}

impl Default for ArchiveFixture {
    fn default() -> Self {
        Self::new()
    }
}
