//! Target definitions
//!
//! A [`Target`] is one partial mirror of the master tree: a name, the
//! directory it lives in, the file its snapshot is persisted to, and the
//! selection (architectures plus optional source) that decides which master
//! paths belong in it. Targets are immutable for the duration of a run.

use std::path::{Path, PathBuf};

/// Pseudo-architecture that, in a combination tree, switches on source
/// inclusion instead of naming an architecture.
pub const SOURCE_PSEUDO_ARCH: &str = "source";

/// Architecture every basic tree includes alongside its own.
pub const ARCH_INDEPENDENT: &str = "all";

/// One configured partial mirror.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Target name, also the last component of `root`
    pub name: String,
    /// Output directory the hardlink tree is maintained in
    pub root: PathBuf,
    /// File the target's snapshot is persisted to
    pub db_path: PathBuf,
    /// Architecture identifiers included in the target
    pub archs: Vec<String>,
    /// Whether source packages are included
    pub source: bool,
}

impl Target {
    /// Create a target from explicit paths.
    pub fn new<S, I>(name: &str, root: PathBuf, db_path: PathBuf, archs: I, source: bool) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = S>,
    {
        Self {
            name: name.to_string(),
            root,
            db_path,
            archs: archs.into_iter().map(Into::into).collect(),
            source,
        }
    }

    /// Create a target laid out under the configured tree and database roots.
    ///
    /// The tree goes to `<tree_root>/<name>` and the snapshot to
    /// `<db_root>/<name>.db`.
    pub fn under<S, I>(name: &str, tree_root: &Path, db_root: &Path, archs: I, source: bool) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = S>,
    {
        Self::new(
            name,
            tree_root.join(name),
            db_root.join(format!("{}.db", name)),
            archs,
            source,
        )
    }

    /// Whether `arch` is one of this target's architectures.
    pub fn has_arch(&self, arch: &str) -> bool {
        self.archs.iter().any(|a| a == arch)
    }

    /// Human readable description used by `--list`.
    pub fn describe(&self) -> String {
        let mut line = format!("{} contains {}", self.name, self.archs.join(", "));
        if self.source {
            line.push_str(" [source]");
        }
        line
    }
}
