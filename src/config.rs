//! # Configuration Schema and Parsing
//!
//! This module defines the YAML configuration read by `mirror-split` and the
//! derivation of [`Target`]s from it.
//!
//! ```yaml
//! ftp-path: /srv/ftp/master
//! tree-root-path: /srv/trees
//! tree-database-path: /srv/trees/db
//! basic-trees: [i386, amd64]
//! combination-trees:
//!   popular: [i386, amd64, all, source]
//! ```
//!
//! ## Target derivation
//!
//! - A **basic tree** `a` becomes target `a` carrying architectures `a` and
//!   `all`, with source included.
//! - A **combination tree** lists its architectures explicitly. The
//!   pseudo-architecture `source` is dropped from the list and turns source
//!   inclusion on.
//!
//! Basic trees come first, then combination trees, each in the order the
//! file lists them. Each target's tree lives at `<tree-root-path>/<name>` and its
//! snapshot at `<tree-database-path>/<name>.db`.
//!
//! The configuration is loaded once and passed explicitly to whatever needs
//! it; nothing here is global.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};
use crate::target::{Target, ARCH_INDEPENDENT, SOURCE_PSEUDO_ARCH};

/// Default configuration file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILENAME: &str = "mirror-split.yaml";

/// Environment variable naming the configuration file.
pub const CONFIG_ENV_VAR: &str = "MIRROR_SPLIT_CONFIG";

/// The `mirror-split` configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    /// Root of the master tree
    pub ftp_path: PathBuf,
    /// Directory holding one subdirectory per target
    pub tree_root_path: PathBuf,
    /// Directory holding one snapshot file per target
    pub tree_database_path: PathBuf,
    /// Single-architecture trees (architecture plus `all`, with source)
    #[serde(default)]
    pub basic_trees: Vec<String>,
    /// Named trees with an explicit architecture list
    #[serde(default)]
    pub combination_trees: CombinationTrees,
}

/// `combination-trees` entries in file order.
///
/// A YAML mapping deserialized into a `Vec`, so targets are listed and run in
/// the order the operator wrote them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CombinationTrees(pub Vec<(String, Vec<String>)>);

impl CombinationTrees {
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.0.iter().map(|(name, archs)| (name, archs))
    }

    pub fn names(&self) -> impl Iterator<Item = &String> {
        self.0.iter().map(|(name, _)| name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for CombinationTrees {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, archs) in &self.0 {
            map.serialize_entry(name, archs)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for CombinationTrees {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct OrderedVisitor;

        impl<'de> Visitor<'de> for OrderedVisitor {
            type Value = CombinationTrees;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a mapping of tree names to architecture lists")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some(entry) = access.next_entry()? {
                    entries.push(entry);
                }
                Ok(CombinationTrees(entries))
            }
        }

        deserializer.deserialize_map(OrderedVisitor)
    }
}

impl Config {
    /// Every configured target, basic trees first.
    pub fn targets(&self) -> Vec<Target> {
        let basic = self.basic_trees.iter().map(|arch| {
            Target::under(
                arch,
                &self.tree_root_path,
                &self.tree_database_path,
                [arch.as_str(), ARCH_INDEPENDENT],
                true,
            )
        });

        let combination = self.combination_trees.iter().map(|(name, archs)| {
            let source = archs.iter().any(|a| a == SOURCE_PSEUDO_ARCH);
            Target::under(
                name,
                &self.tree_root_path,
                &self.tree_database_path,
                archs.iter().filter(|a| *a != SOURCE_PSEUDO_ARCH).cloned(),
                source,
            )
        });

        basic.chain(combination).collect()
    }

    /// Check target names for clashes and values that would escape the
    /// tree root.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        let names = self
            .basic_trees
            .iter()
            .chain(self.combination_trees.names());

        for name in names {
            if name.is_empty() || name == "." || name == ".." || name.contains('/') {
                return Err(Error::ConfigParse {
                    message: format!("invalid target name '{}'", name),
                    hint: Some(
                        "Target names become directory names and must not be empty or contain '/'"
                            .to_string(),
                    ),
                });
            }
            if !seen.insert(name.as_str()) {
                return Err(Error::ConfigParse {
                    message: format!("duplicate target name '{}'", name),
                    hint: Some(
                        "Each name may appear once across basic-trees and combination-trees"
                            .to_string(),
                    ),
                });
            }
        }

        Ok(())
    }
}

/// Parse and validate a configuration from YAML text.
pub fn parse(yaml: &str) -> Result<Config> {
    let config: Config = serde_yaml::from_str(yaml).map_err(|e| Error::ConfigParse {
        message: e.to_string(),
        hint: Some("Required keys: ftp-path, tree-root-path, tree-database-path".to_string()),
    })?;
    config.validate()?;
    Ok(config)
}

/// Read, parse and validate a configuration file.
pub fn from_file(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    parse(&content)
}
