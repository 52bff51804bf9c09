//! # Path Applicability
//!
//! Decides whether a master path belongs in a given target. The decision is
//! made in two steps:
//!
//! 1. [`classify`] assigns the path a [`PathCategory`] by walking an ordered
//!    rule table and taking the first rule that matches. The order of
//!    [`RULES`] is the precedence: pool beats distribution beats the
//!    verbatim allow-lists.
//! 2. [`applicable`] applies the category's selection logic against the
//!    target's architectures and source flag.
//!
//! Paths are rooted at the master tree and always start with `/`, for example
//! `/pool/main/h/hello/hello_2.10-3_amd64.deb`.
//!
//! The predicate is pure and is never cached: a target's configuration may
//! change between runs, and entries that stop matching must be pruned even
//! though the master still has them.

use crate::target::Target;

/// Suffixes identifying source package components under the pool.
const SOURCE_SUFFIXES: &[&str] = &[".tar.gz", ".diff.gz", ".dsc"];

/// Paths copied into every target regardless of architecture.
const VERBATIM: &[&str] = &[];

/// Path prefixes copied into every target regardless of architecture.
const VERBATIM_PREFIXES: &[&str] = &["/tools/", "/README", "/doc/"];

/// Which part of the archive a path lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathCategory {
    /// Package files under `/pool/`
    Pool,
    /// Index files under `/dists/` or `/project/experimental/`
    Distribution,
    /// An exact entry of the verbatim allow-list
    Verbatim,
    /// Under one of the verbatim prefixes (tools, README, documentation)
    VerbatimPrefix,
    /// Anything else; never mirrored
    Unmatched,
}

/// A classification rule: the category assigned when `matches` holds.
pub struct Rule {
    pub category: PathCategory,
    pub matches: fn(&str) -> bool,
}

/// Classification rules, evaluated first-match.
pub const RULES: &[Rule] = &[
    Rule {
        category: PathCategory::Pool,
        matches: |path| path.starts_with("/pool/"),
    },
    Rule {
        category: PathCategory::Distribution,
        matches: |path| path.starts_with("/dists/") || path.starts_with("/project/experimental/"),
    },
    Rule {
        category: PathCategory::Verbatim,
        matches: |path| VERBATIM.iter().any(|entry| *entry == path),
    },
    Rule {
        category: PathCategory::VerbatimPrefix,
        matches: |path| VERBATIM_PREFIXES.iter().any(|prefix| path.starts_with(prefix)),
    },
];

/// Assign `path` to the first category whose rule matches.
pub fn classify(path: &str) -> PathCategory {
    RULES
        .iter()
        .find(|rule| (rule.matches)(path))
        .map_or(PathCategory::Unmatched, |rule| rule.category)
}

/// Whether `path` belongs in `target`.
pub fn applicable(path: &str, target: &Target) -> bool {
    match classify(path) {
        PathCategory::Pool => pool_match(path, target),
        PathCategory::Distribution => dist_match(path, target),
        PathCategory::Verbatim | PathCategory::VerbatimPrefix => true,
        PathCategory::Unmatched => false,
    }
}

/// Pool files are binary packages for one of the target's architectures, or
/// source package parts when the target carries source.
fn pool_match(path: &str, target: &Target) -> bool {
    let binary = target.archs.iter().any(|arch| {
        path.ends_with(&format!("_{}.deb", arch)) || path.ends_with(&format!("_{}.udeb", arch))
    });
    binary || (target.source && SOURCE_SUFFIXES.iter().any(|suffix| path.ends_with(suffix)))
}

/// Distribution files are kept unless they are tagged for an architecture
/// (or for source) the target does not carry.
fn dist_match(path: &str, target: &Target) -> bool {
    let arch_tagged = target.archs.iter().any(|arch| {
        path.ends_with(&format!("/Contents-{}.gz", arch))
            || path.contains(&format!("/binary-{}/", arch))
            || path.contains(&format!("/installer-{}/", arch))
    });
    if arch_tagged {
        return true;
    }
    if path.contains("/source/") {
        return target.source;
    }
    !["/Contents-", "/binary-", "/installer-"]
        .iter()
        .any(|marker| path.contains(marker))
}
