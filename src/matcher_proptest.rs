//! Property-based tests for path applicability.
//!
//! These tests use proptest to generate archive paths and target selections
//! and check that the matcher's rules hold for all of them.

#[cfg(test)]
mod proptest_tests {
    use crate::matcher::{applicable, classify, PathCategory};
    use crate::target::Target;
    use proptest::prelude::*;

    fn arch() -> impl Strategy<Value = String> {
        "[a-z0-9]{1,8}"
    }

    fn target(archs: Vec<String>, source: bool) -> Target {
        Target::new("t", "/trees/t".into(), "/db/t.db".into(), archs, source)
    }

    proptest! {
        /// Property: a pool binary package is applicable exactly when its
        /// architecture is one of the target's
        #[test]
        fn pool_binary_follows_arch_set(
            name in "[a-z0-9.+-]{1,12}",
            pkg_arch in arch(),
            archs in prop::collection::vec(arch(), 0..4),
            source in any::<bool>(),
            udeb in any::<bool>(),
        ) {
            let ext = if udeb { "udeb" } else { "deb" };
            let path = format!("/pool/main/x/{}/{}_{}.{}", name, name, pkg_arch, ext);
            let expected = archs.contains(&pkg_arch);
            prop_assert_eq!(applicable(&path, &target(archs, source)), expected);
        }

        /// Property: source package parts follow the source flag alone
        #[test]
        fn pool_source_follows_flag(
            name in "[a-z0-9]{1,12}",
            suffix in prop::sample::select(vec![".dsc", ".orig.tar.gz", ".diff.gz"]),
            archs in prop::collection::vec(arch(), 0..4),
            source in any::<bool>(),
        ) {
            let path = format!("/pool/main/x/{}/{}_1.0{}", name, name, suffix);
            prop_assert_eq!(applicable(&path, &target(archs, source)), source);
        }

        /// Property: binary index directories follow the arch set
        #[test]
        fn dist_binary_dir_follows_arch_set(
            suite in "[a-z]{3,10}",
            dir_arch in arch(),
            archs in prop::collection::vec(arch(), 0..4),
        ) {
            let path = format!("/dists/{}/main/binary-{}/Packages.gz", suite, dir_arch);
            let expected = archs.contains(&dir_arch);
            prop_assert_eq!(applicable(&path, &target(archs, false)), expected);
        }

        /// Property: documentation is in every target
        #[test]
        fn docs_always_applicable(
            rest in "[a-zA-Z0-9/._-]{0,30}",
            archs in prop::collection::vec(arch(), 0..4),
            source in any::<bool>(),
        ) {
            let path = format!("/doc/{}", rest);
            prop_assert_eq!(classify(&path), PathCategory::VerbatimPrefix);
            prop_assert!(applicable(&path, &target(archs, source)));
        }

        /// Property: unmatched top-level paths are in no target
        #[test]
        fn unmatched_never_applicable(
            top in "[a-z]{1,10}",
            rest in "[a-z0-9/._-]{0,20}",
            archs in prop::collection::vec(arch(), 0..4),
            source in any::<bool>(),
        ) {
            prop_assume!(!["pool", "dists", "project", "tools", "doc"].contains(&top.as_str()));
            prop_assume!(!top.starts_with("README"));
            let path = format!("/{}/{}", top, rest);
            prop_assert!(!applicable(&path, &target(archs, source)));
        }
    }
}
