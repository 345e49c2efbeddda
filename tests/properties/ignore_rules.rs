//! Property tests for ignore rule matching.

use proptest::prelude::*;

use tugboat::domain::value_objects::IgnoreRules;

fn segment() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9_-][A-Za-z0-9._-]{0,11}").unwrap()
}

fn relative_path() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec(segment(), 1..=5)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Compiling arbitrary pattern text never panics.
    #[test]
    fn property_compile_never_panics(patterns in proptest::collection::vec("(?s).{0,32}", 0..8)) {
        let _ = IgnoreRules::compile(&patterns);
    }

    /// PROPERTY: The empty rule set ignores nothing.
    #[test]
    fn property_empty_rules_ignore_nothing(path in relative_path(), is_dir in any::<bool>()) {
        prop_assert!(!IgnoreRules::empty().is_ignored(&path.join("/"), is_dir));
    }

    /// PROPERTY: An exact name matches whenever it appears as any segment.
    #[test]
    fn property_exact_name_matches_any_segment(
        path in relative_path(),
        index in any::<prop::sample::Index>(),
        is_dir in any::<bool>(),
    ) {
        let name = &path[index.index(path.len())];
        prop_assume!(!name.contains(['*', '?', '[']));
        let rules = IgnoreRules::compile([name.as_str()]).unwrap();

        prop_assert!(rules.is_ignored(&path.join("/"), is_dir));
    }

    /// PROPERTY: A directory rule covers that name as any segment and everything
    /// beneath it, whether the named entry is a file or a directory.
    #[test]
    fn property_directory_rule_covers_descendants(
        dir in segment(),
        rest in relative_path(),
        is_dir in any::<bool>(),
    ) {
        let rules = IgnoreRules::compile([format!("{}/", dir)]).unwrap();
        let path = format!("{}/{}", dir, rest.join("/"));

        prop_assert!(rules.is_ignored(&dir, is_dir));
        prop_assert!(rules.is_ignored(&path, is_dir));
        let nested = format!("{}/{}", rest.join("/"), dir);
        prop_assert!(rules.is_ignored(&nested, is_dir));
    }

    /// PROPERTY: `*.ext` looks at the base name only.
    #[test]
    fn property_extension_glob_matches_base_name(
        parents in proptest::collection::vec(segment(), 0..4),
        stem in "[a-z]{1,8}",
    ) {
        let rules = IgnoreRules::compile(["*.log"]).unwrap();
        let mut segments = parents.clone();
        segments.push(format!("{}.log", stem));
        prop_assert!(rules.is_ignored(&segments.join("/"), false));

        let mut segments = parents;
        segments.push(format!("{}.txt", stem));
        prop_assert!(!rules.is_ignored(&segments.join("/"), false));
    }

    /// PROPERTY: Redundant slashes and `./` segments do not change a decision.
    #[test]
    fn property_path_normalization_is_irrelevant(path in relative_path(), is_dir in any::<bool>()) {
        let rules = IgnoreRules::defaults();
        let plain = path.join("/");
        let noisy = format!("./{}/", path.join("//"));

        prop_assert_eq!(rules.is_ignored(&plain, is_dir), rules.is_ignored(&noisy, is_dir));
    }
}
