//! Property tests for configuration parsing.

use std::path::Path;

use proptest::prelude::*;

use tugboat::config::parse_legacy;
use tugboat::Config;

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: The flat format parser never panics.
    #[test]
    fn property_legacy_parse_never_panics(content in "(?s).{0,512}") {
        let _ = parse_legacy(&content, Path::new("cfg"));
    }

    /// PROPERTY: TOML parsing never panics on arbitrary input.
    #[test]
    fn property_toml_parse_never_panics(content in "(?s).{0,512}") {
        let _ = toml::from_str::<Config>(&content);
    }

    /// PROPERTY: Values keep everything after the first colon.
    #[test]
    fn property_legacy_value_keeps_colons(
        host in "[a-z]{1,12}(\\.[a-z]{1,8}){0,2}",
        port in 1u16..,
    ) {
        let server = format!("{}:{}", host, port);
        let (config, warnings) = parse_legacy(&format!("REMOTE_SERVER: {}\n", server), Path::new("cfg"));

        prop_assert!(warnings.is_empty());
        prop_assert_eq!(config.remote.server, server);
    }

    /// PROPERTY: IGNORE lists drop empty items and surrounding blanks.
    #[test]
    fn property_legacy_ignore_list_is_trimmed(
        items in proptest::collection::vec("[a-z*.]{1,8}", 1..6),
    ) {
        let line = format!("IGNORE: {}\n", items.join(" ,  ,"));
        let (config, _) = parse_legacy(&line, Path::new("cfg"));

        prop_assert_eq!(config.sync.ignore, items);
    }
}
