//! Property tests for remote home expansion and shell quoting.

use proptest::prelude::*;

use tugboat::domain::value_objects::{
    expand_remote_home, is_home_relative, shell_quote, shell_word,
};

fn relative_suffix() -> impl Strategy<Value = String> {
    let segment = proptest::string::string_regex("[A-Za-z0-9._-]{1,16}").unwrap();
    proptest::collection::vec(segment, 1..=4).prop_map(|segments| segments.join("/"))
}

fn home() -> impl Strategy<Value = String> {
    proptest::string::string_regex("/[a-z]{1,8}(/[a-z]{1,8}){0,2}").unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: `~/suffix` expands to `home/suffix`.
    #[test]
    fn property_tilde_expansion(home in home(), suffix in relative_suffix()) {
        let raw = format!("~/{}", suffix);
        prop_assert!(is_home_relative(&raw));
        prop_assert_eq!(expand_remote_home(&raw, &home), format!("{}/{}", home, suffix));
    }

    /// PROPERTY: Paths without the home shorthand are never rewritten.
    #[test]
    fn property_other_paths_untouched(raw in "[A-Za-z0-9./_~-]{0,48}", home in home()) {
        prop_assume!(!is_home_relative(&raw));
        prop_assert_eq!(expand_remote_home(&raw, &home), raw);
    }

    /// PROPERTY: A quoted string is one single-quoted shell word.
    #[test]
    fn property_shell_quote_is_single_word(s in "(?s).{0,64}") {
        let quoted = shell_quote(&s);
        prop_assert!(quoted.starts_with('\''));
        prop_assert!(quoted.ends_with('\''));
        // Only the escape sequence may break out of the quotes
        prop_assert_eq!(quoted.matches('\'').count(), 2 + 3 * s.matches('\'').count());
    }

    /// PROPERTY: `shell_word` never leaves shell metacharacters unquoted.
    #[test]
    fn property_shell_word_is_safe(s in "(?s).{0,32}") {
        let word = shell_word(&s);
        if word != s {
            prop_assert_eq!(word, shell_quote(&s));
        } else {
            prop_assert!(!s.is_empty());
            prop_assert!(!s.contains([' ', ';', '&', '|', '$', '`', '\'', '"', '\n', '*', '>', '<']));
        }
    }
}
