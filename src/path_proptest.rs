//! Property-based tests for path manipulation functions.
//!
//! These tests use proptest to generate random inputs and verify that
//! invariants hold for all possible inputs.

#[cfg(test)]
mod proptest_tests {
    use crate::path::{clean_path, clean_str, is_probably_module, path_key, split_path_version};
    use proptest::prelude::*;

    // ============================================================================
    // path_key property tests
    // ============================================================================

    proptest! {
        /// Property: path_key never contains uppercase characters
        #[test]
        fn path_key_is_lowercase(input in "[A-Za-z0-9./_-]{0,40}") {
            let key = path_key(&input);
            prop_assert!(!key.chars().any(|c| c.is_ascii_uppercase()), "{:?}", key);
        }

        /// Property: path_key ignores case (version suffixes aside)
        #[test]
        fn path_key_ignores_case(input in "[A-UW-Za-uw-z0-9./-]{1,40}") {
            prop_assert_eq!(path_key(&input.to_uppercase()), path_key(&input.to_lowercase()));
        }

        /// Property: every major version of a module shares one key
        #[test]
        fn path_key_ignores_major_version(
            host in "[a-z]{1,10}\\.(com|org|io)",
            repo in "[a-uw-z][a-z0-9-]{0,15}",
            major in 2u32..100,
        ) {
            let base = format!("{}/{}", host, repo);
            let versioned = format!("{}/v{}", base, major);
            prop_assert_eq!(path_key(&versioned), path_key(&base));
        }

        /// Property: split_path_version returns a prefix and suffix that
        /// concatenate back to the input
        #[test]
        fn split_path_version_reassembles(input in "[a-z0-9./v-]{0,40}") {
            let (prefix, suffix) = split_path_version(&input);
            prop_assert_eq!(format!("{}{}", prefix, suffix), input);
        }
    }

    // ============================================================================
    // clean_path property tests
    // ============================================================================

    proptest! {
        /// Property: cleaning is idempotent
        #[test]
        fn clean_path_is_idempotent(input in "[a-z./]{0,30}") {
            let once = clean_path(&input);
            prop_assert_eq!(clean_path(&once), once);
        }

        /// Property: a cleaned path never contains `.` components or empty
        /// segments
        #[test]
        fn clean_str_has_no_dot_or_empty_segments(input in "[a-z]{1,5}(/{1,3}(\\.|[a-z]{1,5})){0,6}") {
            let cleaned = clean_str(&input);
            let segments: Vec<&str> = cleaned.split('/').collect();
            prop_assert!(segments.iter().all(|s| !s.is_empty()), "empty segment in {:?}", cleaned);
            prop_assert!(segments.iter().all(|s| *s != "."), "dot segment in {:?}", cleaned);
        }

        /// Property: cleaning never fails to produce a non-empty path
        #[test]
        fn clean_path_is_never_empty(input in ".{0,30}") {
            prop_assert!(!clean_path(&input).as_os_str().is_empty());
        }
    }

    // ============================================================================
    // is_probably_module property tests
    // ============================================================================

    proptest! {
        /// Property: single-segment names without a dot are never fetchable
        #[test]
        fn plain_theme_names_are_not_modules(name in "[a-zA-Z0-9_-]{1,20}") {
            prop_assert!(!is_probably_module(&name));
        }

        /// Property: host-like paths are fetchable
        #[test]
        fn host_paths_are_modules(
            host in "[a-z][a-z0-9]{0,10}\\.(com|org|io)",
            rest in proptest::collection::vec("[A-Za-z0-9_-]{1,10}", 0..4),
        ) {
            let mut path = host;
            for segment in rest {
                path.push('/');
                path.push_str(&segment);
            }
            prop_assert!(is_probably_module(&path), "{} should be a module path", path);
        }
    }
}
