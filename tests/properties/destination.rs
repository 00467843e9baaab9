//! Property tests for destination parsing.

use proptest::prelude::*;

use ferry::{Destination, FerryError};

fn word() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z][a-z0-9]{0,11}").unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: parsing never panics, whatever the input.
    #[test]
    fn property_parse_never_panics(input in "\\PC{0,80}") {
        let _ = Destination::parse(&input);
    }

    /// PROPERTY: a password never shows up in the display name or in errors.
    #[test]
    fn property_password_is_redacted(
        user in word(),
        password in "[A-Za-z0-9]{6,16}",
        host in word(),
        option in word(),
    ) {
        prop_assume!(!user.contains(&password) && !host.contains(&password));
        prop_assume!(!option.contains(&password));

        let uri = format!("http://{user}:{password}@{host}/up?{option}=1");
        let destination = Destination::parse(&uri).unwrap();
        prop_assert!(!destination.display_name().contains(&password));

        let err = ferry::resolve(&uri).unwrap_err();
        prop_assert!(!err.to_string().contains(&password));
    }

    /// PROPERTY: schemes outside the supported set are always UnsupportedScheme.
    #[test]
    fn property_unknown_scheme_rejected(scheme in "[a-z]{2,8}", host in word()) {
        prop_assume!(!["file", "scp", "cscp", "http", "https"].contains(&scheme.as_str()));

        let err = Destination::parse(&format!("{scheme}://{host}/x")).unwrap_err();
        let is_unsupported = matches!(err, FerryError::UnsupportedScheme { .. });
        prop_assert!(is_unsupported, "{}", err);
    }

    /// PROPERTY: every query key reaches the options map, decoded.
    #[test]
    fn property_query_keys_preserved(keys in proptest::collection::btree_set(word(), 1..5)) {
        let query: Vec<String> = keys.iter().map(|k| format!("{k}=v%20{k}")).collect();
        let uri = format!("cscp://host/dir?{}", query.join("&"));

        let destination = Destination::parse(&uri).unwrap();
        for key in &keys {
            let expected = format!("v {key}");
            prop_assert_eq!(destination.options().get_all(key), &[expected][..]);
        }
    }
}
