//! Property tests for the local-copy transport.

use std::fs;

use proptest::prelude::*;
use tempfile::tempdir;

use ferry::{resolve, BackupHandler};

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 48,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: a successful copy is byte-identical and keeps the base name.
    #[test]
    fn property_copy_is_byte_identical(
        name in "[A-Za-z0-9_][A-Za-z0-9_.-]{0,24}",
        bytes in proptest::collection::vec(any::<u8>(), 0..20_000),
    ) {
        let work = tempdir().unwrap();
        let backup = tempdir().unwrap();
        let source = work.path().join(&name);
        fs::write(&source, &bytes).unwrap();

        let uri = format!("file://{}", backup.path().display());
        let handler = BackupHandler::new(resolve(&uri).unwrap());

        prop_assert!(handler.process(&source));
        prop_assert_eq!(fs::read(backup.path().join(&name)).unwrap(), bytes);
    }

    /// PROPERTY: any option other than `create` is rejected, never ignored.
    #[test]
    fn property_unknown_local_option_rejected(key in "[a-z]{1,10}") {
        prop_assume!(key != "create");
        let backup = tempdir().unwrap();

        let uri = format!("file://{}?{key}=1", backup.path().display());
        let err = resolve(&uri).unwrap_err();
        prop_assert!(err.to_string().contains(&key), "{}", err);
    }
}
