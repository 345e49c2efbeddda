//! Property tests for size + mtime change detection.

use std::time::{Duration, UNIX_EPOCH};

use proptest::prelude::*;

use tugboat::domain::ports::FileMeta;
use tugboat::domain::services::needs_transfer;

fn file(size: u64, millis: u64) -> FileMeta {
    FileMeta {
        size,
        is_dir: false,
        modified: UNIX_EPOCH + Duration::from_millis(millis),
        mode: Some(0o644),
    }
}

fn timestamp() -> impl Strategy<Value = u64> {
    // Stay clear of the epoch so `modified - 1s` never saturates
    10_000u64..4_000_000_000_000u64
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: A missing destination always needs a transfer.
    #[test]
    fn property_missing_dest_transfers(size in any::<u64>(), t in timestamp()) {
        prop_assert!(needs_transfer(&file(size, t), None));
    }

    /// PROPERTY: A size mismatch always needs a transfer, whatever the clocks say.
    #[test]
    fn property_size_mismatch_transfers(
        a in any::<u64>(),
        b in any::<u64>(),
        t1 in timestamp(),
        t2 in timestamp(),
    ) {
        prop_assume!(a != b);
        prop_assert!(needs_transfer(&file(a, t1), Some(&file(b, t2))));
    }

    /// PROPERTY: A copy is up to date with itself.
    #[test]
    fn property_identical_file_is_skipped(size in any::<u64>(), t in timestamp()) {
        let meta = file(size, t);
        prop_assert!(!needs_transfer(&meta, Some(&meta)));
    }

    /// PROPERTY: Same size, destination at most one second older: skipped.
    #[test]
    fn property_within_tolerance_is_skipped(
        size in any::<u64>(),
        t in timestamp(),
        lag in 0u64..1000,
    ) {
        prop_assert!(!needs_transfer(&file(size, t), Some(&file(size, t - lag + 1))));
    }

    /// PROPERTY: Same size, destination a full second or more older: transferred.
    #[test]
    fn property_stale_dest_transfers(
        size in any::<u64>(),
        t in timestamp(),
        lag in 1000u64..10_000,
    ) {
        prop_assert!(needs_transfer(&file(size, t), Some(&file(size, t - lag))));
    }

    /// PROPERTY: A directory in the way of a file is always replaced.
    #[test]
    fn property_directory_dest_transfers(size in any::<u64>(), t in timestamp()) {
        let mut dest = file(size, t);
        dest.is_dir = true;
        prop_assert!(needs_transfer(&file(size, t), Some(&dest)));
    }
}
