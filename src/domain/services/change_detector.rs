//! Change detection
//!
//! Size plus modification time, with a one second window to absorb clock
//! skew and coarse filesystem timestamps. This is not a checksum: an edit
//! that keeps the size and lands inside the window goes unnoticed.

use std::time::{Duration, UNIX_EPOCH};

use crate::domain::ports::FileMeta;

/// How far the destination timestamp may lag behind the source.
pub const MTIME_TOLERANCE: Duration = Duration::from_secs(1);

/// Decide whether `source` must be copied over `dest`.
///
/// The destination is up to date only when it exists, is a file, has the
/// exact same size, and was modified after `source.modified - 1s`.
pub fn needs_transfer(source: &FileMeta, dest: Option<&FileMeta>) -> bool {
    let Some(dest) = dest else {
        return true;
    };

    if dest.is_dir || dest.size != source.size {
        return true;
    }

    let threshold = source
        .modified
        .checked_sub(MTIME_TOLERANCE)
        .unwrap_or(UNIX_EPOCH);

    dest.modified <= threshold
}
