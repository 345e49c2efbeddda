//! Sync plan and report entities

use serde::Serialize;

use super::TransferItem;

/// Output of the scan phase, consumed by the transfer phase.
#[derive(Debug, Clone, Default)]
pub struct SyncPlan {
    /// Files to compare, in enumeration order
    pub items: Vec<TransferItem>,
    /// Destination directories created while scanning
    pub directories_created: usize,
    /// Ignored nodes; a pruned directory counts once, its contents not at all
    pub ignored_count: usize,
}

impl SyncPlan {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total bytes of all candidate files
    pub fn total_bytes(&self) -> u64 {
        self.items.iter().map(|item| item.entry.size).sum()
    }
}

/// Terminal summary of one sync run.
///
/// `checked == transferred + skipped` always holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub checked: usize,
    pub transferred: usize,
    pub skipped: usize,
    pub ignored: usize,
}

impl SyncReport {
    /// Check if the run moved any data
    pub fn has_changes(&self) -> bool {
        self.transferred > 0
    }
}
