//! Domain Entities
//!
//! Values created by one sync pass and discarded after it.
//! - `Entry` - A file or directory seen during enumeration
//! - `TransferItem` - A file selected for comparison in phase 2
//! - `SyncPlan` - Phase 1 output
//! - `SyncReport` - Terminal summary of a run

mod entry;
mod sync_plan;

pub use entry::{Entry, TransferItem};
pub use sync_plan::{SyncPlan, SyncReport};
