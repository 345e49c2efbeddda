//! Sync Module
//!
//! Moves a directory tree between two endpoints in two phases:
//!
//! 1. Scan - walk the source, create destination directories, collect files
//! 2. Transfer - compare each file against the destination and copy it when
//!    it changed
//!
//! Both phases are idempotent, so an interrupted run is resumed by running
//! it again.
//!
//! ## Usage
//!
//! ```ignore
//! use tugboat::application::sync::SyncEngine;
//!
//! let engine = SyncEngine::new(LocalFs::new(), remote_fs, rules);
//! let report = engine.push(Path::new("."), "~/app")?;
//! ```

mod engine;
mod inspect;

pub use engine::{Direction, SyncEngine};
pub use inspect::{inspect_folder, FolderSummary};

#[cfg(test)]
mod tests;
