//! Domain Services
//!
//! Sync logic that operates on entities through ports.
//! Nothing here knows whether an endpoint is local or remote.

mod change_detector;
mod tree_enumerator;

pub use change_detector::{needs_transfer, MTIME_TOLERANCE};
pub use tree_enumerator::{join_relative, TreeWalker};
