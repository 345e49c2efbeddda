//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `fs/` - Endpoint implementations (Local, Remote)
//! - `ssh` - SSH session, the remote command runner

pub mod fs;
pub mod ssh;

// Re-export for convenience
pub use fs::{LocalFs, RemoteFs};
pub use ssh::{SshSession, SshTarget};
