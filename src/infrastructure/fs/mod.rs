//! File System Implementations
//!
//! Concrete implementations of the Endpoint port.

mod local;
mod remote;

pub use local::LocalFs;
pub use remote::RemoteFs;
