//! Tugboat - push a project to a remote host and redeploy its container
//!
//! Tugboat mirrors a local directory tree onto a remote host over SSH,
//! copying only files whose size or modification time changed, then
//! rebuilds and restarts the Docker container built from it. The same
//! engine pulls the remote tree back down.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod presentation;
pub mod ui;

// Re-exports for convenience
pub use application::deploy::{DeployOutcome, DeploySpec, DeploymentSequencer};
pub use application::sync::{Direction, SyncEngine};
pub use config::Config;
pub use domain::entities::SyncReport;
pub use domain::value_objects::IgnoreRules;
pub use error::{TugboatError, TugboatResult};
pub use infrastructure::{LocalFs, RemoteFs, SshSession, SshTarget};
