//! Application Layer
//!
//! Use cases that orchestrate the business flow.
//! This layer:
//! - Depends on Domain layer (entities, services, ports)
//! - Does NOT contain business rules (those are in Domain)
//! - Coordinates between Infrastructure and Domain
//!
//! ## Use Cases
//!
//! - `SyncEngine` - Scan and transfer a tree between two endpoints (push and pull)
//! - `DeploymentSequencer` - Rebuild and restart the container on the remote host

pub mod deploy;
pub mod sync;

pub use deploy::{DeployOutcome, DeploySpec, DeploymentSequencer, DeploymentStep};
pub use sync::{inspect_folder, Direction, FolderSummary, SyncEngine};
