//! Deploy Module
//!
//! Rebuilds and restarts the container workload on the remote host after a
//! successful push.
//!
//! ## Structure
//!
//! - `pipeline` - The fixed step list (`DeploySpec`, `DeploymentStep`)
//! - `result` - Result types (`DeployOutcome`)
//! - `use_case` - Step execution (`DeploymentSequencer`)
//!
//! ## Usage
//!
//! ```ignore
//! use tugboat::application::deploy::{DeploySpec, DeploymentSequencer};
//!
//! let sequencer = DeploymentSequencer::new(session);
//! let outcome = sequencer.run(&DeploySpec::new("myapp", "/home/bob/app"))?;
//! ```

mod pipeline;
mod result;
mod use_case;

pub use pipeline::{DeploySpec, DeploymentStep, FailurePolicy, OutputMode};
pub use result::DeployOutcome;
pub use use_case::DeploymentSequencer;
