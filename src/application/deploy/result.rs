//! Deploy Result
//!
//! Result types for deploy operations.

use serde::Serialize;

/// Result of a completed deployment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeployOutcome {
    /// Trimmed output of `docker run`
    pub container_id: Option<String>,
    /// Non-fatal problems seen along the way
    pub warnings: Vec<String>,
    /// Names of the steps that were attempted, in order
    pub steps_run: Vec<String>,
}

impl DeployOutcome {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
