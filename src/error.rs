//! Error types for tugboat
//!
//! Uses `thiserror` for library errors. Each variant carries enough context
//! (path, step) to tell the user where things went wrong.

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::ports::{CommandError, EndpointError};

/// Result type alias for tugboat operations
pub type TugboatResult<T> = Result<T, TugboatError>;

/// Main error type for tugboat operations
#[derive(Error, Debug)]
pub enum TugboatError {
    /// Configuration missing, unreadable or invalid
    #[error("configuration error: {0}")]
    Config(String),

    /// The SSH connection could not be established
    #[error("connection to {destination} failed: {source}")]
    Connection {
        destination: String,
        #[source]
        source: CommandError,
    },

    /// The remote home directory could not be determined
    #[error("could not resolve remote home directory: {0}")]
    RemoteHome(#[source] EndpointError),

    /// The source tree could not be enumerated
    #[error("failed to scan {root}: {source}")]
    Scan {
        root: PathBuf,
        #[source]
        source: EndpointError,
    },

    /// A single file could not be transferred
    #[error("failed to transfer {path}: {source}")]
    Transfer {
        path: String,
        #[source]
        source: EndpointError,
    },

    /// A fatal deployment step failed
    #[error("deployment step '{step}' failed: {source}")]
    Deployment {
        step: String,
        #[source]
        source: CommandError,
    },

    /// The user declined a confirmation prompt
    #[error("aborted by user")]
    Aborted,
}
