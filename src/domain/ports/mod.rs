//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod command_runner;
pub mod endpoint;
pub mod progress;

pub use command_runner::{
    CommandError, CommandResult, CommandRunner, OutputSink, OutputStream, SilentOutput,
};
pub use endpoint::{
    DirEntry, Endpoint, EndpointError, EndpointResult, FileMeta, FileReader, FileWriter,
};
pub use progress::{NoopProgress, ProgressEvent, ProgressKind, ProgressSink};
