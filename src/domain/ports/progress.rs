//! Progress Port
//!
//! Incremental `(current, total, message)` events emitted once per processed
//! entry during transfer and once per deployment step. Rendering is left to
//! the sink.

use serde::Serialize;

/// Which phase of a run produced an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressKind {
    Transfer,
    Deploy,
}

/// A single progress update
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressEvent {
    pub kind: ProgressKind,
    pub current: usize,
    pub total: usize,
    pub message: String,
}

impl ProgressEvent {
    pub fn transfer(current: usize, total: usize, message: impl Into<String>) -> Self {
        Self {
            kind: ProgressKind::Transfer,
            current,
            total,
            message: message.into(),
        }
    }

    pub fn deploy(current: usize, total: usize, message: impl Into<String>) -> Self {
        Self {
            kind: ProgressKind::Deploy,
            current,
            total,
            message: message.into(),
        }
    }
}

/// Trait for receiving progress events
///
/// Implementations can be:
/// - ConsoleProgress: progress bar in the terminal
/// - JsonProgress: NDJSON event stream for CI
/// - NoopProgress: silent operation
pub trait ProgressSink: Send + Sync {
    /// Handle a progress event
    fn on_progress(&self, event: ProgressEvent);

    /// Called once a phase has emitted its last event
    fn finish(&self, _kind: ProgressKind) {}
}

/// No-op sink for silent operation
pub struct NoopProgress;

impl ProgressSink for NoopProgress {
    fn on_progress(&self, _event: ProgressEvent) {}
}
