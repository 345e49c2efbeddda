//! Use Case Factory
//!
//! Creates the sync engine and the deployment sequencer with infrastructure
//! dependencies wired up. This is the dependency injection point for the
//! application.

use std::sync::Arc;

use crate::application::deploy::DeploymentSequencer;
use crate::application::sync::SyncEngine;
use crate::config::Config;
use crate::domain::ports::{OutputSink, ProgressSink};
use crate::error::{TugboatError, TugboatResult};
use crate::infrastructure::{LocalFs, RemoteFs, SshSession};
use crate::presentation::context::UiContext;
use crate::presentation::output::ConsoleOutput;
use crate::presentation::progress::{ConsoleProgress, JsonProgress};

/// Sync engine between the local disk and an SSH host
pub type ConcreteSyncEngine = SyncEngine<LocalFs, RemoteFs>;

/// Sequencer running commands on the host behind a `RemoteFs`
pub type RemoteSequencer<'a> = DeploymentSequencer<&'a SshSession>;

/// Open the SSH session described by the configuration and check that the
/// remote end answers.
pub fn connect(config: &Config) -> TugboatResult<RemoteFs> {
    let target = config.ssh_target();
    let destination = target.destination();
    let session = SshSession::connect(target)
        .map_err(|source| TugboatError::Connection { destination, source })?;
    Ok(RemoteFs::new(session))
}

/// Progress sink matching the output mode
pub fn create_progress(ui: &UiContext) -> Arc<dyn ProgressSink> {
    if ui.json {
        Arc::new(JsonProgress::new())
    } else {
        Arc::new(ConsoleProgress::new(ui.caps, ui.animation))
    }
}

/// Sink for streamed build output. JSON mode keeps stdout machine readable,
/// so build output is only echoed for humans.
pub fn create_output(ui: &UiContext) -> Arc<dyn OutputSink> {
    if ui.json {
        Arc::new(crate::domain::ports::SilentOutput)
    } else {
        Arc::new(ConsoleOutput::new(ui.color))
    }
}

/// Create a sync engine with all dependencies wired up
pub fn create_sync_engine(
    config: &Config,
    remote: RemoteFs,
    progress: Arc<dyn ProgressSink>,
) -> TugboatResult<ConcreteSyncEngine> {
    let rules = config.ignore_rules()?;
    Ok(SyncEngine::new(LocalFs::new(), remote, rules).with_progress(progress))
}

/// Create a deployment sequencer sharing the engine's SSH session
pub fn create_sequencer<'a>(
    session: &'a SshSession,
    progress: Arc<dyn ProgressSink>,
    output: Arc<dyn OutputSink>,
) -> RemoteSequencer<'a> {
    DeploymentSequencer::new(session)
        .with_progress(progress)
        .with_output(output)
}
