//! Deployment Sequencer
//!
//! Runs the pipeline strictly in order. A Fatal failure stops it; nothing
//! that already ran is undone.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::ports::{
    CommandResult, CommandRunner, NoopProgress, OutputSink, ProgressEvent, ProgressKind,
    ProgressSink, SilentOutput,
};
use crate::error::{TugboatError, TugboatResult};

use super::pipeline::{DeploySpec, DeploymentStep, FailurePolicy, OutputMode};
use super::result::DeployOutcome;

/// Drives the deployment pipeline through a command runner
pub struct DeploymentSequencer<C>
where
    C: CommandRunner,
{
    runner: C,
    progress: Arc<dyn ProgressSink>,
    output: Arc<dyn OutputSink>,
}

impl<C> DeploymentSequencer<C>
where
    C: CommandRunner,
{
    pub fn new(runner: C) -> Self {
        Self {
            runner,
            progress: Arc::new(NoopProgress),
            output: Arc::new(SilentOutput),
        }
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressSink>) -> Self {
        self.progress = progress;
        self
    }

    /// Where streamed build output goes
    pub fn with_output(mut self, output: Arc<dyn OutputSink>) -> Self {
        self.output = output;
        self
    }

    pub fn run(&self, spec: &DeploySpec) -> TugboatResult<DeployOutcome> {
        let mut outcome = DeployOutcome::default();

        let preflight = spec.preflight();
        if let Err(e) = self.execute(&preflight) {
            warn!(path = %spec.context_path, "Dockerfile not found in build context");
            debug!(error = %e, "preflight check failed");
            outcome
                .warnings
                .push(format!("Dockerfile not found in {}", spec.context_path));
        }

        let steps = spec.steps();
        let total = steps.len();
        for (index, step) in steps.iter().enumerate() {
            self.progress
                .on_progress(ProgressEvent::deploy(index + 1, total, step.label.clone()));
            info!(step = step.name, "{}", step.label);
            outcome.steps_run.push(step.name.to_string());

            match self.execute(step) {
                Ok(Some(captured)) => {
                    let captured = captured.trim();
                    if step.name == "run" && !captured.is_empty() {
                        info!(container = captured, "container started");
                        outcome.container_id = Some(captured.to_string());
                    }
                }
                Ok(None) => {}
                Err(source) => match step.policy {
                    FailurePolicy::Fatal => {
                        self.progress.finish(ProgressKind::Deploy);
                        return Err(TugboatError::Deployment {
                            step: step.name.to_string(),
                            source,
                        });
                    }
                    FailurePolicy::Warn => {
                        warn!(step = step.name, error = %source, "step failed, continuing");
                        outcome.warnings.push(format!("{}: {}", step.name, source));
                    }
                    FailurePolicy::Ignore => {
                        debug!(step = step.name, error = %source, "step failed, ignored");
                    }
                },
            }
        }

        self.progress.finish(ProgressKind::Deploy);
        Ok(outcome)
    }

    /// Run one step in its output mode. Captured output comes back as `Some`.
    fn execute(&self, step: &DeploymentStep) -> CommandResult<Option<String>> {
        match step.output {
            OutputMode::Quiet => self.runner.run_quiet(&step.command).map(|_| None),
            OutputMode::Captured => self.runner.run_captured(&step.command).map(Some),
            OutputMode::Streamed => self
                .runner
                .run_streamed(&step.command, self.output.as_ref())
                .map(|_| None),
        }
    }
}
