//! Deployment Pipeline
//!
//! The fixed list of remote operations that replaces the running container
//! with one built from the freshly synced tree.

use crate::domain::value_objects::shell_word;

/// What a failed step does to the rest of the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Abort; later steps never run
    Fatal,
    /// Log a warning and continue
    Warn,
    /// Log at debug level and continue
    Ignore,
}

/// How a step's output is handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Discarded
    Quiet,
    /// Collected and returned once the command exits
    Captured,
    /// Forwarded line by line while the command runs
    Streamed,
}

/// A single remote operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentStep {
    pub name: &'static str,
    /// Human readable description shown in progress output
    pub label: String,
    pub command: String,
    pub policy: FailurePolicy,
    pub output: OutputMode,
}

/// Everything needed to render the pipeline for one workload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploySpec {
    pub image: String,
    /// Extra `docker build` arguments; empty means `-t`
    pub build_args: String,
    /// Extra `docker run` arguments; empty means `-d`
    pub run_args: String,
    /// Resolved remote directory holding the Dockerfile
    pub context_path: String,
    /// Prefix docker invocations with `sudo`
    pub sudo: bool,
}

impl DeploySpec {
    pub fn new(image: impl Into<String>, context_path: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            build_args: String::new(),
            run_args: String::new(),
            context_path: context_path.into(),
            sudo: true,
        }
    }

    pub fn with_build_args(mut self, args: impl Into<String>) -> Self {
        self.build_args = args.into();
        self
    }

    pub fn with_run_args(mut self, args: impl Into<String>) -> Self {
        self.run_args = args.into();
        self
    }

    pub fn with_sudo(mut self, sudo: bool) -> Self {
        self.sudo = sudo;
        self
    }

    fn docker(&self) -> &'static str {
        if self.sudo {
            "sudo docker"
        } else {
            "docker"
        }
    }

    fn build_args(&self) -> &str {
        match self.build_args.trim() {
            "" => "-t",
            args => args,
        }
    }

    fn run_args(&self) -> &str {
        match self.run_args.trim() {
            "" => "-d",
            args => args,
        }
    }

    /// Check for a Dockerfile in the build context. Never blocks the pipeline.
    pub fn preflight(&self) -> DeploymentStep {
        let dockerfile = format!("{}/Dockerfile", self.context_path.trim_end_matches('/'));
        DeploymentStep {
            name: "preflight",
            label: format!("Checking for {}", dockerfile),
            command: format!("test -f {}", shell_word(&dockerfile)),
            policy: FailurePolicy::Warn,
            output: OutputMode::Quiet,
        }
    }

    /// The four steps, in execution order.
    pub fn steps(&self) -> Vec<DeploymentStep> {
        let docker = self.docker();
        let image = shell_word(&self.image);
        vec![
            DeploymentStep {
                name: "stop",
                label: format!("Stopping containers using image: {}", self.image),
                command: format!(
                    "{docker} ps -aq --filter ancestor={image} | xargs -r {docker} stop | xargs -r {docker} rm"
                ),
                policy: FailurePolicy::Ignore,
                output: OutputMode::Quiet,
            },
            DeploymentStep {
                name: "remove-image",
                label: format!("Removing old image: {}", self.image),
                command: format!("{docker} rmi -f {image} 2>/dev/null || true"),
                policy: FailurePolicy::Ignore,
                output: OutputMode::Quiet,
            },
            DeploymentStep {
                name: "build",
                label: format!("Building new image: {}", self.image),
                command: format!(
                    "cd {} && {docker} build {} {image} .",
                    shell_word(&self.context_path),
                    self.build_args()
                ),
                policy: FailurePolicy::Fatal,
                output: OutputMode::Streamed,
            },
            DeploymentStep {
                name: "run",
                label: format!("Starting container: {}", self.image),
                command: format!("{docker} run {} {image}", self.run_args()),
                policy: FailurePolicy::Fatal,
                output: OutputMode::Captured,
            },
        ]
    }
}
