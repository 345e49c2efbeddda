//! Command Runner Port
//!
//! Executes shell commands on the remote host. The deployment sequencer only
//! talks to this trait, which keeps the pipeline testable without a server.

/// Result type for remote command execution
pub type CommandResult<T> = Result<T, CommandError>;

/// Remote command execution errors
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// The local client (`ssh`, `sshpass`) could not be started
    #[error("failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The command ran and exited unsuccessfully
    #[error("'{command}' exited with {}{}", status_label(.status), stderr_suffix(.stderr))]
    Failed {
        command: String,
        status: Option<i32>,
        stderr: String,
    },

    /// Reading output or waiting for the process failed
    #[error("I/O error while running '{command}': {source}")]
    Io {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

fn status_label(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("status {}", code),
        None => "a signal".to_string(),
    }
}

fn stderr_suffix(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {}", trimmed)
    }
}

/// Which output channel a streamed line came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputStream {
    Stdout,
    Stderr,
}

/// Receives lines of a streamed command as they are produced.
///
/// Both channels are drained concurrently, so implementations are shared
/// between two reader threads.
pub trait OutputSink: Sync {
    fn on_line(&self, stream: OutputStream, line: &str);
}

/// Discards streamed output
pub struct SilentOutput;

impl OutputSink for SilentOutput {
    fn on_line(&self, _stream: OutputStream, _line: &str) {}
}

/// Remote command execution
///
/// Implementations:
/// - `SshSession` - runs commands through the `ssh` client
pub trait CommandRunner {
    /// Run a command, discarding its output
    fn run_quiet(&self, command: &str) -> CommandResult<()>;

    /// Run a command and return its standard output
    fn run_captured(&self, command: &str) -> CommandResult<String>;

    /// Run a command, forwarding stdout and stderr line by line until exit
    fn run_streamed(&self, command: &str, sink: &dyn OutputSink) -> CommandResult<()>;
}

impl<T: CommandRunner + ?Sized> CommandRunner for &T {
    fn run_quiet(&self, command: &str) -> CommandResult<()> {
        (**self).run_quiet(command)
    }

    fn run_captured(&self, command: &str) -> CommandResult<String> {
        (**self).run_captured(command)
    }

    fn run_streamed(&self, command: &str, sink: &dyn OutputSink) -> CommandResult<()> {
        (**self).run_streamed(command, sink)
    }
}
