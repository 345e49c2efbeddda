//! SSH Session
//!
//! Runs remote commands through the system `ssh` client. Each operation is
//! one `ssh` invocation; with multiplexing enabled they all ride a single
//! connection through a control socket, so the session behaves as one
//! logical channel.

use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};

use tracing::{debug, trace};

use crate::domain::ports::{CommandError, CommandResult, CommandRunner, OutputSink, OutputStream};

/// Port used when the server address does not carry one
pub const DEFAULT_SSH_PORT: u16 = 22;

/// Connection establishment timeout passed to `ssh`
pub const CONNECT_TIMEOUT_SECS: u64 = 10;

/// How long an idle multiplexed connection stays open
const CONTROL_PERSIST_SECS: u64 = 60;

/// Where and how to connect
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SshTarget {
    pub host: String,
    pub port: u16,
    pub username: String,
    /// Password auth goes through `sshpass`; key auth needs nothing here
    pub password: Option<String>,
    pub identity_file: Option<PathBuf>,
    pub multiplex: bool,
}

impl SshTarget {
    /// Build a target from a `host` or `host:port` server string.
    pub fn new(server: &str, username: impl Into<String>) -> Self {
        let (host, port) = parse_server(server);
        Self {
            host,
            port,
            username: username.into(),
            password: None,
            identity_file: None,
            multiplex: true,
        }
    }

    /// `user@host`, as handed to `ssh`
    pub fn destination(&self) -> String {
        if self.username.is_empty() {
            self.host.clone()
        } else {
            format!("{}@{}", self.username, self.host)
        }
    }
}

/// Split `host:port`. The port defaults to 22 when absent or unparsable.
pub fn parse_server(server: &str) -> (String, u16) {
    let server = server.trim();
    match server.rsplit_once(':') {
        Some((host, port)) if !host.is_empty() && !host.contains(':') => {
            match port.parse::<u16>() {
                Ok(port) => (host.to_string(), port),
                Err(_) => (server.to_string(), DEFAULT_SSH_PORT),
            }
        }
        _ => (server.to_string(), DEFAULT_SSH_PORT),
    }
}

/// A remote shell reachable through the `ssh` client
#[derive(Debug, Clone)]
pub struct SshSession {
    target: SshTarget,
    program: PathBuf,
}

impl SshSession {
    pub fn new(target: SshTarget) -> Self {
        Self {
            target,
            program: PathBuf::from("ssh"),
        }
    }

    /// Use a different `ssh` binary
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    /// Open the session and verify the remote end answers.
    pub fn connect(target: SshTarget) -> CommandResult<Self> {
        Self::new(target).verified()
    }

    /// Run a no-op to prove authentication and reachability.
    pub fn verified(self) -> CommandResult<Self> {
        debug!(destination = %self.display_name(), "checking SSH connection");
        self.run_quiet("true")?;
        Ok(self)
    }

    pub fn target(&self) -> &SshTarget {
        &self.target
    }

    /// `user@host` plus the port when it is not the default
    pub fn display_name(&self) -> String {
        if self.target.port == DEFAULT_SSH_PORT {
            self.target.destination()
        } else {
            format!("{}:{}", self.target.destination(), self.target.port)
        }
    }

    fn control_path() -> PathBuf {
        std::env::temp_dir().join("tugboat-%C")
    }

    /// Client options, without the destination and remote command
    fn ssh_args(&self) -> Vec<String> {
        let mut args = vec![
            "-p".to_string(),
            self.target.port.to_string(),
            "-o".to_string(),
            format!("ConnectTimeout={}", CONNECT_TIMEOUT_SECS),
            "-o".to_string(),
            "StrictHostKeyChecking=accept-new".to_string(),
        ];
        if self.target.password.is_none() {
            args.push("-o".to_string());
            args.push("BatchMode=yes".to_string());
        }
        if let Some(identity) = &self.target.identity_file {
            args.push("-i".to_string());
            args.push(identity.display().to_string());
        }
        if self.target.multiplex {
            args.push("-o".to_string());
            args.push("ControlMaster=auto".to_string());
            args.push("-o".to_string());
            args.push(format!("ControlPath={}", Self::control_path().display()));
            args.push("-o".to_string());
            args.push(format!("ControlPersist={}", CONTROL_PERSIST_SECS));
        }
        args
    }

    /// The local process that runs `remote` on the server
    fn command(&self, remote: &str) -> Command {
        let mut cmd = match &self.target.password {
            Some(password) => {
                let mut cmd = Command::new("sshpass");
                cmd.arg("-e").arg(&self.program).env("SSHPASS", password);
                cmd
            }
            None => Command::new(&self.program),
        };
        cmd.args(self.ssh_args())
            .arg(self.target.destination())
            .arg(remote);
        cmd
    }

    fn program_name(&self) -> String {
        if self.target.password.is_some() {
            "sshpass".to_string()
        } else {
            self.program.display().to_string()
        }
    }

    /// Spawn a remote command with the given stdio wiring
    pub(crate) fn spawn(
        &self,
        remote: &str,
        stdin: Stdio,
        stdout: Stdio,
        stderr: Stdio,
    ) -> CommandResult<Child> {
        trace!(command = remote, "ssh spawn");
        self.command(remote)
            .stdin(stdin)
            .stdout(stdout)
            .stderr(stderr)
            .spawn()
            .map_err(|source| CommandError::Spawn {
                program: self.program_name(),
                source,
            })
    }

    /// Tear down the multiplexed connection, if any. Best effort.
    pub fn close(&self) {
        if !self.target.multiplex {
            return;
        }
        let mut cmd = Command::new(&self.program);
        cmd.args(self.ssh_args())
            .arg("-O")
            .arg("exit")
            .arg(self.target.destination())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        if let Err(e) = cmd.status() {
            debug!(error = %e, "closing SSH control connection failed");
        }
    }
}

fn failure(command: &str, output: &std::process::Output) -> CommandError {
    let mut stderr = String::from_utf8_lossy(&output.stderr).into_owned();
    if stderr.trim().is_empty() {
        stderr = String::from_utf8_lossy(&output.stdout).into_owned();
    }
    CommandError::Failed {
        command: command.to_string(),
        status: output.status.code(),
        stderr,
    }
}

/// Forward every line of `reader` to the sink until EOF
fn drain(reader: impl Read, stream: OutputStream, sink: &dyn OutputSink) -> std::io::Result<()> {
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            return Ok(());
        }
        let line = String::from_utf8_lossy(&buf);
        sink.on_line(stream, line.trim_end_matches(['\n', '\r']));
    }
}

impl CommandRunner for SshSession {
    fn run_quiet(&self, command: &str) -> CommandResult<()> {
        debug!(command, "remote (quiet)");
        let output = self
            .spawn(command, Stdio::null(), Stdio::piped(), Stdio::piped())?
            .wait_with_output()
            .map_err(|source| CommandError::Io {
                command: command.to_string(),
                source,
            })?;
        if !output.status.success() {
            return Err(failure(command, &output));
        }
        Ok(())
    }

    fn run_captured(&self, command: &str) -> CommandResult<String> {
        debug!(command, "remote (captured)");
        let output = self
            .spawn(command, Stdio::null(), Stdio::piped(), Stdio::piped())?
            .wait_with_output()
            .map_err(|source| CommandError::Io {
                command: command.to_string(),
                source,
            })?;
        if !output.status.success() {
            return Err(failure(command, &output));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim_end().to_string())
    }

    fn run_streamed(&self, command: &str, sink: &dyn OutputSink) -> CommandResult<()> {
        debug!(command, "remote (streamed)");
        let io_err = |source| CommandError::Io {
            command: command.to_string(),
            source,
        };

        let mut child = self.spawn(command, Stdio::null(), Stdio::piped(), Stdio::piped())?;
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        // Both readers must reach EOF before the command counts as complete.
        let (status, out, err) = std::thread::scope(|scope| {
            let out = scope.spawn(|| match stdout {
                Some(pipe) => drain(pipe, OutputStream::Stdout, sink),
                None => Ok(()),
            });
            let err = scope.spawn(|| match stderr {
                Some(pipe) => drain(pipe, OutputStream::Stderr, sink),
                None => Ok(()),
            });
            let status = child.wait();
            (status, out.join(), err.join())
        });

        let status = status.map_err(io_err)?;
        for reader in [out, err] {
            match reader {
                Ok(result) => result.map_err(io_err)?,
                Err(_) => {
                    return Err(io_err(std::io::Error::other("output reader panicked")));
                }
            }
        }

        if !status.success() {
            return Err(CommandError::Failed {
                command: command.to_string(),
                status: status.code(),
                stderr: String::new(),
            });
        }
        Ok(())
    }
}

/// Whether `program` can be started, either as an explicit path or via `PATH`.
pub fn program_exists(program: &Path) -> bool {
    if program.components().count() > 1 {
        return program.exists();
    }
    std::env::var_os("PATH")
        .map(|paths| std::env::split_paths(&paths).any(|dir| dir.join(program).is_file()))
        .unwrap_or(false)
}
