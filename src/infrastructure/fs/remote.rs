//! Remote File System Implementation
//!
//! Implements the Endpoint port over an SSH session. Every operation is a
//! small POSIX shell command; file contents stream through `cat`.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, ChildStdout, Stdio};
use std::sync::Mutex;
use std::time::{Duration, UNIX_EPOCH};

use crate::domain::ports::{
    CommandError, CommandRunner, DirEntry, Endpoint, EndpointError, EndpointResult, FileMeta,
    FileReader, FileWriter,
};
use crate::domain::value_objects::shell_quote;
use crate::infrastructure::ssh::SshSession;

/// Remote file system implementation using SSH
///
/// Caches the remote $HOME directory for the lifetime of the instance.
pub struct RemoteFs {
    session: SshSession,
    cached_home: Mutex<Option<String>>,
}

impl RemoteFs {
    pub fn new(session: SshSession) -> Self {
        Self {
            session,
            cached_home: Mutex::new(None),
        }
    }

    /// The underlying session, for running non-filesystem commands
    pub fn session(&self) -> &SshSession {
        &self.session
    }

    fn quote_path(path: &Path) -> String {
        shell_quote(&remote_path(path))
    }

    fn run(&self, command: &str) -> EndpointResult<String> {
        self.session.run_captured(command).map_err(remote_error)
    }
}

/// Remote paths are always slash separated
fn remote_path(path: &Path) -> String {
    let s = path.to_string_lossy();
    if std::path::MAIN_SEPARATOR == '/' {
        s.into_owned()
    } else {
        s.replace(std::path::MAIN_SEPARATOR, "/")
    }
}

fn remote_error(err: CommandError) -> EndpointError {
    match err {
        CommandError::Spawn { program, source } => EndpointError::Io {
            path: PathBuf::from(program),
            source,
        },
        other => EndpointError::Remote(other.to_string()),
    }
}

/// `1700000000.123456789` as printed by `find -printf %T@`
fn parse_mtime(raw: &str) -> EndpointResult<std::time::SystemTime> {
    let (secs, frac) = raw.split_once('.').unwrap_or((raw, ""));
    let secs: u64 = secs
        .parse()
        .map_err(|_| EndpointError::Parse(format!("bad mtime '{}'", raw)))?;
    let nanos = if frac.is_empty() {
        0
    } else {
        let digits: String = frac.chars().take(9).collect();
        let padded = format!("{:0<9}", digits);
        padded
            .parse::<u32>()
            .map_err(|_| EndpointError::Parse(format!("bad mtime '{}'", raw)))?
    };
    Ok(UNIX_EPOCH + Duration::new(secs, nanos))
}

fn parse_mode(raw: &str) -> Option<u32> {
    u32::from_str_radix(raw.trim(), 8).ok()
}

fn parse_size(raw: &str) -> EndpointResult<u64> {
    raw.trim()
        .parse()
        .map_err(|_| EndpointError::Parse(format!("bad size '{}'", raw)))
}

/// One line of `stat -L -c '%s|%F|%Y|%a'`
fn parse_stat_line(line: &str) -> EndpointResult<FileMeta> {
    let fields: Vec<&str> = line.trim().split('|').collect();
    let [size, kind, mtime, mode] = fields[..] else {
        return Err(EndpointError::Parse(format!("bad stat line '{}'", line)));
    };
    let is_dir = kind == "directory";
    Ok(FileMeta {
        size: if is_dir { 0 } else { parse_size(size)? },
        is_dir,
        modified: parse_mtime(mtime)?,
        mode: parse_mode(mode),
    })
}

/// One line of `find -printf '%y|%s|%T@|%m|%f\n'`. The name goes last so a
/// `|` inside it survives the split.
fn parse_find_line(line: &str) -> EndpointResult<DirEntry> {
    let mut parts = line.splitn(5, '|');
    let (Some(kind), Some(size), Some(mtime), Some(mode), Some(name)) = (
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
    ) else {
        return Err(EndpointError::Parse(format!("bad listing line '{}'", line)));
    };
    let is_dir = kind == "d";
    let meta = FileMeta {
        size: if is_dir { 0 } else { parse_size(size)? },
        is_dir,
        modified: parse_mtime(mtime)?,
        mode: parse_mode(mode),
    };
    // Command output is decoded lossily, so invalid bytes show up as U+FFFD
    if name.contains(char::REPLACEMENT_CHARACTER) {
        Ok(DirEntry::lossy(name, meta))
    } else {
        Ok(DirEntry::new(name, meta))
    }
}

fn finish_child(mut child: Child, command: &str) -> EndpointResult<()> {
    let mut stderr = String::new();
    if let Some(mut pipe) = child.stderr.take() {
        let _ = pipe.read_to_string(&mut stderr);
    }
    let status = child
        .wait()
        .map_err(|e| EndpointError::Remote(format!("waiting for '{}': {}", command, e)))?;
    if status.success() {
        Ok(())
    } else {
        Err(remote_error(CommandError::Failed {
            command: command.to_string(),
            status: status.code(),
            stderr,
        }))
    }
}

struct RemoteReader {
    command: String,
    child: Child,
    stdout: ChildStdout,
}

impl Read for RemoteReader {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.stdout.read(buf)
    }
}

impl FileReader for RemoteReader {
    fn finish(self: Box<Self>) -> EndpointResult<()> {
        let RemoteReader {
            command,
            child,
            stdout,
        } = *self;
        drop(stdout);
        finish_child(child, &command)
    }
}

struct RemoteWriter {
    command: String,
    child: Child,
    stdin: Option<ChildStdin>,
}

impl Write for RemoteWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match self.stdin.as_mut() {
            Some(stdin) => stdin.write(buf),
            None => Err(std::io::Error::from(std::io::ErrorKind::BrokenPipe)),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self.stdin.as_mut() {
            Some(stdin) => stdin.flush(),
            None => Ok(()),
        }
    }
}

impl FileWriter for RemoteWriter {
    fn finish(mut self: Box<Self>) -> EndpointResult<()> {
        // Closing stdin is what lets `cat` exit
        drop(self.stdin.take());
        let RemoteWriter { command, child, .. } = *self;
        finish_child(child, &command)
    }
}

impl Endpoint for RemoteFs {
    fn display_name(&self) -> String {
        self.session.display_name()
    }

    fn home_dir(&self) -> EndpointResult<String> {
        let mut cache = self
            .cached_home
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(home) = cache.as_ref() {
            return Ok(home.clone());
        }

        let home = self.run("echo $HOME")?.trim().to_string();
        if home.is_empty() {
            return Err(EndpointError::Parse("remote $HOME is empty".to_string()));
        }
        *cache = Some(home.clone());
        Ok(home)
    }

    fn stat(&self, path: &Path) -> EndpointResult<Option<FileMeta>> {
        let p = Self::quote_path(path);
        let output = self.run(&format!(
            "if [ -e {p} ]; then stat -L -c '%s|%F|%Y|%a' {p}; else echo missing; fi"
        ))?;
        let line = output.trim();
        if line == "missing" {
            return Ok(None);
        }
        parse_stat_line(line).map(Some)
    }

    fn read_dir(&self, path: &Path) -> EndpointResult<Vec<DirEntry>> {
        let p = Self::quote_path(path);
        let output = self.run(&format!(
            "if [ -d {p} ]; then find -L {p} -mindepth 1 -maxdepth 1 -printf '%y|%s|%T@|%m|%f\\n'; else echo missing; fi"
        ))?;
        if output.trim() == "missing" {
            return Err(EndpointError::NotFound(path.to_path_buf()));
        }
        output
            .lines()
            .filter(|line| !line.is_empty())
            .map(parse_find_line)
            .collect()
    }

    fn open(&self, path: &Path) -> EndpointResult<Box<dyn FileReader + '_>> {
        let command = format!("cat {}", Self::quote_path(path));
        let mut child = self
            .session
            .spawn(&command, Stdio::null(), Stdio::piped(), Stdio::piped())
            .map_err(remote_error)?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| EndpointError::Remote(format!("no stdout for '{}'", command)))?;
        Ok(Box::new(RemoteReader {
            command,
            child,
            stdout,
        }))
    }

    fn create(&self, path: &Path) -> EndpointResult<Box<dyn FileWriter + '_>> {
        let command = format!("cat > {}", Self::quote_path(path));
        let mut child = self
            .session
            .spawn(&command, Stdio::piped(), Stdio::null(), Stdio::piped())
            .map_err(remote_error)?;
        let stdin = child.stdin.take();
        Ok(Box::new(RemoteWriter {
            command,
            child,
            stdin,
        }))
    }

    fn create_dir_all(&self, path: &Path) -> EndpointResult<()> {
        self.run(&format!("mkdir -p {}", Self::quote_path(path)))
            .map(|_| ())
    }

    fn set_permissions(&self, path: &Path, mode: u32) -> EndpointResult<()> {
        self.run(&format!("chmod {:o} {}", mode, Self::quote_path(path)))
            .map(|_| ())
    }
}
