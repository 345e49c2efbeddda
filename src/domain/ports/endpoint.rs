//! Endpoint port - filesystem capability of one side of a sync
//!
//! The sync engine moves files between two endpoints without knowing which
//! one is the local disk and which one sits behind an SSH connection.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Result type for endpoint operations
pub type EndpointResult<T> = Result<T, EndpointError>;

/// Endpoint operation errors
#[derive(Debug)]
pub enum EndpointError {
    /// Path does not exist
    NotFound(PathBuf),
    /// Path exists but is not a directory
    NotADirectory(PathBuf),
    /// Permission denied
    PermissionDenied(PathBuf),
    /// I/O error on a specific path
    Io { path: PathBuf, source: std::io::Error },
    /// A remote command exited unsuccessfully
    Remote(String),
    /// Remote output could not be understood
    Parse(String),
}

impl EndpointError {
    /// Attach a path to an I/O error, keeping the common kinds distinguishable.
    pub fn io(path: &Path, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: err,
            },
        }
    }
}

impl std::fmt::Display for EndpointError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(path) => write!(f, "not found: {}", path.display()),
            Self::NotADirectory(path) => write!(f, "not a directory: {}", path.display()),
            Self::PermissionDenied(path) => write!(f, "permission denied: {}", path.display()),
            Self::Io { path, source } => write!(f, "I/O error on {}: {}", path.display(), source),
            Self::Remote(msg) => write!(f, "remote error: {}", msg),
            Self::Parse(msg) => write!(f, "unexpected remote output: {}", msg),
        }
    }
}

impl std::error::Error for EndpointError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Metadata of a single node as reported by an endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileMeta {
    pub size: u64,
    pub is_dir: bool,
    pub modified: SystemTime,
    /// Unix permission bits, when the endpoint can report them
    pub mode: Option<u32>,
}

/// One child of a listed directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub meta: FileMeta,
    /// False when the name on disk is not valid UTF-8 and `name` is only a
    /// lossy rendering of it that cannot be used to reach the entry
    pub exact_name: bool,
}

impl DirEntry {
    pub fn new(name: impl Into<String>, meta: FileMeta) -> Self {
        Self {
            name: name.into(),
            meta,
            exact_name: true,
        }
    }

    pub fn lossy(name: impl Into<String>, meta: FileMeta) -> Self {
        Self {
            name: name.into(),
            meta,
            exact_name: false,
        }
    }
}

/// Readable stream over a file at an endpoint.
///
/// `finish` surfaces failures that only show up once the stream is drained,
/// such as a non-zero exit from a remote `cat`.
pub trait FileReader: Read {
    fn finish(self: Box<Self>) -> EndpointResult<()> {
        Ok(())
    }
}

/// Writable stream over a file at an endpoint.
///
/// Data is only guaranteed to be in place once `finish` returns `Ok`.
pub trait FileWriter: Write {
    fn finish(self: Box<Self>) -> EndpointResult<()>;
}

/// Abstract filesystem endpoint
///
/// Implementations:
/// - `LocalFs` - standard file I/O
/// - `RemoteFs` - shell commands over an SSH session
///
/// An endpoint represents a single logical connection. Callers serialize
/// all operations against one instance.
pub trait Endpoint {
    /// Human readable name (`local` or `user@host`)
    fn display_name(&self) -> String;

    /// Home directory of the account behind this endpoint
    fn home_dir(&self) -> EndpointResult<String>;

    /// Stat a path, `Ok(None)` when it does not exist
    fn stat(&self, path: &Path) -> EndpointResult<Option<FileMeta>>;

    /// List the direct children of a directory (order unspecified)
    fn read_dir(&self, path: &Path) -> EndpointResult<Vec<DirEntry>>;

    /// Open a file for reading
    fn open(&self, path: &Path) -> EndpointResult<Box<dyn FileReader + '_>>;

    /// Create or truncate a file for writing
    fn create(&self, path: &Path) -> EndpointResult<Box<dyn FileWriter + '_>>;

    /// Create a directory and its parents; existing directories are fine
    fn create_dir_all(&self, path: &Path) -> EndpointResult<()>;

    /// Apply unix permission bits
    fn set_permissions(&self, path: &Path, mode: u32) -> EndpointResult<()>;
}

impl<T: Endpoint + ?Sized> Endpoint for &T {
    fn display_name(&self) -> String {
        (**self).display_name()
    }

    fn home_dir(&self) -> EndpointResult<String> {
        (**self).home_dir()
    }

    fn stat(&self, path: &Path) -> EndpointResult<Option<FileMeta>> {
        (**self).stat(path)
    }

    fn read_dir(&self, path: &Path) -> EndpointResult<Vec<DirEntry>> {
        (**self).read_dir(path)
    }

    fn open(&self, path: &Path) -> EndpointResult<Box<dyn FileReader + '_>> {
        (**self).open(path)
    }

    fn create(&self, path: &Path) -> EndpointResult<Box<dyn FileWriter + '_>> {
        (**self).create(path)
    }

    fn create_dir_all(&self, path: &Path) -> EndpointResult<()> {
        (**self).create_dir_all(path)
    }

    fn set_permissions(&self, path: &Path, mode: u32) -> EndpointResult<()> {
        (**self).set_permissions(path, mode)
    }
}
