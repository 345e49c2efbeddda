//! Local File System Implementation
//!
//! Implements the Endpoint port for the local disk.

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use crate::domain::ports::{
    DirEntry, Endpoint, EndpointError, EndpointResult, FileMeta, FileReader, FileWriter,
};

/// Local file system endpoint
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl LocalFs {
    /// Create a new LocalFs instance
    pub fn new() -> Self {
        Self
    }
}

fn file_meta(meta: &std::fs::Metadata) -> FileMeta {
    FileMeta {
        size: if meta.is_dir() { 0 } else { meta.len() },
        is_dir: meta.is_dir(),
        modified: meta.modified().unwrap_or(std::time::UNIX_EPOCH),
        mode: unix_mode(meta),
    }
}

#[cfg(unix)]
fn unix_mode(meta: &std::fs::Metadata) -> Option<u32> {
    use std::os::unix::fs::PermissionsExt;
    Some(meta.permissions().mode() & 0o7777)
}

#[cfg(not(unix))]
fn unix_mode(_meta: &std::fs::Metadata) -> Option<u32> {
    None
}

/// Stat following symlinks, falling back to the link itself when dangling.
fn metadata(path: &Path) -> std::io::Result<std::fs::Metadata> {
    std::fs::metadata(path).or_else(|_| std::fs::symlink_metadata(path))
}

struct LocalReader {
    file: File,
}

impl Read for LocalReader {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.file.read(buf)
    }
}

impl FileReader for LocalReader {}

struct LocalWriter {
    path: PathBuf,
    inner: BufWriter<File>,
}

impl Write for LocalWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

impl FileWriter for LocalWriter {
    fn finish(mut self: Box<Self>) -> EndpointResult<()> {
        self.inner
            .flush()
            .map_err(|e| EndpointError::io(&self.path, e))
    }
}

impl Endpoint for LocalFs {
    fn display_name(&self) -> String {
        "local".to_string()
    }

    fn home_dir(&self) -> EndpointResult<String> {
        dirs::home_dir()
            .map(|p| p.to_string_lossy().into_owned())
            .ok_or_else(|| EndpointError::NotFound(PathBuf::from("~")))
    }

    fn stat(&self, path: &Path) -> EndpointResult<Option<FileMeta>> {
        match metadata(path) {
            Ok(meta) => Ok(Some(file_meta(&meta))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(EndpointError::io(path, e)),
        }
    }

    fn read_dir(&self, path: &Path) -> EndpointResult<Vec<DirEntry>> {
        let mut entries = Vec::new();
        for entry in std::fs::read_dir(path).map_err(|e| EndpointError::io(path, e))? {
            let entry = entry.map_err(|e| EndpointError::io(path, e))?;
            let child = entry.path();
            let meta = metadata(&child).map_err(|e| EndpointError::io(&child, e))?;
            let meta = file_meta(&meta);
            entries.push(match entry.file_name().into_string() {
                Ok(name) => DirEntry::new(name, meta),
                Err(raw) => DirEntry::lossy(raw.to_string_lossy(), meta),
            });
        }
        Ok(entries)
    }

    fn open(&self, path: &Path) -> EndpointResult<Box<dyn FileReader + '_>> {
        let file = File::open(path).map_err(|e| EndpointError::io(path, e))?;
        Ok(Box::new(LocalReader { file }))
    }

    fn create(&self, path: &Path) -> EndpointResult<Box<dyn FileWriter + '_>> {
        let file = File::create(path).map_err(|e| EndpointError::io(path, e))?;
        Ok(Box::new(LocalWriter {
            path: path.to_path_buf(),
            inner: BufWriter::new(file),
        }))
    }

    fn create_dir_all(&self, path: &Path) -> EndpointResult<()> {
        std::fs::create_dir_all(path).map_err(|e| EndpointError::io(path, e))
    }

    #[cfg(unix)]
    fn set_permissions(&self, path: &Path, mode: u32) -> EndpointResult<()> {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
            .map_err(|e| EndpointError::io(path, e))
    }

    #[cfg(not(unix))]
    fn set_permissions(&self, _path: &Path, _mode: u32) -> EndpointResult<()> {
        Ok(())
    }
}
