//! Entry and TransferItem entities

use std::path::PathBuf;
use std::time::SystemTime;

use crate::domain::ports::FileMeta;

/// A file or directory produced by tree enumeration.
///
/// `relative_path` is slash-separated, unique within one enumeration pass,
/// and never includes the root segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub relative_path: String,
    pub is_dir: bool,
    pub size: u64,
    pub modified: SystemTime,
    pub mode: Option<u32>,
}

impl Entry {
    pub fn new(relative_path: impl Into<String>, meta: FileMeta) -> Self {
        Self {
            relative_path: relative_path.into(),
            is_dir: meta.is_dir,
            size: meta.size,
            modified: meta.modified,
            mode: meta.mode,
        }
    }

    /// Metadata view used for change detection
    pub fn meta(&self) -> FileMeta {
        FileMeta {
            size: self.size,
            is_dir: self.is_dir,
            modified: self.modified,
            mode: self.mode,
        }
    }

    /// Last path segment
    pub fn name(&self) -> &str {
        self.relative_path
            .rsplit('/')
            .next()
            .unwrap_or(&self.relative_path)
    }
}

/// A file selected for comparison and possible transfer in phase 2.
///
/// Directories never become transfer items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferItem {
    pub source_path: PathBuf,
    pub dest_path: PathBuf,
    pub relative_path: String,
    pub entry: Entry,
}
