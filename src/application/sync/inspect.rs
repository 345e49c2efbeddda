//! Pre-flight look at a folder before it is synced

use std::path::Path;

use serde::Serialize;

use crate::domain::ports::{Endpoint, EndpointResult};

/// What a quick listing of a sync root shows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FolderSummary {
    /// Direct children whose name does not start with `.`
    pub visible_entries: usize,
    /// A regular file named `Dockerfile` sits at the top level
    pub has_dockerfile: bool,
}

/// List the direct children of `root` on `endpoint`.
pub fn inspect_folder(endpoint: &dyn Endpoint, root: &Path) -> EndpointResult<FolderSummary> {
    let entries = endpoint.read_dir(root)?;

    Ok(FolderSummary {
        visible_entries: entries.iter().filter(|e| !e.name.starts_with('.')).count(),
        has_dockerfile: entries
            .iter()
            .any(|e| e.name == "Dockerfile" && !e.meta.is_dir),
    })
}
