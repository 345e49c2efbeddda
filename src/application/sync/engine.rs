//! Sync Engine
//!
//! Orchestrates scan and transfer for push and pull. All decisions live in
//! domain services (`TreeWalker`, `needs_transfer`); this type only wires
//! them to a pair of endpoints.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::entities::{SyncPlan, SyncReport, TransferItem};
use crate::domain::ports::{
    Endpoint, EndpointError, EndpointResult, NoopProgress, ProgressEvent, ProgressKind,
    ProgressSink,
};
use crate::domain::services::{join_relative, needs_transfer, TreeWalker};
use crate::domain::value_objects::{resolve_remote_root, IgnoreRules};
use crate::error::{TugboatError, TugboatResult};

/// Which way files flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Local to remote
    Push,
    /// Remote to local
    Pull,
}

impl Direction {
    fn verb(self) -> &'static str {
        match self {
            Direction::Push => "Uploading",
            Direction::Pull => "Downloading",
        }
    }
}

/// Two-phase tree synchronization between a local and a remote endpoint
pub struct SyncEngine<L, R>
where
    L: Endpoint,
    R: Endpoint,
{
    local: L,
    remote: R,
    rules: IgnoreRules,
    progress: Arc<dyn ProgressSink>,
}

impl<L, R> SyncEngine<L, R>
where
    L: Endpoint,
    R: Endpoint,
{
    pub fn new(local: L, remote: R, rules: IgnoreRules) -> Self {
        Self {
            local,
            remote,
            rules,
            progress: Arc::new(NoopProgress),
        }
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressSink>) -> Self {
        self.progress = progress;
        self
    }

    pub fn local(&self) -> &L {
        &self.local
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    /// Copy the local tree at `local_root` to `remote_root` (may start with `~/`).
    pub fn push(&self, local_root: &Path, remote_root: &str) -> TugboatResult<SyncReport> {
        let remote_root = self.resolve_remote(remote_root)?;
        info!(
            from = %local_root.display(),
            to = %remote_root.display(),
            remote = %self.remote.display_name(),
            "starting push"
        );
        self.sync(
            &self.local,
            local_root,
            &self.remote,
            &remote_root,
            Direction::Push,
        )
    }

    /// Copy the remote tree at `remote_root` (may start with `~/`) to `local_root`.
    pub fn pull(&self, remote_root: &str, local_root: &Path) -> TugboatResult<SyncReport> {
        let remote_root = self.resolve_remote(remote_root)?;
        info!(
            from = %remote_root.display(),
            to = %local_root.display(),
            remote = %self.remote.display_name(),
            "starting pull"
        );
        self.sync(
            &self.remote,
            &remote_root,
            &self.local,
            local_root,
            Direction::Pull,
        )
    }

    /// Resolve `~` once, before anything touches the remote tree.
    fn resolve_remote(&self, raw: &str) -> TugboatResult<PathBuf> {
        let resolved = resolve_remote_root(&self.remote, raw).map_err(TugboatError::RemoteHome)?;
        if resolved.as_os_str() != raw {
            debug!(raw, resolved = %resolved.display(), "resolved remote root");
        }
        Ok(resolved)
    }

    fn sync(
        &self,
        source: &dyn Endpoint,
        source_root: &Path,
        dest: &dyn Endpoint,
        dest_root: &Path,
        direction: Direction,
    ) -> TugboatResult<SyncReport> {
        let plan = self.scan(source, source_root, dest, dest_root)?;
        info!(
            files = plan.items.len(),
            bytes = plan.total_bytes(),
            directories = plan.directories_created,
            ignored = plan.ignored_count,
            "scan complete"
        );

        let report = self.transfer(source, dest, &plan, direction)?;
        info!(
            checked = report.checked,
            transferred = report.transferred,
            skipped = report.skipped,
            ignored = report.ignored,
            "sync complete"
        );
        Ok(report)
    }

    /// Phase 1: enumerate the source eagerly and mirror its directories.
    fn scan(
        &self,
        source: &dyn Endpoint,
        source_root: &Path,
        dest: &dyn Endpoint,
        dest_root: &Path,
    ) -> TugboatResult<SyncPlan> {
        let scan_error = |source| TugboatError::Scan {
            root: source_root.to_path_buf(),
            source,
        };

        match source.stat(source_root).map_err(scan_error)? {
            Some(meta) if meta.is_dir => {}
            Some(_) => {
                return Err(scan_error(EndpointError::NotADirectory(
                    source_root.to_path_buf(),
                )))
            }
            None => return Err(scan_error(EndpointError::NotFound(source_root.to_path_buf()))),
        }

        // A failure here resurfaces on the first write below the root
        if let Err(e) = dest.create_dir_all(dest_root) {
            warn!(path = %dest_root.display(), error = %e, "could not create destination root");
        }

        let mut plan = SyncPlan::default();
        let mut walker = TreeWalker::new(source, source_root, &self.rules);
        for entry in walker.by_ref() {
            let entry = entry.map_err(scan_error)?;
            let dest_path = join_relative(dest_root, &entry.relative_path);

            if entry.is_dir {
                dest.create_dir_all(&dest_path)
                    .map_err(|source| TugboatError::Transfer {
                        path: entry.relative_path.clone(),
                        source,
                    })?;
                plan.directories_created += 1;
                continue;
            }

            plan.items.push(TransferItem {
                source_path: join_relative(source_root, &entry.relative_path),
                dest_path,
                relative_path: entry.relative_path.clone(),
                entry,
            });
        }
        plan.ignored_count = walker.ignored_count();
        Ok(plan)
    }

    /// Phase 2: compare and copy, in enumeration order.
    fn transfer(
        &self,
        source: &dyn Endpoint,
        dest: &dyn Endpoint,
        plan: &SyncPlan,
        direction: Direction,
    ) -> TugboatResult<SyncReport> {
        let total = plan.items.len();
        let mut report = SyncReport {
            ignored: plan.ignored_count,
            ..SyncReport::default()
        };

        for (index, item) in plan.items.iter().enumerate() {
            let transfer_error = |source| TugboatError::Transfer {
                path: item.relative_path.clone(),
                source,
            };

            let existing = dest.stat(&item.dest_path).map_err(transfer_error)?;
            report.checked += 1;

            if !needs_transfer(&item.entry.meta(), existing.as_ref()) {
                debug!(path = %item.relative_path, "up to date");
                report.skipped += 1;
                self.progress.on_progress(ProgressEvent::transfer(
                    index + 1,
                    total,
                    format!("Skipped (up-to-date): {}", item.relative_path),
                ));
                continue;
            }

            debug!(path = %item.relative_path, bytes = item.entry.size, "copying");
            copy_file(source, dest, item).map_err(transfer_error)?;
            report.transferred += 1;
            self.progress.on_progress(ProgressEvent::transfer(
                index + 1,
                total,
                format!(
                    "{}: {} ({} bytes)",
                    direction.verb(),
                    item.relative_path,
                    item.entry.size
                ),
            ));
        }

        self.progress.finish(ProgressKind::Transfer);
        Ok(report)
    }
}

/// Stream one file across and carry its permission bits over when possible.
fn copy_file(source: &dyn Endpoint, dest: &dyn Endpoint, item: &TransferItem) -> EndpointResult<()> {
    let mut reader = source.open(&item.source_path)?;
    let mut writer = dest.create(&item.dest_path)?;

    io::copy(&mut reader, &mut writer).map_err(|e| EndpointError::io(&item.source_path, e))?;
    writer.finish()?;
    reader.finish()?;

    if let Some(mode) = item.entry.mode {
        if let Err(e) = dest.set_permissions(&item.dest_path, mode) {
            debug!(path = %item.relative_path, error = %e, "could not set permissions");
        }
    }
    Ok(())
}
