//! Tree enumeration
//!
//! Depth-first, pre-order walk over any endpoint. Directory listings are
//! fetched lazily as the walk descends, and ignored directories are pruned
//! before they are ever listed.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::domain::entities::Entry;
use crate::domain::ports::{DirEntry, Endpoint, EndpointResult};
use crate::domain::value_objects::IgnoreRules;

/// Join a slash-separated relative path onto a root.
pub fn join_relative(root: &Path, relative_path: &str) -> PathBuf {
    relative_path
        .split('/')
        .filter(|s| !s.is_empty())
        .fold(root.to_path_buf(), |path, segment| path.join(segment))
}

/// Children of one listed directory, waiting to be visited.
struct Pending {
    prefix: String,
    children: std::vec::IntoIter<DirEntry>,
}

/// Lazy enumeration of a tree below `root`.
///
/// Yields every non-ignored file and directory exactly once. The root itself
/// is never yielded. Children of a directory are visited in name order so
/// two walks of an unchanged tree produce the same sequence.
///
/// Entries whose names are not valid UTF-8 cannot be addressed by a relative
/// path; they are skipped with a warning and counted as ignored.
///
/// A listing failure is yielded as an error and ends the walk.
pub struct TreeWalker<'a> {
    endpoint: &'a dyn Endpoint,
    root: PathBuf,
    rules: &'a IgnoreRules,
    stack: Vec<Pending>,
    ignored: usize,
    started: bool,
    finished: bool,
}

impl<'a> TreeWalker<'a> {
    pub fn new(endpoint: &'a dyn Endpoint, root: impl Into<PathBuf>, rules: &'a IgnoreRules) -> Self {
        Self {
            endpoint,
            root: root.into(),
            rules,
            stack: Vec::new(),
            ignored: 0,
            started: false,
            finished: false,
        }
    }

    /// Ignored nodes seen so far. A pruned directory counts once.
    pub fn ignored_count(&self) -> usize {
        self.ignored
    }

    fn list(&mut self, prefix: String) -> EndpointResult<()> {
        let dir = join_relative(&self.root, &prefix);
        let mut children = self.endpoint.read_dir(&dir)?;
        children.sort_by(|a, b| a.name.cmp(&b.name));
        self.stack.push(Pending {
            prefix,
            children: children.into_iter(),
        });
        Ok(())
    }

    fn fail<T>(&mut self, err: crate::domain::ports::EndpointError) -> Option<EndpointResult<T>> {
        self.finished = true;
        self.stack.clear();
        Some(Err(err))
    }
}

impl Iterator for TreeWalker<'_> {
    type Item = EndpointResult<Entry>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        if !self.started {
            self.started = true;
            if let Err(err) = self.list(String::new()) {
                return self.fail(err);
            }
        }

        loop {
            let pending = match self.stack.last_mut() {
                Some(pending) => pending,
                None => {
                    self.finished = true;
                    return None;
                }
            };

            let Some(child) = pending.children.next() else {
                self.stack.pop();
                continue;
            };

            let relative_path = if pending.prefix.is_empty() {
                child.name.clone()
            } else {
                format!("{}/{}", pending.prefix, child.name)
            };

            if !child.exact_name {
                self.ignored += 1;
                warn!(
                    path = %relative_path,
                    "skipping entry whose name is not valid UTF-8"
                );
                continue;
            }

            if self.rules.is_ignored(&relative_path, child.meta.is_dir) {
                self.ignored += 1;
                if child.meta.is_dir {
                    debug!(path = %relative_path, "pruning ignored directory");
                } else {
                    debug!(path = %relative_path, "skipping ignored file");
                }
                continue;
            }

            if child.meta.is_dir {
                if let Err(err) = self.list(relative_path.clone()) {
                    return self.fail(err);
                }
            }

            return Some(Ok(Entry::new(relative_path, child.meta)));
        }
    }
}
