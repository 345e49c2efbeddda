//! Sync Engine Tests

use super::*;
use crate::domain::ports::{
    DirEntry, Endpoint, EndpointError, EndpointResult, FileMeta, FileReader, FileWriter,
    ProgressEvent, ProgressSink,
};
use crate::domain::value_objects::IgnoreRules;
use crate::error::TugboatError;
use crate::infrastructure::fs::LocalFs;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::SystemTime;
use tempfile::tempdir;

// In-memory endpoint standing in for the remote side

#[derive(Debug, Clone)]
enum Node {
    Dir,
    File {
        data: Vec<u8>,
        modified: SystemTime,
        mode: Option<u32>,
    },
}

struct MemoryFs {
    home: Option<String>,
    nodes: RefCell<BTreeMap<PathBuf, Node>>,
    ops: RefCell<Vec<String>>,
    fail_create: Option<PathBuf>,
}

impl MemoryFs {
    fn new() -> Self {
        Self {
            home: Some("/home/bob".to_string()),
            nodes: RefCell::new(BTreeMap::new()),
            ops: RefCell::new(Vec::new()),
            fail_create: None,
        }
    }

    fn without_home(mut self) -> Self {
        self.home = None;
        self
    }

    fn failing_create(mut self, path: impl Into<PathBuf>) -> Self {
        self.fail_create = Some(path.into());
        self
    }

    fn put_file(&self, path: &str, data: &[u8]) {
        let path = PathBuf::from(path);
        if let Some(parent) = path.parent() {
            self.mkdirs(parent);
        }
        self.nodes.borrow_mut().insert(
            path,
            Node::File {
                data: data.to_vec(),
                modified: SystemTime::now(),
                mode: Some(0o644),
            },
        );
    }

    fn read(&self, path: &str) -> Option<Vec<u8>> {
        match self.nodes.borrow().get(Path::new(path)) {
            Some(Node::File { data, .. }) => Some(data.clone()),
            _ => None,
        }
    }

    fn is_dir(&self, path: &str) -> bool {
        matches!(self.nodes.borrow().get(Path::new(path)), Some(Node::Dir))
    }

    fn ops(&self) -> Vec<String> {
        self.ops.borrow().clone()
    }

    fn log(&self, op: String) {
        self.ops.borrow_mut().push(op);
    }

    fn mkdirs(&self, path: &Path) {
        let mut nodes = self.nodes.borrow_mut();
        for ancestor in path.ancestors() {
            if ancestor.as_os_str().is_empty() {
                continue;
            }
            nodes.entry(ancestor.to_path_buf()).or_insert(Node::Dir);
        }
    }
}

struct MemoryWriter<'a> {
    fs: &'a MemoryFs,
    path: PathBuf,
    buf: Vec<u8>,
}

impl Write for MemoryWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl FileWriter for MemoryWriter<'_> {
    fn finish(self: Box<Self>) -> EndpointResult<()> {
        let MemoryWriter { fs, path, buf } = *self;
        fs.nodes.borrow_mut().insert(
            path,
            Node::File {
                data: buf,
                modified: SystemTime::now(),
                mode: None,
            },
        );
        Ok(())
    }
}

struct MemoryReader(Cursor<Vec<u8>>);

impl Read for MemoryReader {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.0.read(buf)
    }
}

impl FileReader for MemoryReader {}

impl Endpoint for MemoryFs {
    fn display_name(&self) -> String {
        "memory".to_string()
    }

    fn home_dir(&self) -> EndpointResult<String> {
        self.log("home".to_string());
        self.home
            .clone()
            .ok_or_else(|| EndpointError::Remote("echo $HOME failed".to_string()))
    }

    fn stat(&self, path: &Path) -> EndpointResult<Option<FileMeta>> {
        Ok(self.nodes.borrow().get(path).map(|node| match node {
            Node::Dir => FileMeta {
                size: 0,
                is_dir: true,
                modified: SystemTime::UNIX_EPOCH,
                mode: Some(0o755),
            },
            Node::File {
                data,
                modified,
                mode,
            } => FileMeta {
                size: data.len() as u64,
                is_dir: false,
                modified: *modified,
                mode: *mode,
            },
        }))
    }

    fn read_dir(&self, path: &Path) -> EndpointResult<Vec<DirEntry>> {
        if !self.is_dir(&path.to_string_lossy()) {
            return Err(EndpointError::NotFound(path.to_path_buf()));
        }
        let children: Vec<PathBuf> = self
            .nodes
            .borrow()
            .keys()
            .filter(|p| p.parent() == Some(path))
            .cloned()
            .collect();
        children
            .into_iter()
            .map(|child| {
                let meta = self.stat(&child)?.ok_or_else(|| EndpointError::NotFound(child.clone()))?;
                let name = child
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                Ok(DirEntry::new(name, meta))
            })
            .collect()
    }

    fn open(&self, path: &Path) -> EndpointResult<Box<dyn FileReader + '_>> {
        match self.nodes.borrow().get(path) {
            Some(Node::File { data, .. }) => Ok(Box::new(MemoryReader(Cursor::new(data.clone())))),
            _ => Err(EndpointError::NotFound(path.to_path_buf())),
        }
    }

    fn create(&self, path: &Path) -> EndpointResult<Box<dyn FileWriter + '_>> {
        self.log(format!("create {}", path.display()));
        if self.fail_create.as_deref() == Some(path) {
            return Err(EndpointError::PermissionDenied(path.to_path_buf()));
        }
        let parent_exists = path
            .parent()
            .map(|p| self.is_dir(&p.to_string_lossy()))
            .unwrap_or(false);
        if !parent_exists {
            return Err(EndpointError::NotFound(path.to_path_buf()));
        }
        Ok(Box::new(MemoryWriter {
            fs: self,
            path: path.to_path_buf(),
            buf: Vec::new(),
        }))
    }

    fn create_dir_all(&self, path: &Path) -> EndpointResult<()> {
        self.log(format!("mkdir {}", path.display()));
        self.mkdirs(path);
        Ok(())
    }

    fn set_permissions(&self, path: &Path, mode: u32) -> EndpointResult<()> {
        match self.nodes.borrow_mut().get_mut(path) {
            Some(Node::File { mode: m, .. }) => {
                *m = Some(mode);
                Ok(())
            }
            _ => Err(EndpointError::NotFound(path.to_path_buf())),
        }
    }
}

#[derive(Default)]
struct RecordingProgress {
    events: Mutex<Vec<ProgressEvent>>,
}

impl RecordingProgress {
    fn messages(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(|e| e.message.clone())
            .collect()
    }
}

impl ProgressSink for RecordingProgress {
    fn on_progress(&self, event: ProgressEvent) {
        self.events.lock().unwrap().push(event);
    }
}

fn rules(patterns: &[&str]) -> IgnoreRules {
    IgnoreRules::compile(patterns).unwrap()
}

#[test]
fn push_resolves_home_before_touching_remote_tree() {
    let local = tempdir().unwrap();
    fs::write(local.path().join("a.txt"), "hello").unwrap();
    let remote = MemoryFs::new();

    let engine = SyncEngine::new(LocalFs::new(), &remote, rules(&[]));
    let report = engine.push(local.path(), "~/app").unwrap();

    assert_eq!(report.transferred, 1);
    let ops = remote.ops();
    assert_eq!(ops[0], "home");
    assert_eq!(ops[1], "mkdir /home/bob/app");
    assert!(ops.iter().all(|op| !op.contains('~')));
    assert_eq!(remote.read("/home/bob/app/a.txt").unwrap(), b"hello");
}

#[test]
fn absolute_remote_root_skips_home_lookup() {
    let local = tempdir().unwrap();
    fs::write(local.path().join("a.txt"), "hello").unwrap();
    let remote = MemoryFs::new();

    let engine = SyncEngine::new(LocalFs::new(), &remote, rules(&[]));
    engine.push(local.path(), "/srv/app").unwrap();

    assert!(!remote.ops().contains(&"home".to_string()));
    assert!(remote.read("/srv/app/a.txt").is_some());
}

#[test]
fn home_lookup_failure_aborts_before_any_write() {
    let local = tempdir().unwrap();
    fs::write(local.path().join("a.txt"), "hello").unwrap();
    let remote = MemoryFs::new().without_home();

    let engine = SyncEngine::new(LocalFs::new(), &remote, rules(&[]));
    let err = engine.push(local.path(), "~/app").unwrap_err();

    assert!(matches!(err, TugboatError::RemoteHome(_)));
    assert_eq!(remote.ops(), vec!["home".to_string()]);
}

#[test]
fn second_push_is_a_no_op() {
    let local = tempdir().unwrap();
    fs::create_dir_all(local.path().join("src")).unwrap();
    fs::write(local.path().join("src/main.rs"), "fn main() {}").unwrap();
    fs::write(local.path().join("Dockerfile"), "FROM scratch").unwrap();
    let remote = MemoryFs::new();
    let engine = SyncEngine::new(LocalFs::new(), &remote, rules(&[]));

    let first = engine.push(local.path(), "/srv/app").unwrap();
    assert_eq!(first.transferred, 2);

    let second = engine.push(local.path(), "/srv/app").unwrap();
    assert_eq!(second.transferred, 0);
    assert_eq!(second.skipped, second.checked);
    assert_eq!(second.checked, 2);
}

#[test]
fn changed_size_is_transferred_again() {
    let local = tempdir().unwrap();
    fs::write(local.path().join("a.txt"), "v1").unwrap();
    let remote = MemoryFs::new();
    let engine = SyncEngine::new(LocalFs::new(), &remote, rules(&[]));
    engine.push(local.path(), "/srv/app").unwrap();

    fs::write(local.path().join("a.txt"), "version two").unwrap();
    let report = engine.push(local.path(), "/srv/app").unwrap();

    assert_eq!(report.transferred, 1);
    assert_eq!(remote.read("/srv/app/a.txt").unwrap(), b"version two");
}

#[test]
fn ignored_entries_never_reach_the_remote() {
    let local = tempdir().unwrap();
    fs::write(local.path().join("a.txt"), "0123456789").unwrap();
    fs::create_dir_all(local.path().join("node_modules")).unwrap();
    fs::write(local.path().join("node_modules/x.js"), "x").unwrap();
    fs::write(local.path().join(".env"), "SECRET=1").unwrap();
    let remote = MemoryFs::new();

    let engine = SyncEngine::new(LocalFs::new(), &remote, rules(&["node_modules", "*.env"]));
    let report = engine.push(local.path(), "/srv/app").unwrap();

    assert_eq!(report.checked, 1);
    assert_eq!(report.transferred, 1);
    assert!(report.ignored >= 2);
    assert_eq!(remote.read("/srv/app/a.txt").unwrap().len(), 10);
    assert!(!remote.is_dir("/srv/app/node_modules"));
    assert!(remote.read("/srv/app/node_modules/x.js").is_none());
    assert!(remote.read("/srv/app/.env").is_none());
}

#[test]
fn empty_directories_are_mirrored() {
    let local = tempdir().unwrap();
    fs::create_dir_all(local.path().join("data/cache")).unwrap();
    let remote = MemoryFs::new();

    let engine = SyncEngine::new(LocalFs::new(), &remote, rules(&[]));
    let report = engine.push(local.path(), "/srv/app").unwrap();

    assert_eq!(report.checked, 0);
    assert!(remote.is_dir("/srv/app/data/cache"));
}

#[test]
fn missing_source_root_is_a_scan_error() {
    let local = tempdir().unwrap();
    let remote = MemoryFs::new();
    let missing = local.path().join("nope");

    let engine = SyncEngine::new(LocalFs::new(), &remote, rules(&[]));
    let err = engine.push(&missing, "/srv/app").unwrap_err();

    match err {
        TugboatError::Scan { root, source } => {
            assert_eq!(root, missing);
            assert!(matches!(source, EndpointError::NotFound(_)));
        }
        other => panic!("expected scan error, got {other:?}"),
    }
    assert!(remote.ops().is_empty());
}

#[test]
fn file_as_source_root_is_a_scan_error() {
    let local = tempdir().unwrap();
    let file = local.path().join("single.txt");
    fs::write(&file, "x").unwrap();
    let remote = MemoryFs::new();

    let engine = SyncEngine::new(LocalFs::new(), &remote, rules(&[]));
    let err = engine.push(&file, "/srv/app").unwrap_err();

    assert!(matches!(
        err,
        TugboatError::Scan {
            source: EndpointError::NotADirectory(_),
            ..
        }
    ));
}

#[test]
fn first_failed_transfer_aborts_the_run() {
    let local = tempdir().unwrap();
    for name in ["a.txt", "b.txt", "c.txt"] {
        fs::write(local.path().join(name), name).unwrap();
    }
    let remote = MemoryFs::new().failing_create("/srv/app/b.txt");

    let engine = SyncEngine::new(LocalFs::new(), &remote, rules(&[]));
    let err = engine.push(local.path(), "/srv/app").unwrap_err();

    match err {
        TugboatError::Transfer { path, source } => {
            assert_eq!(path, "b.txt");
            assert!(matches!(source, EndpointError::PermissionDenied(_)));
        }
        other => panic!("expected transfer error, got {other:?}"),
    }
    // Already-copied files stay; later ones are never attempted
    assert!(remote.read("/srv/app/a.txt").is_some());
    assert!(!remote.ops().contains(&"create /srv/app/c.txt".to_string()));
}

#[test]
fn progress_reports_every_item_in_order() {
    let local = tempdir().unwrap();
    fs::write(local.path().join("a.txt"), "0123456789").unwrap();
    fs::write(local.path().join("b.txt"), "xy").unwrap();
    let remote = MemoryFs::new();
    let progress = Arc::new(RecordingProgress::default());

    let engine = SyncEngine::new(LocalFs::new(), &remote, rules(&[]))
        .with_progress(progress.clone());
    engine.push(local.path(), "/srv/app").unwrap();
    engine.push(local.path(), "/srv/app").unwrap();

    assert_eq!(
        progress.messages(),
        vec![
            "Uploading: a.txt (10 bytes)",
            "Uploading: b.txt (2 bytes)",
            "Skipped (up-to-date): a.txt",
            "Skipped (up-to-date): b.txt",
        ]
    );
    let events = progress.events.lock().unwrap();
    assert_eq!((events[1].current, events[1].total), (2, 2));
}

#[test]
fn pull_downloads_into_local_tree() {
    let local = tempdir().unwrap();
    let remote = MemoryFs::new();
    remote.put_file("/home/bob/app/config/app.toml", b"port = 80");
    remote.put_file("/home/bob/app/README.md", b"# app");
    let progress = Arc::new(RecordingProgress::default());

    let engine = SyncEngine::new(LocalFs::new(), &remote, rules(&[]))
        .with_progress(progress.clone());
    let report = engine.pull("~/app", local.path()).unwrap();

    assert_eq!(report.transferred, 2);
    assert_eq!(
        fs::read_to_string(local.path().join("config/app.toml")).unwrap(),
        "port = 80"
    );
    assert!(progress
        .messages()
        .contains(&"Downloading: README.md (5 bytes)".to_string()));

    let again = engine.pull("~/app", local.path()).unwrap();
    assert_eq!(again.transferred, 0);
}

#[test]
fn push_then_pull_round_trips_between_disks() {
    let source = tempdir().unwrap();
    let server = tempdir().unwrap();
    let restored = tempdir().unwrap();
    fs::create_dir_all(source.path().join("src/bin")).unwrap();
    fs::write(source.path().join("src/bin/tool.rs"), "fn main() {}").unwrap();
    fs::write(source.path().join("Cargo.toml"), "[package]").unwrap();
    fs::write(source.path().join("scratch.tmp"), "junk").unwrap();

    let ignore = rules(&["*.tmp"]);
    let server_root = server.path().to_string_lossy().into_owned();

    let push = SyncEngine::new(LocalFs::new(), LocalFs::new(), ignore.clone());
    push.push(source.path(), &server_root).unwrap();

    let pull = SyncEngine::new(LocalFs::new(), LocalFs::new(), ignore);
    let report = pull.pull(&server_root, restored.path()).unwrap();

    assert_eq!(report.transferred, 2);
    assert_eq!(
        fs::read_to_string(restored.path().join("src/bin/tool.rs")).unwrap(),
        "fn main() {}"
    );
    assert_eq!(
        fs::read_to_string(restored.path().join("Cargo.toml")).unwrap(),
        "[package]"
    );
    assert!(!restored.path().join("scratch.tmp").exists());
}

#[cfg(unix)]
#[test]
fn permissions_are_carried_over() {
    use std::os::unix::fs::PermissionsExt;
    let source = tempdir().unwrap();
    let dest = tempdir().unwrap();
    let script = source.path().join("run.sh");
    fs::write(&script, "#!/bin/sh\necho hi\n").unwrap();
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

    let engine = SyncEngine::new(LocalFs::new(), LocalFs::new(), rules(&[]));
    engine
        .push(source.path(), &dest.path().to_string_lossy())
        .unwrap();

    let mode = fs::metadata(dest.path().join("run.sh"))
        .unwrap()
        .permissions()
        .mode();
    assert_eq!(mode & 0o777, 0o755);
}

#[cfg(target_os = "linux")]
#[test]
fn names_that_are_not_utf8_are_skipped_and_counted() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;
    let source = tempdir().unwrap();
    let dest = tempdir().unwrap();
    fs::write(source.path().join(OsStr::from_bytes(b"caf\xe9.txt")), "latin-1").unwrap();
    fs::create_dir(source.path().join(OsStr::from_bytes(b"d\xeftes"))).unwrap();
    fs::write(source.path().join("ok.txt"), "fine").unwrap();

    let engine = SyncEngine::new(LocalFs::new(), LocalFs::new(), rules(&[]));
    let report = engine
        .push(source.path(), &dest.path().to_string_lossy())
        .unwrap();

    assert_eq!(report.transferred, 1);
    assert_eq!(report.ignored, 2);
    assert_eq!(fs::read_to_string(dest.path().join("ok.txt")).unwrap(), "fine");
    assert_eq!(fs::read_dir(dest.path()).unwrap().count(), 1);
}
