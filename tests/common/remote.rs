//! A fake SSH host.
//!
//! `bin/ssh` is a shell script that ignores every client option, logs the
//! remote command and runs it with `sh -c` under a private `$HOME`. A fake
//! `docker` in the same `bin/` records its arguments, so deployments can be
//! asserted without a daemon.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tugboat::infrastructure::{SshSession, SshTarget};

pub const CONTAINER_ID: &str = "4f1c2d3e4b5a69788796a5b4c3d2e1f00112233445566778899aabbccddeeff0";

pub struct FakeRemote {
    root: TempDir,
}

impl FakeRemote {
    pub fn new() -> Self {
        let remote = Self {
            root: tempfile::tempdir().unwrap(),
        };
        fs::create_dir_all(remote.home()).unwrap();
        fs::create_dir_all(remote.bin()).unwrap();

        remote.install(
            "ssh",
            &format!(
                r#"#!/bin/sh
for arg; do
  [ "$arg" = "-O" ] && exit 0
  last=$arg
done
printf '%s\n' "$last" >> '{log}'
HOME='{home}'
PATH='{bin}':$PATH
export HOME PATH
exec sh -c "$last"
"#,
                log = remote.log().display(),
                home = remote.home().display(),
                bin = remote.bin().display(),
            ),
        );
        remote.install(
            "docker",
            &format!(
                r#"#!/bin/sh
printf '%s\n' "$*" >> '{log}'
case "$1" in
  build) echo "Step 1/1 : FROM scratch"; echo "building" >&2 ;;
  run) echo {id} ;;
esac
exit 0
"#,
                log = remote.docker_log().display(),
                id = CONTAINER_ID,
            ),
        );
        remote
    }

    fn install(&self, name: &str, script: &str) {
        let path = self.bin().join(name);
        fs::write(&path, script).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    /// Make `docker <subcommand>` exit non-zero
    pub fn fail_docker(&self, subcommand: &str) {
        self.install(
            "docker",
            &format!(
                r#"#!/bin/sh
printf '%s\n' "$*" >> '{log}'
if [ "$1" = "{sub}" ]; then echo "docker {sub} exploded" >&2; exit 1; fi
exit 0
"#,
                log = self.docker_log().display(),
                sub = subcommand,
            ),
        );
    }

    /// `$HOME` on the fake host
    pub fn home(&self) -> PathBuf {
        self.root.path().join("home")
    }

    /// Directory holding the fake `ssh` and `docker`
    pub fn bin(&self) -> PathBuf {
        self.root.path().join("bin")
    }

    pub fn ssh_program(&self) -> PathBuf {
        self.bin().join("ssh")
    }

    fn log(&self) -> PathBuf {
        self.root.path().join("ssh.log")
    }

    fn docker_log(&self) -> PathBuf {
        self.root.path().join("docker.log")
    }

    /// Remote commands in the order they ran
    pub fn commands(&self) -> Vec<String> {
        read_lines(&self.log())
    }

    /// Arguments of every `docker` invocation
    pub fn docker_calls(&self) -> Vec<String> {
        read_lines(&self.docker_log())
    }

    pub fn session(&self) -> SshSession {
        let mut target = SshTarget::new("fakehost", "bob");
        target.multiplex = false;
        SshSession::new(target).with_program(self.ssh_program())
    }

    /// PATH with the fake `ssh` first
    pub fn path_env(&self) -> String {
        let path = std::env::var("PATH").unwrap_or_default();
        format!("{}:{}", self.bin().display(), path)
    }
}

fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .map(|s| s.lines().map(str::to_string).collect())
        .unwrap_or_default()
}
