//! Configuration type definitions

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::application::deploy::DeploySpec;
use crate::domain::value_objects::{IgnoreRules, DEFAULT_IGNORE_PATTERNS};
use crate::error::{TugboatError, TugboatResult};
use crate::infrastructure::ssh::SshTarget;

use super::loader::{self, ConfigWarning};

/// Remote host and target folder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// `host` or `host:port`
    #[serde(default)]
    pub server: String,

    #[serde(default)]
    pub username: String,

    /// Password auth through `sshpass`; key auth when unset
    #[serde(default)]
    pub password: Option<String>,

    #[serde(default)]
    pub identity_file: Option<PathBuf>,

    /// Remote folder; may start with `~/`
    #[serde(default)]
    pub folder: String,

    /// Share one SSH connection across all remote operations
    #[serde(default = "default_true")]
    pub multiplex: bool,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            server: String::new(),
            username: String::new(),
            password: None,
            identity_file: None,
            folder: String::new(),
            multiplex: true,
        }
    }
}

/// Local side of the sync
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalConfig {
    #[serde(default = "default_local_folder")]
    pub folder: PathBuf,
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            folder: default_local_folder(),
        }
    }
}

fn default_local_folder() -> PathBuf {
    PathBuf::from(".")
}

/// Container workload rebuilt after a push
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DockerConfig {
    #[serde(default)]
    pub image: String,

    /// Arguments placed before the image name in `docker build`; `-t` when empty
    #[serde(default)]
    pub build_args: String,

    /// Arguments placed before the image name in `docker run`; `-d` when empty
    #[serde(default)]
    pub run_args: String,

    #[serde(default = "default_true")]
    pub sudo: bool,
}

impl Default for DockerConfig {
    fn default() -> Self {
        Self {
            image: String::new(),
            build_args: String::new(),
            run_args: String::new(),
            sudo: true,
        }
    }
}

/// Sync behaviour
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SyncConfig {
    /// Ignore patterns; the built-in list applies when empty
    #[serde(default)]
    pub ignore: Vec<String>,
}

fn default_true() -> bool {
    true
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub remote: RemoteConfig,

    #[serde(default)]
    pub local: LocalConfig,

    #[serde(default)]
    pub docker: DockerConfig,

    #[serde(default)]
    pub sync: SyncConfig,
}

impl Config {
    /// Load configuration from a TOML or `KEY: value` file
    pub fn load(path: &Path) -> TugboatResult<Self> {
        let (config, _warnings) = loader::load_with_warnings(path)?;
        Ok(config)
    }

    /// Load configuration and collect non-fatal warnings (e.g. unknown keys).
    pub fn load_with_warnings(path: &Path) -> TugboatResult<(Self, Vec<ConfigWarning>)> {
        loader::load_with_warnings(path)
    }

    /// Apply environment variable overrides (TUGBOAT_* prefix)
    pub fn with_env_overrides(self) -> Self {
        loader::with_env_overrides(self)
    }

    /// Check that every required field is present
    pub fn validate(&self) -> TugboatResult<()> {
        let required = [
            ("remote.server", &self.remote.server),
            ("remote.username", &self.remote.username),
            ("remote.folder", &self.remote.folder),
            ("docker.image", &self.docker.image),
        ];
        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(key, _)| *key)
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(TugboatError::Config(format!(
                "missing required field(s): {}",
                missing.join(", ")
            )))
        }
    }

    /// Patterns in effect: the configured list, or the defaults when empty
    pub fn ignore_patterns(&self) -> Vec<String> {
        if self.sync.ignore.is_empty() {
            DEFAULT_IGNORE_PATTERNS.iter().map(|p| p.to_string()).collect()
        } else {
            self.sync.ignore.clone()
        }
    }

    /// Compile the ignore patterns once for the run
    pub fn ignore_rules(&self) -> TugboatResult<IgnoreRules> {
        IgnoreRules::compile(self.ignore_patterns())
            .map_err(|e| TugboatError::Config(e.to_string()))
    }

    /// SSH connection parameters, with `~` in the identity file expanded locally
    pub fn ssh_target(&self) -> SshTarget {
        let mut target = SshTarget::new(&self.remote.server, self.remote.username.trim());
        target.password = self
            .remote
            .password
            .clone()
            .filter(|p| !p.is_empty());
        target.identity_file = self.remote.identity_file.as_deref().map(expand_local_home);
        target.multiplex = self.remote.multiplex;
        target
    }

    /// Deployment parameters for a build context at the resolved remote root
    pub fn deploy_spec(&self, context_path: impl Into<String>) -> DeploySpec {
        DeploySpec::new(self.docker.image.trim(), context_path)
            .with_build_args(self.docker.build_args.clone())
            .with_run_args(self.docker.run_args.clone())
            .with_sudo(self.docker.sudo)
    }
}

fn expand_local_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| path.to_path_buf()),
        Err(_) => path.to_path_buf(),
    }
}
