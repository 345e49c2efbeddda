//! Configuration loading
//!
//! Two on-disk formats are understood: TOML (`tugboat.toml`) and the older
//! flat `KEY: value` file (`pooshit_config`). The format is chosen by file
//! extension.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{TugboatError, TugboatResult};

use super::types::Config;

/// Default TOML configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "tugboat.toml";

/// Legacy flat configuration file name
pub const LEGACY_CONFIG_FILE: &str = "pooshit_config";

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown config key '{}' in {}", self.key, self.file.display())?;
        if let Some(line) = self.line {
            write!(f, ":{}", line)?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, " (did you mean '{}'?)", suggestion)?;
        }
        Ok(())
    }
}

/// Pick the configuration file: the explicit one, else `tugboat.toml`, else
/// `pooshit_config` when only that exists in `dir`.
pub fn resolve_config_path(explicit: Option<&Path>, dir: &Path) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    let primary = dir.join(DEFAULT_CONFIG_FILE);
    let legacy = dir.join(LEGACY_CONFIG_FILE);
    if !primary.exists() && legacy.exists() {
        legacy
    } else {
        primary
    }
}

fn is_toml(path: &Path) -> bool {
    path.extension().map(|ext| ext == "toml").unwrap_or(false)
}

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> TugboatResult<(Config, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path).map_err(|e| {
        TugboatError::Config(format!("failed to read {}: {}", path.display(), e))
    })?;

    if is_toml(path) {
        parse_toml(&content, path)
    } else {
        Ok(parse_legacy(&content, path))
    }
}

fn parse_toml(content: &str, path: &Path) -> TugboatResult<(Config, Vec<ConfigWarning>)> {
    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(content);

    let config: Config = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| TugboatError::Config(format!("invalid {}: {}", path.display(), e)))?;

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                line: find_line_number(content, &key),
                suggestion: suggest_key(&key, TOML_KEYS),
                key,
                file: path.to_path_buf(),
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Parse the flat `KEY: value` format.
///
/// Blank lines and `#` comments are skipped, as are lines without a colon.
/// Only the first colon separates key from value, so `host:port` values
/// survive.
pub fn parse_legacy(content: &str, path: &Path) -> (Config, Vec<ConfigWarning>) {
    let mut config = Config::default();
    let mut warnings = Vec::new();

    for (index, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim();
        let value = value.trim().to_string();

        match key {
            "REMOTE_SERVER" => config.remote.server = value,
            "SSH_USERNAME" => config.remote.username = value,
            "SSH_PASSWORD" => config.remote.password = Some(value).filter(|v| !v.is_empty()),
            "SSH_IDENTITY_FILE" if !value.is_empty() => {
                config.remote.identity_file = Some(PathBuf::from(value))
            }
            "SSH_IDENTITY_FILE" => {}
            "REMOTE_FOLDER" => config.remote.folder = value,
            "LOCAL_FOLDER" if !value.is_empty() => config.local.folder = PathBuf::from(value),
            "LOCAL_FOLDER" => {}
            "DOCKER_IMAGE_NAME" => config.docker.image = value,
            "DOCKER_BUILD_ARGS" => config.docker.build_args = value,
            "DOCKER_RUN_ARGS" => config.docker.run_args = value,
            "IGNORE" => config.sync.ignore.extend(split_list(&value)),
            other => warnings.push(ConfigWarning {
                key: other.to_string(),
                file: path.to_path_buf(),
                line: Some(index + 1),
                suggestion: suggest_key(other, LEGACY_KEYS),
            }),
        }
    }

    (config, warnings)
}

/// Split a comma-separated list, dropping empty items
fn split_list(value: &str) -> impl Iterator<Item = String> + '_ {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Apply environment variable overrides (TUGBOAT_* prefix)
pub fn with_env_overrides(config: Config) -> Config {
    apply_overrides(config, |key| std::env::var(key).ok())
}

/// Apply overrides from any key lookup. Empty values are ignored.
pub fn apply_overrides<F>(mut config: Config, lookup: F) -> Config
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(server) = get("TUGBOAT_REMOTE_SERVER") {
        config.remote.server = server;
    }
    if let Some(folder) = get("TUGBOAT_REMOTE_FOLDER") {
        config.remote.folder = folder;
    }
    if let Some(folder) = get("TUGBOAT_LOCAL_FOLDER") {
        config.local.folder = PathBuf::from(folder);
    }
    if let Some(image) = get("TUGBOAT_DOCKER_IMAGE") {
        config.docker.image = image;
    }
    // TUGBOAT_IGNORE (comma-separated)
    if let Some(ignore) = get("TUGBOAT_IGNORE") {
        let patterns: Vec<String> = split_list(&ignore).collect();
        if !patterns.is_empty() {
            config.sync.ignore = patterns;
        }
    }

    config
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    content
        .lines()
        .position(|line| line.contains(needle))
        .map(|i| i + 1)
}

const TOML_KEYS: &[&str] = &[
    "remote",
    "server",
    "username",
    "password",
    "identity_file",
    "folder",
    "multiplex",
    "local",
    "docker",
    "image",
    "build_args",
    "run_args",
    "sudo",
    "sync",
    "ignore",
];

const LEGACY_KEYS: &[&str] = &[
    "REMOTE_SERVER",
    "SSH_USERNAME",
    "SSH_PASSWORD",
    "SSH_IDENTITY_FILE",
    "REMOTE_FOLDER",
    "LOCAL_FOLDER",
    "DOCKER_IMAGE_NAME",
    "DOCKER_BUILD_ARGS",
    "DOCKER_RUN_ARGS",
    "IGNORE",
];

fn suggest_key(unknown: &str, candidates: &[&str]) -> Option<String> {
    let mut best: Option<(&str, usize)> = None;
    for &candidate in candidates {
        let dist = levenshtein(unknown, candidate);
        best = match best {
            None => Some((candidate, dist)),
            Some((_, best_dist)) if dist < best_dist => Some((candidate, dist)),
            Some(current) => Some(current),
        };
    }

    match best {
        Some((candidate, dist)) if dist <= 2 => Some(candidate.to_string()),
        _ => None,
    }
}

fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    let mut prev: Vec<usize> = (0..=b_bytes.len()).collect();
    let mut curr = vec![0usize; b_bytes.len() + 1];

    for (i, &ac) in a_bytes.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &bc) in b_bytes.iter().enumerate() {
            let cost = usize::from(ac != bc);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        prev.clone_from_slice(&curr);
    }

    prev[b_bytes.len()]
}
