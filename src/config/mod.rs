//! Configuration module for tugboat
//!
//! Configuration hierarchy:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (TUGBOAT_*)
//! 3. Config file (`tugboat.toml`, or the legacy `pooshit_config`)
//! 4. Built-in defaults (lowest priority)

mod loader;
mod types;

pub use loader::{
    apply_overrides, parse_legacy, resolve_config_path, ConfigWarning, DEFAULT_CONFIG_FILE,
    LEGACY_CONFIG_FILE,
};
pub use types::{Config, DockerConfig, LocalConfig, RemoteConfig, SyncConfig};
