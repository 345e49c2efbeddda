//! Remote root resolution
//!
//! Configured remote folders may start with `~/`. The shell on the far side
//! never sees the raw path (every path is quoted), so the home directory is
//! looked up through the endpoint and spliced in before any other operation.

use std::path::PathBuf;

use crate::domain::ports::{Endpoint, EndpointResult};

/// True when the path starts with the home shorthand (`~` or `~/...`).
pub fn is_home_relative(raw: &str) -> bool {
    raw == "~" || raw.starts_with("~/")
}

/// Replace a leading `~` with `home`. Other paths are returned unchanged.
pub fn expand_remote_home(raw: &str, home: &str) -> String {
    let home = home.trim_end_matches('/');
    if raw == "~" {
        return if home.is_empty() { "/".to_string() } else { home.to_string() };
    }
    match raw.strip_prefix("~/") {
        Some(rest) => {
            let rest = rest.trim_start_matches('/');
            if rest.is_empty() {
                home.to_string()
            } else {
                format!("{}/{}", home, rest)
            }
        }
        None => raw.to_string(),
    }
}

/// Resolve a raw remote folder against an endpoint.
///
/// The home directory is only queried when the path needs it.
pub fn resolve_remote_root(endpoint: &dyn Endpoint, raw: &str) -> EndpointResult<PathBuf> {
    if !is_home_relative(raw) {
        return Ok(PathBuf::from(raw));
    }
    let home = endpoint.home_dir()?;
    Ok(PathBuf::from(expand_remote_home(raw, &home)))
}
