//! Subcommand handlers

pub mod check;
pub mod pull;
pub mod push;

use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use tugboat::config::{resolve_config_path, Config};
use tugboat::presentation::output::TextRenderer;
use tugboat::presentation::UiContext;

/// Write one NDJSON event to stdout
pub fn emit(event: &impl Serialize) {
    if let Err(e) = tugboat::ui::json::emit(event) {
        tracing::debug!(error = %e, "failed to write JSON event");
    }
}

pub fn renderer(ui: &UiContext) -> TextRenderer {
    TextRenderer {
        color: ui.color,
        unicode: ui.unicode,
        verbose: ui.verbose,
    }
}

/// Resolve, load and validate the configuration. Unknown keys are reported
/// but do not stop the run.
pub fn load_config(explicit: Option<&Path>, ui: &UiContext) -> Result<Config> {
    let cwd = std::env::current_dir()?;
    let path = resolve_config_path(explicit, &cwd);
    tracing::debug!(path = %path.display(), "loading configuration");

    let (config, warnings) = Config::load_with_warnings(&path)?;
    for warning in &warnings {
        if ui.json {
            emit(&serde_json::json!({
                "event": "warning",
                "message": warning.to_string(),
            }));
        } else {
            eprint!("{}", renderer(ui).warning(&warning.to_string()));
        }
    }

    let config = config.with_env_overrides();
    config.validate()?;
    Ok(config)
}
