use std::path::Path;

use anyhow::Result;
use chrono::Utc;
use dialoguer::Confirm;
use is_terminal::IsTerminal;

use tugboat::application::sync::Direction;
use tugboat::error::TugboatError;
use tugboat::presentation::factory;
use tugboat::presentation::UiContext;

use super::{emit, load_config, renderer};

pub fn cmd_pull(config_path: Option<&Path>, yes: bool, ui: &UiContext) -> Result<()> {
    let config = load_config(config_path, ui)?;
    let local_root = config.local.folder.as_path();
    let remote_root = config.remote.folder.as_str();

    if ui.json {
        emit(&serde_json::json!({
            "event": "start",
            "command": "pull",
            "local": local_root.display().to_string(),
            "remote": remote_root,
        }));
    } else {
        print!(
            "{}",
            renderer(ui).header(Direction::Pull, local_root, remote_root)
        );
    }

    if !yes {
        // Nobody to ask: refuse rather than overwrite silently
        if ui.json || !std::io::stdin().is_terminal() {
            return Err(TugboatError::Aborted.into());
        }
        let confirmed = Confirm::new()
            .with_prompt("This will overwrite local files with remote files. Continue?")
            .default(false)
            .interact()?;
        if !confirmed {
            return Err(TugboatError::Aborted.into());
        }
    }

    let remote = factory::connect(&config)?;
    let engine = factory::create_sync_engine(&config, remote, factory::create_progress(ui))?;
    let result = engine.pull(remote_root, local_root);
    engine.remote().session().close();
    let report = result?;

    if ui.json {
        emit(&serde_json::json!({
            "event": "sync_complete",
            "direction": "pull",
            "report": report,
            "finished_at": Utc::now().to_rfc3339(),
        }));
    } else {
        print!("{}", renderer(ui).sync_summary(Direction::Pull, &report));
    }
    Ok(())
}
