use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;

use tugboat::application::sync::{inspect_folder, Direction};
use tugboat::config::Config;
use tugboat::domain::ports::ProgressSink;
use tugboat::domain::value_objects::resolve_remote_root;
use tugboat::error::TugboatError;
use tugboat::infrastructure::LocalFs;
use tugboat::presentation::factory::{self, ConcreteSyncEngine};
use tugboat::presentation::UiContext;

use super::{emit, load_config, renderer};

pub fn cmd_push(config_path: Option<&Path>, no_deploy: bool, ui: &UiContext) -> Result<()> {
    let config = load_config(config_path, ui)?;
    let local_root = config.local.folder.as_path();

    let summary = inspect_folder(&LocalFs::new(), local_root).map_err(|source| {
        TugboatError::Scan {
            root: local_root.to_path_buf(),
            source,
        }
    })?;

    if ui.json {
        emit(&serde_json::json!({
            "event": "start",
            "command": "push",
            "local": local_root.display().to_string(),
            "remote": config.remote.folder,
            "local_folder": summary,
            "deploy": !no_deploy,
        }));
    } else {
        let r = renderer(ui);
        print!(
            "{}",
            r.header(Direction::Push, local_root, &config.remote.folder)
        );
        print!("{}", r.folder_summary(local_root, &summary));
        println!();
    }

    let remote = factory::connect(&config)?;
    let progress = factory::create_progress(ui);
    let engine = factory::create_sync_engine(&config, remote, progress.clone())?;

    let result = push_and_deploy(&engine, &config, no_deploy, ui, progress);
    engine.remote().session().close();
    result
}

fn push_and_deploy(
    engine: &ConcreteSyncEngine,
    config: &Config,
    no_deploy: bool,
    ui: &UiContext,
    progress: Arc<dyn ProgressSink>,
) -> Result<()> {
    let report = engine.push(&config.local.folder, &config.remote.folder)?;

    if ui.json {
        emit(&serde_json::json!({
            "event": "sync_complete",
            "direction": "push",
            "report": report,
            "finished_at": Utc::now().to_rfc3339(),
        }));
    } else {
        print!("{}", renderer(ui).sync_summary(Direction::Push, &report));
    }

    if no_deploy {
        return Ok(());
    }

    // Home was cached by the push, so this does not hit the network again
    let context = resolve_remote_root(engine.remote(), &config.remote.folder)
        .map_err(TugboatError::RemoteHome)?;
    let spec = config.deploy_spec(context.display().to_string());

    if !ui.json {
        println!();
    }
    let session = engine.remote().session();
    let sequencer = factory::create_sequencer(session, progress, factory::create_output(ui));
    let outcome = sequencer.run(&spec)?;

    if ui.json {
        emit(&serde_json::json!({
            "event": "deploy_complete",
            "image": spec.image,
            "outcome": outcome,
            "finished_at": Utc::now().to_rfc3339(),
        }));
    } else {
        print!("{}", renderer(ui).deploy_summary(&spec.image, &outcome));
    }
    Ok(())
}
