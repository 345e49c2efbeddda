use std::path::Path;

use anyhow::Result;

use tugboat::application::sync::inspect_folder;
use tugboat::domain::value_objects::resolve_remote_root;
use tugboat::infrastructure::ssh::program_exists;
use tugboat::infrastructure::LocalFs;
use tugboat::presentation::factory;
use tugboat::presentation::UiContext;

use super::{emit, load_config, renderer};

struct Checks<'a> {
    ui: &'a UiContext,
    failed: usize,
}

impl Checks<'_> {
    fn record(&mut self, name: &str, ok: bool, detail: &str) {
        if !ok {
            self.failed += 1;
        }
        if self.ui.json {
            emit(&serde_json::json!({
                "event": "check",
                "name": name,
                "ok": ok,
                "detail": detail,
            }));
        } else {
            print!("{}", renderer(self.ui).check_line(ok, name, detail));
        }
    }
}

pub fn cmd_check(config_path: Option<&Path>, ui: &UiContext) -> Result<()> {
    let config = load_config(config_path, ui)?;
    let mut checks = Checks { ui, failed: 0 };

    if !ui.json {
        let icons = tugboat::ui::theme::Icons::select(ui.unicode);
        println!("{} Tugboat Check", icons.check);
        println!();
    }

    checks.record("config", true, "all required fields present");

    match config.ignore_rules() {
        Ok(rules) => checks.record("ignore", true, &format!("{} pattern(s)", rules.len())),
        Err(e) => checks.record("ignore", false, &e.to_string()),
    }

    let local_root = config.local.folder.as_path();
    match inspect_folder(&LocalFs::new(), local_root) {
        Ok(summary) if summary.has_dockerfile => checks.record(
            "local",
            true,
            &format!("{} ({} entries)", local_root.display(), summary.visible_entries),
        ),
        Ok(_) => checks.record(
            "local",
            false,
            &format!("no Dockerfile in {}", local_root.display()),
        ),
        Err(e) => checks.record("local", false, &e.to_string()),
    }

    let target = config.ssh_target();
    if target.password.is_some() {
        let found = program_exists(Path::new("sshpass"));
        let detail = if found {
            "found"
        } else {
            "not found; install sshpass or use key authentication"
        };
        checks.record("sshpass", found, detail);
    }

    match factory::connect(&config) {
        Ok(remote) => {
            checks.record("ssh", true, &remote.session().display_name());
            match resolve_remote_root(&remote, &config.remote.folder) {
                Ok(root) => checks.record("remote", true, &root.display().to_string()),
                Err(e) => checks.record("remote", false, &e.to_string()),
            }
            remote.session().close();
        }
        Err(e) => checks.record("ssh", false, &e.to_string()),
    }

    if checks.failed > 0 {
        anyhow::bail!("{} check(s) failed", checks.failed);
    }
    if !ui.json {
        println!();
        println!("All checks passed");
    }
    Ok(())
}
