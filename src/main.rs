//! Tugboat CLI - push a project to a remote host and redeploy its container
//!
//! Usage: tugboat [COMMAND]
//!
//! Commands:
//!   push   Upload the local folder, then rebuild and restart the container (default)
//!   pull   Download the remote folder into the local folder
//!   check  Validate configuration and connectivity

mod commands;

use clap::Parser;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use tugboat::presentation::output::TextRenderer;
use tugboat::presentation::{Cli, Commands, UiContext};

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let ui = UiContext::new(cli.json, cli.verbose, cli.color, cli.no_animation);
    let config = cli.config.as_deref();

    let result = match cli.command_or_default() {
        Commands::Push { no_deploy } => commands::push::cmd_push(config, no_deploy, &ui),
        Commands::Pull { yes } => commands::pull::cmd_pull(config, yes, &ui),
        Commands::Check => commands::check::cmd_check(config, &ui),
    };

    if let Err(e) = result {
        if ui.json {
            commands::emit(&serde_json::json!({
                "event": "error",
                "message": format!("{:#}", e),
            }));
        } else {
            let renderer = TextRenderer {
                color: ui.color,
                unicode: ui.unicode,
                verbose: ui.verbose,
            };
            eprint!("{}", renderer.error(&format!("error: {:#}", e)));
        }
        std::process::exit(1);
    }
}

/// Log to stderr; `-v` raises the level, `RUST_LOG` overrides it.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("tugboat={}", level)));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose > 2)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("warning: could not install logger: {}", e);
    }
}
