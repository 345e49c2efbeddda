//! CLI Argument Parsing
//!
//! This module defines the CLI interface using clap.
//!
//! ## Design Notes
//!
//! - Global flags (--config, --json, --color, --verbose, --no-animation) are inherited by all subcommands
//! - Running `tugboat` without a subcommand performs a push

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorWhen {
    Auto,
    Always,
    Never,
}

/// Tugboat - push a project to a remote host and redeploy its container
#[derive(Parser, Debug)]
#[command(name = "tugboat")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "Run 'tugboat' without arguments to push and deploy.")]
pub struct Cli {
    /// Configuration file (defaults to ./tugboat.toml, then ./pooshit_config)
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Output format for CI
    #[arg(long, global = true)]
    pub json: bool,

    /// Color output mode
    #[arg(long, global = true, value_enum)]
    pub color: Option<ColorWhen>,

    /// Disable animations (progress bars, live updates)
    #[arg(long, global = true)]
    pub no_animation: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Upload the local folder, then rebuild and restart the container
    Push {
        /// Only sync files, skip the Docker steps
        #[arg(long)]
        no_deploy: bool,
    },

    /// Download the remote folder into the local folder
    Pull {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Validate configuration and connectivity without changing anything
    Check,
}

impl Cli {
    /// The subcommand to run; a bare `tugboat` pushes and deploys.
    pub fn command_or_default(&self) -> Commands {
        match &self.command {
            Some(Commands::Push { no_deploy }) => Commands::Push {
                no_deploy: *no_deploy,
            },
            Some(Commands::Pull { yes }) => Commands::Pull { yes: *yes },
            Some(Commands::Check) => Commands::Check,
            None => Commands::Push { no_deploy: false },
        }
    }
}
