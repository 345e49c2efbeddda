//! Presentation Layer
//!
//! This layer handles:
//! - CLI argument parsing (via clap)
//! - Creating the engine and sequencer with infrastructure dependencies
//! - Output formatting (text/JSON) and progress rendering
//!
//! ## Structure
//!
//! - `cli` - Command line definition
//! - `context` - Color, unicode and animation settings for one run
//! - `factory` - Creates use cases with proper dependencies (dependency injection)
//! - `output` - Summary rendering and build output echo
//! - `progress` - Progress sinks (console bar, NDJSON)
//!
//! ## Usage
//!
//! ```ignore
//! use tugboat::presentation::factory;
//!
//! let remote = factory::connect(&config)?;
//! let engine = factory::create_sync_engine(&config, remote, progress)?;
//! let report = engine.push(&config.local.folder, &config.remote.folder)?;
//! ```

pub mod cli;
pub mod context;
pub mod factory;
pub mod output;
pub mod progress;

pub use cli::{Cli, ColorWhen, Commands};
pub use context::UiContext;
