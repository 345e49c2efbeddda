//! Domain Value Objects
//!
//! Immutable value types compiled once per run.

mod ignore_rules;
mod remote_root;
mod shell;

pub use ignore_rules::{IgnoreError, IgnoreRule, IgnoreRules, DEFAULT_IGNORE_PATTERNS};
pub use remote_root::{expand_remote_home, is_home_relative, resolve_remote_root};
pub use shell::{shell_quote, shell_word};
