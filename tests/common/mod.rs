//! Common test utilities for Tugboat integration tests.
//!
//! This module provides:
//! - `FakeRemote`: a stand-in SSH host backed by a temp directory
//! - `TestEnv`: a project directory plus helpers to run the CLI

#![allow(dead_code)]

pub mod env;
#[cfg(unix)]
pub mod remote;

pub use env::*;
#[cfg(unix)]
pub use remote::*;
