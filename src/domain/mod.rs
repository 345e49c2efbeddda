//! Domain Layer
//!
//! This is the core of Tugboat - sync and deploy rules without I/O dependencies.
//!
//! ## Structure
//!
//! - `entities/` - Values produced by a sync run (Entry, TransferItem, SyncPlan, SyncReport)
//! - `value_objects/` - Immutable value types (IgnoreRules, remote root resolution)
//! - `services/` - Domain services (TreeWalker, change detection)
//! - `ports/` - Interface definitions for infrastructure (Endpoint, CommandRunner, ProgressSink)
//!
//! ## Design Principles
//!
//! 1. **No direct I/O** - Filesystems and remote shells are only reached through ports
//! 2. **Pure Functions** - Matching and change detection are stateless and testable
//! 3. **Ports & Adapters** - `LocalFs`, `RemoteFs` and `SshSession` live in infrastructure

pub mod entities;
pub mod ports;
pub mod services;
pub mod value_objects;
