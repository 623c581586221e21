//! Core library for the calsync event server.
//!
//! This crate owns everything with real invariants:
//! - `EventStore`: the durable, file-backed event collection
//! - `BackupManager`: timestamped pre-write snapshots with retention
//! - `PermissionGate`: bearer-token to permission-set resolution
//! - `Config`: the static process configuration
//!
//! The HTTP layer in calsync-server is a thin shim over these types.

pub mod backup;
pub mod config;
pub mod error;
pub mod event;
pub mod permissions;
pub mod store;

pub use backup::BackupManager;
pub use config::Config;
pub use error::{CalSyncError, CalSyncResult};
pub use event::{Event, EventDraft, EventPatch};
pub use permissions::{PermissionGate, PermissionSet};
pub use store::{EventStore, LoadOutcome};
