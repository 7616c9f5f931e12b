// ABOUTME: Portable configuration snapshots for Tutor
// ABOUTME: Export assembles a masked snapshot; import merges one idempotently

pub mod export;
pub mod import;
pub mod types;


pub use export::export_snapshot;
pub use import::{import_snapshot, ImportError};
pub use types::{ConfigSnapshot, ImportCounts, SnapshotSettings, SNAPSHOT_VERSION};
