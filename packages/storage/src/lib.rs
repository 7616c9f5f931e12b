// ABOUTME: Data layer for Tutor: error types and SQLite pool bootstrap
// ABOUTME: All domain storages share the pool and error enum defined here

pub mod db;
pub mod error;

pub use db::{connect, connect_in_memory, MIGRATOR};
pub use error::{StorageError, StorageResult};
