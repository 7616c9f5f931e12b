// ABOUTME: User identity module
// ABOUTME: Provides types and storage for user accounts

pub mod storage;
pub mod types;

pub use storage::UserStorage;
pub use types::User;
