// ABOUTME: Bearer token management module
// ABOUTME: Token generation, storage, and authentication

pub mod storage;
pub mod types;

pub use storage::TokenStorage;
pub use types::{ApiToken, TokenGeneration};
