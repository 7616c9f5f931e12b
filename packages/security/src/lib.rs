// ABOUTME: Security layer for Tutor: credential encryption, bearer tokens, users
// ABOUTME: Everything that touches secrets or identity lives in this package

pub mod api_tokens;
pub mod encryption;
pub mod users;

// Re-export main types for convenience
pub use api_tokens::{ApiToken, TokenGeneration, TokenStorage};
pub use encryption::{CredentialCipher, EncryptionError};
pub use users::{User, UserStorage};
