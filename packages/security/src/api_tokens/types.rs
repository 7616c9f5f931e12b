// ABOUTME: Bearer token type definitions
// ABOUTME: Stored token records and the one-time generation result

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A stored API token. Only the SHA-256 hash of the bearer token is
/// persisted; the plaintext exists once, in `TokenGeneration`.
#[derive(Debug, Clone, Serialize)]
pub struct ApiToken {
    pub id: String,
    pub user_id: String,
    #[serde(skip_serializing)]
    pub token_hash: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub last_used_at: Option<DateTime<Utc>>,
    pub is_active: bool,
}

/// Result of creating a token: the plaintext is shown to the caller once
/// and never stored.
#[derive(Debug)]
pub struct TokenGeneration {
    pub id: String,
    pub token: String,
}
