// ABOUTME: Storage operations for bearer API tokens
// ABOUTME: Token generation, hashing, verification, and database operations

use base64::Engine;
use chrono::Utc;
use rand::Rng;
use sha2::{Digest, Sha256};
use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::api_tokens::types::{ApiToken, TokenGeneration};
use tutor_core::generate_row_id;
use tutor_storage::StorageError;

pub struct TokenStorage {
    pool: SqlitePool,
}

impl TokenStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Generate a cryptographically secure random token
    /// Returns a base64-encoded 32-byte token
    pub fn generate_token() -> String {
        let mut rng = rand::thread_rng();
        let random_bytes: [u8; 32] = rng.gen();
        base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(random_bytes)
    }

    /// Hash a token using SHA-256
    /// This is what gets stored in the database
    pub fn hash_token(token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        let result = hasher.finalize();
        hex::encode(result)
    }

    /// Verify a token against a stored hash using constant-time comparison
    /// This prevents timing attacks
    pub fn verify_token_hash(token: &str, stored_hash: &str) -> bool {
        let computed_hash = Self::hash_token(token);

        use subtle::ConstantTimeEq;
        computed_hash
            .as_bytes()
            .ct_eq(stored_hash.as_bytes())
            .into()
    }

    /// Create a new API token for a user
    pub async fn create_token(
        &self,
        user_id: &str,
        name: &str,
    ) -> Result<TokenGeneration, StorageError> {
        let id = generate_row_id();
        let token = Self::generate_token();
        let token_hash = Self::hash_token(&token);

        sqlx::query(
            "INSERT INTO api_tokens (id, user_id, token_hash, name, is_active, created_at)
             VALUES (?, ?, ?, ?, 1, ?)",
        )
        .bind(&id)
        .bind(user_id)
        .bind(&token_hash)
        .bind(name)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        Ok(TokenGeneration { id, token })
    }

    /// Verify a bearer token and return its record if valid
    pub async fn verify_token(&self, token: &str) -> Result<Option<ApiToken>, StorageError> {
        let token_hash = Self::hash_token(token);

        let row = sqlx::query(
            "SELECT id, user_id, token_hash, name, created_at, last_used_at, is_active
             FROM api_tokens
             WHERE token_hash = ? AND is_active = 1",
        )
        .bind(&token_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        match row {
            Some(row) => {
                let stored_hash: String = row.try_get("token_hash").map_err(StorageError::Sqlx)?;

                // Double-check with constant-time comparison
                if Self::verify_token_hash(token, &stored_hash) {
                    Ok(Some(self.row_to_token(row)?))
                } else {
                    Ok(None)
                }
            }
            None => Ok(None),
        }
    }

    /// Update the last_used_at timestamp for a token
    pub async fn update_last_used(&self, token_hash: &str) -> Result<(), StorageError> {
        sqlx::query(
            "UPDATE api_tokens
             SET last_used_at = ?
             WHERE token_hash = ? AND is_active = 1",
        )
        .bind(Utc::now())
        .bind(token_hash)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        Ok(())
    }

    /// List a user's tokens (hashes stay in the record but never serialize)
    pub async fn list_tokens(&self, user_id: &str) -> Result<Vec<ApiToken>, StorageError> {
        debug!("Listing tokens for user: {}", user_id);

        let rows = sqlx::query(
            "SELECT id, user_id, token_hash, name, created_at, last_used_at, is_active
             FROM api_tokens
             WHERE user_id = ?
             ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        rows.into_iter().map(|row| self.row_to_token(row)).collect()
    }

    /// Revoke a token (set is_active = 0)
    pub async fn revoke_token(&self, id: &str) -> Result<(), StorageError> {
        sqlx::query("UPDATE api_tokens SET is_active = 0 WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        Ok(())
    }

    /// Helper to convert database row to ApiToken
    fn row_to_token(&self, row: sqlx::sqlite::SqliteRow) -> Result<ApiToken, StorageError> {
        Ok(ApiToken {
            id: row.try_get("id").map_err(StorageError::Sqlx)?,
            user_id: row.try_get("user_id").map_err(StorageError::Sqlx)?,
            token_hash: row.try_get("token_hash").map_err(StorageError::Sqlx)?,
            name: row.try_get("name").map_err(StorageError::Sqlx)?,
            created_at: row.try_get("created_at").map_err(StorageError::Sqlx)?,
            last_used_at: row.try_get("last_used_at").map_err(StorageError::Sqlx)?,
            is_active: row
                .try_get::<i64, _>("is_active")
                .map_err(StorageError::Sqlx)?
                != 0,
        })
    }
}
