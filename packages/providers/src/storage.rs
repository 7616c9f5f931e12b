// ABOUTME: Storage operations for AI providers
// ABOUTME: Masked projections never select the credential column

use chrono::Utc;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::types::{
    AiProvider, MaskedProvider, ProviderImportRow, ProviderInput, ProviderUpdate,
    CREDENTIAL_SENTINEL,
};
use tutor_core::generate_row_id;
use tutor_security::CredentialCipher;
use tutor_storage::StorageError;

/// Column list for masked reads. `api_key_encrypted` is excluded here,
/// not nulled later: the credential never crosses the query boundary.
const MASKED_COLUMNS: &str =
    "id, name, kind, api_url, model, logo_url, languages_supported, created_at, updated_at";

pub struct ProviderStorage {
    pool: SqlitePool,
    cipher: CredentialCipher,
}

impl ProviderStorage {
    pub fn new(pool: SqlitePool) -> Result<Self, StorageError> {
        let cipher = CredentialCipher::new().map_err(|e| {
            tracing::error!("Failed to initialize credential encryption: {}", e);
            StorageError::Encryption(format!("Failed to initialize encryption: {}", e))
        })?;
        Ok(Self { pool, cipher })
    }

    /// All of a user's providers in creation order, masked.
    pub async fn list_masked(&self, user_id: &str) -> Result<Vec<MaskedProvider>, StorageError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM ai_providers WHERE user_id = ? ORDER BY created_at, rowid",
            MASKED_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        rows.iter().map(|row| self.row_to_masked(row)).collect()
    }

    pub async fn get_masked(
        &self,
        user_id: &str,
        id: &str,
    ) -> Result<Option<MaskedProvider>, StorageError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM ai_providers WHERE id = ? AND user_id = ?",
            MASKED_COLUMNS
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        row.map(|row| self.row_to_masked(&row)).transpose()
    }

    /// Full row for dispatch. Never leaves the process.
    pub async fn get(&self, user_id: &str, id: &str) -> Result<Option<AiProvider>, StorageError> {
        let row = sqlx::query("SELECT * FROM ai_providers WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        row.map(|row| self.row_to_provider(&row)).transpose()
    }

    /// Decrypt a provider's stored credential for an outbound call.
    pub fn credential(&self, provider: &AiProvider) -> Result<String, StorageError> {
        self.cipher
            .decrypt(&provider.api_key_encrypted)
            .map_err(|e| StorageError::Encryption(e.to_string()))
    }

    pub async fn create(
        &self,
        user_id: &str,
        input: ProviderInput,
    ) -> Result<MaskedProvider, StorageError> {
        debug!("Creating provider {} for user {}", input.name, user_id);

        let id = generate_row_id();
        let now = Utc::now();
        let encrypted = self
            .cipher
            .encrypt(&input.api_key)
            .map_err(|e| StorageError::Encryption(e.to_string()))?;

        sqlx::query(
            "INSERT INTO ai_providers
                 (id, user_id, name, kind, api_url, model, logo_url, languages_supported, api_key_encrypted, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(user_id)
        .bind(&input.name)
        .bind(&input.kind)
        .bind(&input.api_url)
        .bind(&input.model)
        .bind(&input.logo_url)
        .bind(serde_json::to_string(&input.languages_supported)?)
        .bind(&encrypted)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        self.get_masked(user_id, &id).await?.ok_or(StorageError::NotFound)
    }

    pub async fn update(
        &self,
        user_id: &str,
        id: &str,
        update: ProviderUpdate,
    ) -> Result<MaskedProvider, StorageError> {
        debug!("Updating provider {} for user {}", id, user_id);

        let encrypted = match &update.api_key {
            Some(key) => Some(
                self.cipher
                    .encrypt(key)
                    .map_err(|e| StorageError::Encryption(e.to_string()))?,
            ),
            None => None,
        };
        let languages = match &update.languages_supported {
            Some(list) => Some(serde_json::to_string(list)?),
            None => None,
        };

        let result = sqlx::query(
            "UPDATE ai_providers
             SET name = COALESCE(?, name),
                 kind = COALESCE(?, kind),
                 api_url = COALESCE(?, api_url),
                 model = COALESCE(?, model),
                 logo_url = COALESCE(?, logo_url),
                 languages_supported = COALESCE(?, languages_supported),
                 api_key_encrypted = COALESCE(?, api_key_encrypted),
                 updated_at = ?
             WHERE id = ? AND user_id = ?",
        )
        .bind(update.name)
        .bind(update.kind)
        .bind(update.api_url)
        .bind(update.model)
        .bind(update.logo_url)
        .bind(languages)
        .bind(encrypted)
        .bind(Utc::now())
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        self.get_masked(user_id, id).await?.ok_or(StorageError::NotFound)
    }

    pub async fn delete(&self, user_id: &str, id: &str) -> Result<(), StorageError> {
        let result = sqlx::query("DELETE FROM ai_providers WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }

    /// Upsert keyed on (user_id, name), used by snapshot import.
    /// The credential is always the reconfiguration sentinel; whatever a
    /// (possibly hand-edited) snapshot carries is ignored.
    pub async fn upsert_imported(
        &self,
        user_id: &str,
        row: &ProviderImportRow,
    ) -> Result<(), StorageError> {
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO ai_providers
                 (id, user_id, name, kind, api_url, model, logo_url, languages_supported, api_key_encrypted, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(user_id, name) DO UPDATE SET
                 kind = excluded.kind,
                 api_url = excluded.api_url,
                 model = excluded.model,
                 logo_url = excluded.logo_url,
                 languages_supported = excluded.languages_supported,
                 api_key_encrypted = excluded.api_key_encrypted,
                 updated_at = excluded.updated_at",
        )
        .bind(generate_row_id())
        .bind(user_id)
        .bind(&row.name)
        .bind(&row.kind)
        .bind(&row.api_url)
        .bind(&row.model)
        .bind(&row.logo_url)
        .bind(serde_json::to_string(&row.languages_supported)?)
        .bind(CREDENTIAL_SENTINEL)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        Ok(())
    }

    fn row_to_masked(&self, row: &sqlx::sqlite::SqliteRow) -> Result<MaskedProvider, StorageError> {
        Ok(MaskedProvider {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            kind: row.try_get("kind")?,
            api_url: row.try_get("api_url")?,
            model: row.try_get("model")?,
            logo_url: row.try_get("logo_url")?,
            languages_supported: parse_languages(row.try_get("languages_supported")?),
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn row_to_provider(&self, row: &sqlx::sqlite::SqliteRow) -> Result<AiProvider, StorageError> {
        Ok(AiProvider {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            name: row.try_get("name")?,
            kind: row.try_get("kind")?,
            api_url: row.try_get("api_url")?,
            model: row.try_get("model")?,
            logo_url: row.try_get("logo_url")?,
            languages_supported: parse_languages(row.try_get("languages_supported")?),
            api_key_encrypted: row.try_get("api_key_encrypted")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

fn parse_languages(raw: String) -> Vec<String> {
    serde_json::from_str(&raw).unwrap_or_default()
}
