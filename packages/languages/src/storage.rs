// ABOUTME: Storage operations for languages
// ABOUTME: Creation-ordered listings, (user, code) upserts, transactional default flip

use chrono::Utc;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::types::{Language, LanguageInput, LanguageUpdate};
use tutor_core::generate_row_id;
use tutor_storage::StorageError;

pub struct LanguageStorage {
    pool: SqlitePool,
}

impl LanguageStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// All of a user's languages in creation order.
    /// rowid breaks ties between rows created in the same second.
    pub async fn list(&self, user_id: &str) -> Result<Vec<Language>, StorageError> {
        let rows = sqlx::query(
            "SELECT * FROM languages WHERE user_id = ? ORDER BY created_at, rowid",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        rows.iter().map(|row| self.row_to_language(row)).collect()
    }

    pub async fn get(&self, user_id: &str, id: &str) -> Result<Option<Language>, StorageError> {
        let row = sqlx::query("SELECT * FROM languages WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        row.map(|row| self.row_to_language(&row)).transpose()
    }

    pub async fn get_by_code(
        &self,
        user_id: &str,
        code: &str,
    ) -> Result<Option<Language>, StorageError> {
        let row = sqlx::query("SELECT * FROM languages WHERE user_id = ? AND code = ?")
            .bind(user_id)
            .bind(code)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        row.map(|row| self.row_to_language(&row)).transpose()
    }

    pub async fn create(
        &self,
        user_id: &str,
        input: LanguageInput,
    ) -> Result<Language, StorageError> {
        debug!("Creating language {} for user {}", input.code, user_id);

        let id = generate_row_id();
        let now = Utc::now();

        // Default flip and insert share one transaction; at most one row
        // per user may hold is_default at any point.
        let mut tx = self.pool.begin().await.map_err(StorageError::Sqlx)?;

        if input.is_default {
            sqlx::query("UPDATE languages SET is_default = 0 WHERE user_id = ? AND is_default = 1")
                .bind(user_id)
                .execute(&mut *tx)
                .await
                .map_err(StorageError::Sqlx)?;
        }

        sqlx::query(
            "INSERT INTO languages (id, user_id, code, label, tts_voice_tag, is_default, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(user_id)
        .bind(&input.code)
        .bind(&input.label)
        .bind(&input.tts_voice_tag)
        .bind(input.is_default)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(StorageError::Sqlx)?;

        tx.commit().await.map_err(StorageError::Sqlx)?;

        self.get(user_id, &id).await?.ok_or(StorageError::NotFound)
    }

    pub async fn update(
        &self,
        user_id: &str,
        id: &str,
        update: LanguageUpdate,
    ) -> Result<Language, StorageError> {
        debug!("Updating language {} for user {}", id, user_id);

        let mut tx = self.pool.begin().await.map_err(StorageError::Sqlx)?;

        if update.is_default == Some(true) {
            sqlx::query(
                "UPDATE languages SET is_default = 0 WHERE user_id = ? AND is_default = 1 AND id != ?",
            )
            .bind(user_id)
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(StorageError::Sqlx)?;
        }

        let result = sqlx::query(
            "UPDATE languages
             SET code = COALESCE(?, code),
                 label = COALESCE(?, label),
                 tts_voice_tag = COALESCE(?, tts_voice_tag),
                 is_default = COALESCE(?, is_default),
                 updated_at = ?
             WHERE id = ? AND user_id = ?",
        )
        .bind(update.code)
        .bind(update.label)
        .bind(update.tts_voice_tag)
        .bind(update.is_default)
        .bind(Utc::now())
        .bind(id)
        .bind(user_id)
        .execute(&mut *tx)
        .await
        .map_err(StorageError::Sqlx)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        tx.commit().await.map_err(StorageError::Sqlx)?;

        self.get(user_id, id).await?.ok_or(StorageError::NotFound)
    }

    pub async fn delete(&self, user_id: &str, id: &str) -> Result<(), StorageError> {
        let result = sqlx::query("DELETE FROM languages WHERE id = ? AND user_id = ?")
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

    /// Upsert keyed on (user_id, code). Re-running with the same input is
    /// a no-op row-count-wise; field values from the caller win.
    pub async fn upsert(&self, user_id: &str, input: &LanguageInput) -> Result<(), StorageError> {
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO languages (id, user_id, code, label, tts_voice_tag, is_default, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(user_id, code) DO UPDATE SET
                 label = excluded.label,
                 tts_voice_tag = excluded.tts_voice_tag,
                 is_default = excluded.is_default,
                 updated_at = excluded.updated_at",
        )
        .bind(generate_row_id())
        .bind(user_id)
        .bind(&input.code)
        .bind(&input.label)
        .bind(&input.tts_voice_tag)
        .bind(input.is_default)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        Ok(())
    }

    fn row_to_language(&self, row: &sqlx::sqlite::SqliteRow) -> Result<Language, StorageError> {
        Ok(Language {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            code: row.try_get("code")?,
            label: row.try_get("label")?,
            tts_voice_tag: row.try_get("tts_voice_tag")?,
            is_default: row.try_get::<i64, _>("is_default")? != 0,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}
