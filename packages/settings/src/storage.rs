// ABOUTME: Storage operations for user settings
// ABOUTME: Effective-configuration resolution with earliest-created fallback

use chrono::Utc;
use serde_json::Value;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::types::{LanguageRef, ProviderRef, PublicConfig, SettingsInput, UserSettings};
use tutor_storage::StorageError;

pub struct SettingsStorage {
    pool: SqlitePool,
}

impl SettingsStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, user_id: &str) -> Result<Option<UserSettings>, StorageError> {
        let row = sqlx::query("SELECT * FROM user_settings WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        row.map(|row| row_to_settings(&row)).transpose()
    }

    /// Compute the user's effective configuration.
    ///
    /// When a settings row exists its joined references are returned
    /// as-is; a dangling id resolves to None with no further fallback.
    /// Only a missing row falls back to the earliest-created language and
    /// provider, each independently.
    pub async fn resolve(&self, user_id: &str) -> Result<PublicConfig, StorageError> {
        debug!("Resolving effective configuration for user {}", user_id);

        let row = sqlx::query(
            "SELECT s.settings_json,
                    l.code AS language_code, l.label AS language_label,
                    p.id AS provider_id, p.name AS provider_name, p.model AS provider_model
             FROM user_settings s
             LEFT JOIN languages l
                 ON l.id = s.default_language_id AND l.user_id = s.user_id
             LEFT JOIN ai_providers p
                 ON p.id = s.active_provider_id AND p.user_id = s.user_id
             WHERE s.user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        if let Some(row) = row {
            let default_language = row
                .try_get::<Option<String>, _>("language_code")?
                .map(|code| -> Result<LanguageRef, StorageError> {
                    Ok(LanguageRef {
                        code,
                        label: row
                            .try_get::<Option<String>, _>("language_label")?
                            .unwrap_or_default(),
                    })
                })
                .transpose()?;

            let active_provider = row
                .try_get::<Option<String>, _>("provider_id")?
                .map(|id| -> Result<ProviderRef, StorageError> {
                    Ok(ProviderRef {
                        id,
                        name: row
                            .try_get::<Option<String>, _>("provider_name")?
                            .unwrap_or_default(),
                        model: row
                            .try_get::<Option<String>, _>("provider_model")?
                            .unwrap_or_default(),
                    })
                })
                .transpose()?;

            return Ok(PublicConfig {
                default_language,
                active_provider,
                settings: parse_json(row.try_get("settings_json")?),
            });
        }

        // No settings row: fall back to the earliest-created rows,
        // independently of each other.
        let default_language = sqlx::query(
            "SELECT code, label FROM languages WHERE user_id = ? ORDER BY created_at, rowid LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?
        .map(|row| -> Result<LanguageRef, StorageError> {
            Ok(LanguageRef {
                code: row.try_get("code")?,
                label: row.try_get("label")?,
            })
        })
        .transpose()?;

        let active_provider = sqlx::query(
            "SELECT id, name, model FROM ai_providers WHERE user_id = ? ORDER BY created_at, rowid LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?
        .map(|row| -> Result<ProviderRef, StorageError> {
            Ok(ProviderRef {
                id: row.try_get("id")?,
                name: row.try_get("name")?,
                model: row.try_get("model")?,
            })
        })
        .transpose()?;

        Ok(PublicConfig {
            default_language,
            active_provider,
            settings: Value::Object(serde_json::Map::new()),
        })
    }

    /// Upsert the single settings row for a user.
    pub async fn upsert(
        &self,
        user_id: &str,
        input: SettingsInput,
    ) -> Result<UserSettings, StorageError> {
        let now = Utc::now();
        let settings_json = input
            .settings_json
            .unwrap_or_else(|| Value::Object(serde_json::Map::new()));

        sqlx::query(
            "INSERT INTO user_settings
                 (user_id, default_language_id, active_provider_id, settings_json, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)
             ON CONFLICT(user_id) DO UPDATE SET
                 default_language_id = excluded.default_language_id,
                 active_provider_id = excluded.active_provider_id,
                 settings_json = excluded.settings_json,
                 updated_at = excluded.updated_at",
        )
        .bind(user_id)
        .bind(&input.default_language_id)
        .bind(&input.active_provider_id)
        .bind(serde_json::to_string(&settings_json)?)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        self.get(user_id).await?.ok_or(StorageError::NotFound)
    }
}

fn row_to_settings(row: &sqlx::sqlite::SqliteRow) -> Result<UserSettings, StorageError> {
    Ok(UserSettings {
        user_id: row.try_get("user_id")?,
        default_language_id: row.try_get("default_language_id")?,
        active_provider_id: row.try_get("active_provider_id")?,
        settings_json: parse_json(row.try_get("settings_json")?),
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn parse_json(raw: String) -> Value {
    serde_json::from_str(&raw).unwrap_or_else(|_| Value::Object(serde_json::Map::new()))
}
