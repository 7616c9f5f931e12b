// ABOUTME: Snapshot import
// ABOUTME: Validates the envelope, then merges rows with per-row failure tolerance

use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use crate::types::{ImportCounts, SnapshotSettings};
use tutor_languages::{LanguageInput, LanguageStorage};
use tutor_providers::{ProviderImportRow, ProviderStorage};
use tutor_settings::{SettingsInput, SettingsStorage};
use tutor_storage::StorageError;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Invalid configuration format")]
    InvalidFormat,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Merge a candidate snapshot into the user's configuration.
///
/// The only fatal validation is structural: `languages` and
/// `ai_providers` must be present as arrays. After that, each row is
/// merged on its own; one bad row is logged and skipped so the rest of a
/// large snapshot still lands. Reported counts are the attempted array
/// lengths.
pub async fn import_snapshot(
    languages: &LanguageStorage,
    providers: &ProviderStorage,
    settings: &SettingsStorage,
    user_id: &str,
    snapshot: &Value,
) -> Result<ImportCounts, ImportError> {
    let language_rows = snapshot
        .get("languages")
        .and_then(Value::as_array)
        .ok_or(ImportError::InvalidFormat)?;
    let provider_rows = snapshot
        .get("ai_providers")
        .and_then(Value::as_array)
        .ok_or(ImportError::InvalidFormat)?;

    for row in language_rows {
        let input: LanguageInput = match serde_json::from_value(row.clone()) {
            Ok(input) => input,
            Err(e) => {
                warn!("Skipping malformed language row: {}", e);
                continue;
            }
        };

        if let Err(e) = languages.upsert(user_id, &input).await {
            warn!("Error importing language {}: {}", input.code, e);
        }
    }

    for row in provider_rows {
        let input: ProviderImportRow = match serde_json::from_value(row.clone()) {
            Ok(input) => input,
            Err(e) => {
                warn!("Skipping malformed provider row: {}", e);
                continue;
            }
        };

        // upsert_imported pins the credential to the reconfiguration
        // sentinel; a snapshot edited to carry a key cannot smuggle it in.
        if let Err(e) = providers.upsert_imported(user_id, &input).await {
            warn!("Error importing AI provider {}: {}", input.name, e);
        }
    }

    if let Some(settings_value) = snapshot.get("settings").filter(|v| !v.is_null()) {
        let parsed: SnapshotSettings =
            serde_json::from_value(settings_value.clone()).unwrap_or_default();

        let settings_json = match parsed.settings_json {
            Value::Null => Value::Object(serde_json::Map::new()),
            other => other,
        };
        let input = SettingsInput {
            default_language_id: parsed.default_language_id,
            active_provider_id: parsed.active_provider_id,
            settings_json: Some(settings_json),
        };

        if let Err(e) = settings.upsert(user_id, input).await {
            warn!("Error importing settings: {}", e);
        }
    }

    Ok(ImportCounts {
        languages: language_rows.len(),
        ai_providers: provider_rows.len(),
    })
}
