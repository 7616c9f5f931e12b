// ABOUTME: Snapshot export
// ABOUTME: Assembles a user's configuration into a masked portable snapshot

use chrono::Utc;

use crate::types::{ConfigSnapshot, SnapshotSettings, SNAPSHOT_VERSION};
use tutor_languages::LanguageStorage;
use tutor_providers::ProviderStorage;
use tutor_settings::SettingsStorage;
use tutor_storage::StorageError;

/// Build a snapshot of everything the user owns.
///
/// Providers are fetched through the masked projection, so the stored
/// credential is never read, let alone serialized. A missing settings row
/// exports as the empty settings shape.
pub async fn export_snapshot(
    languages: &LanguageStorage,
    providers: &ProviderStorage,
    settings: &SettingsStorage,
    user_id: &str,
) -> Result<ConfigSnapshot, StorageError> {
    let languages = languages.list(user_id).await?;
    let ai_providers = providers.list_masked(user_id).await?;
    let settings = settings
        .get(user_id)
        .await?
        .map(SnapshotSettings::from)
        .unwrap_or_default();

    Ok(ConfigSnapshot {
        version: SNAPSHOT_VERSION.to_string(),
        exported_at: Utc::now(),
        user_id: user_id.to_string(),
        languages,
        ai_providers,
        settings,
    })
}
