// ABOUTME: Snapshot type definitions
// ABOUTME: The portable unit exchanged between export and import

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use tutor_languages::Language;
use tutor_providers::MaskedProvider;
use tutor_settings::UserSettings;

pub const SNAPSHOT_VERSION: &str = "1.0";

/// A user's full configuration, minus credentials. Providers enter the
/// snapshot as [`MaskedProvider`], so a credential cannot appear here by
/// construction.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigSnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub user_id: String,
    pub languages: Vec<Language>,
    pub ai_providers: Vec<MaskedProvider>,
    pub settings: SnapshotSettings,
}

/// Settings as carried in a snapshot. When the exporting user never
/// saved a settings row this is the empty shape, not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotSettings {
    pub default_language_id: Option<String>,
    pub active_provider_id: Option<String>,
    #[serde(default = "empty_object")]
    pub settings_json: Value,
}

fn empty_object() -> Value {
    Value::Object(serde_json::Map::new())
}

impl Default for SnapshotSettings {
    fn default() -> Self {
        Self {
            default_language_id: None,
            active_provider_id: None,
            settings_json: Value::Object(serde_json::Map::new()),
        }
    }
}

impl From<UserSettings> for SnapshotSettings {
    fn from(settings: UserSettings) -> Self {
        Self {
            default_language_id: settings.default_language_id,
            active_provider_id: settings.active_provider_id,
            settings_json: settings.settings_json,
        }
    }
}

/// How many rows an import attempted, reported back to the caller.
/// These are the snapshot array lengths: a bad row is logged and skipped
/// but still counted as attempted.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ImportCounts {
    pub languages: usize,
    pub ai_providers: usize,
}
