// ABOUTME: User settings type definitions
// ABOUTME: Stored row, resolver projections, and the public-config envelope

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The per-user settings row. `default_language_id` and
/// `active_provider_id` are weak references: the pointed-at row may have
/// been deleted, and resolution treats that as "nothing selected".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSettings {
    pub user_id: String,
    pub default_language_id: Option<String>,
    pub active_provider_id: Option<String>,
    pub settings_json: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsInput {
    pub default_language_id: Option<String>,
    pub active_provider_id: Option<String>,
    pub settings_json: Option<Value>,
}

/// Language projection used by the resolver
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LanguageRef {
    pub code: String,
    pub label: String,
}

/// Provider projection used by the resolver
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProviderRef {
    pub id: String,
    pub name: String,
    pub model: String,
}

/// The effective configuration handed to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicConfig {
    #[serde(rename = "defaultLanguage")]
    pub default_language: Option<LanguageRef>,
    #[serde(rename = "activeProvider")]
    pub active_provider: Option<ProviderRef>,
    pub settings: Value,
}
