// ABOUTME: Language type definitions
// ABOUTME: Stored rows plus create/update inputs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A language a user has configured, with the voice tag their
/// text-to-speech frontend should use for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Language {
    pub id: String,
    pub user_id: String,
    pub code: String,
    pub label: String,
    pub tts_voice_tag: String,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LanguageInput {
    pub code: String,
    pub label: String,
    pub tts_voice_tag: String,
    #[serde(default)]
    pub is_default: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LanguageUpdate {
    pub code: Option<String>,
    pub label: Option<String>,
    pub tts_voice_tag: Option<String>,
    pub is_default: Option<bool>,
}
