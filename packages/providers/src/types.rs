// ABOUTME: AI provider type definitions
// ABOUTME: Full rows stay inside the storage layer; only masked rows serialize

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Credential value written on import: snapshots never carry a real key,
/// so restored providers demand re-entry before they can reach a vendor.
pub const CREDENTIAL_SENTINEL: &str = "NEEDS_RECONFIGURATION";

/// Which vendor protocol a provider speaks. Stored as a plain column and
/// parsed here; selecting the adapter from this field keeps dispatch
/// independent of how the user chose to name the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    OpenAi,
    Anthropic,
    Gemini,
}

impl ProviderKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "openai" => Some(ProviderKind::OpenAi),
            "anthropic" => Some(ProviderKind::Anthropic),
            "gemini" => Some(ProviderKind::Gemini),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::Gemini => "gemini",
        }
    }
}

/// A full provider row, including the stored credential.
///
/// Deliberately does NOT implement `Serialize`: nothing that leaves the
/// process can carry `api_key_encrypted`. Read paths that feed responses
/// or snapshots go through [`MaskedProvider`] instead.
#[derive(Debug, Clone)]
pub struct AiProvider {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub kind: String,
    pub api_url: String,
    pub model: String,
    pub logo_url: Option<String>,
    pub languages_supported: Vec<String>,
    pub api_key_encrypted: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The provider projection safe to hand to callers and snapshots.
/// There is no credential field to scrub because the type never has one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaskedProvider {
    pub id: String,
    pub name: String,
    pub kind: String,
    pub api_url: String,
    pub model: String,
    pub logo_url: Option<String>,
    pub languages_supported: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderInput {
    pub name: String,
    pub kind: String,
    pub api_url: String,
    pub model: String,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub languages_supported: Vec<String>,
    pub api_key: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderUpdate {
    pub name: Option<String>,
    pub kind: Option<String>,
    pub api_url: Option<String>,
    pub model: Option<String>,
    pub logo_url: Option<String>,
    pub languages_supported: Option<Vec<String>>,
    pub api_key: Option<String>,
}

/// Fields taken from a snapshot row during import. The credential is
/// absent on purpose; the importer always writes the sentinel.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderImportRow {
    pub name: String,
    #[serde(default)]
    pub kind: String,
    pub api_url: String,
    pub model: String,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub languages_supported: Vec<String>,
}
