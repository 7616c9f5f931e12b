// ABOUTME: HTTP request handler for instruction generation
// ABOUTME: Looks up provider and language, then dispatches to the vendor adapter

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::auth::CurrentUser;
use crate::db::AppState;
use crate::error::ApiError;
use tutor_ai::InstructionRequest;

#[derive(Deserialize)]
pub struct GenerateInstructionRequest {
    #[serde(rename = "elementLabel")]
    pub element_label: String,
    #[serde(rename = "htmlContext", default)]
    pub html_context: String,
    #[serde(rename = "languageCode")]
    pub language_code: String,
    #[serde(rename = "providerId")]
    pub provider_id: String,
}

#[derive(Serialize)]
pub struct GenerateInstructionResponse {
    pub instruction: String,
    pub language: String,
    pub provider: String,
    pub tts_voice_tag: String,
}

/// Generate a short instruction for a web element via the chosen provider.
///
/// Always answers 200 once the provider and language resolve: upstream
/// failures are absorbed into the templated fallback, and the envelope
/// does not say which one the caller got.
pub async fn generate_instruction(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(request): Json<GenerateInstructionRequest>,
) -> Result<Json<GenerateInstructionResponse>, ApiError> {
    info!(
        "Generating instruction for element {:?} (user {})",
        request.element_label, current_user.id
    );

    let provider = state
        .db
        .provider_storage
        .get(&current_user.id, &request.provider_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("AI provider not found".to_string()))?;

    let language = state
        .db
        .language_storage
        .get_by_code(&current_user.id, &request.language_code)
        .await?
        .ok_or_else(|| ApiError::NotFound("Language not found".to_string()))?;

    // An undecryptable credential degrades like any other upstream
    // failure instead of turning into a 500
    let api_key = state
        .db
        .provider_storage
        .credential(&provider)
        .unwrap_or_else(|e| {
            warn!(
                "Failed to decrypt credential for provider {}: {}",
                provider.name, e
            );
            String::new()
        });

    let instruction_request = InstructionRequest {
        element_label: request.element_label,
        html_context: request.html_context,
    };

    let instruction = state
        .instructions
        .generate(&provider, &api_key, &language, &instruction_request)
        .await;

    Ok(Json(GenerateInstructionResponse {
        instruction,
        language: language.code,
        provider: provider.name,
        tts_voice_tag: language.tts_voice_tag,
    }))
}
