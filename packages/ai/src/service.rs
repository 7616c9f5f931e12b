// ABOUTME: Instruction generation service
// ABOUTME: Dispatches on provider kind and absorbs upstream failures into a fallback

use reqwest::Client;
use thiserror::Error;
use tracing::{info, warn};

use crate::adapters;
use tutor_languages::Language;
use tutor_providers::{AiProvider, ProviderKind};

/// Vendor calls that hang are cut off here; the caller then gets the
/// templated fallback like any other upstream failure.
const VENDOR_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum InstructionError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("API returned {status}: {body}")]
    ApiError { status: u16, body: String },

    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

/// What the caller wants an instruction for.
#[derive(Debug, Clone)]
pub struct InstructionRequest {
    pub element_label: String,
    pub html_context: String,
}

/// Stateless instruction generator holding the one shared HTTP client.
/// Constructed once at startup and passed in through application state.
pub struct InstructionService {
    client: Client,
}

impl InstructionService {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(VENDOR_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client }
    }

    /// Generate an instruction for interacting with a web element, in the
    /// given language, via the given provider.
    ///
    /// This never fails from the caller's perspective: an unknown provider
    /// kind skips the network entirely, and any upstream failure degrades
    /// to the deterministic template. A well-formed vendor reply that
    /// carries no text degrades to the generic template instead.
    pub async fn generate(
        &self,
        provider: &AiProvider,
        api_key: &str,
        language: &Language,
        request: &InstructionRequest,
    ) -> String {
        let Some(kind) = ProviderKind::parse(&provider.kind) else {
            info!(
                "Provider {} has unrecognized kind {:?}; using fallback instruction",
                provider.name, provider.kind
            );
            return fallback_instruction(&request.element_label);
        };

        let result = match kind {
            ProviderKind::OpenAi => {
                adapters::openai::generate(
                    &self.client,
                    &provider.api_url,
                    &provider.model,
                    api_key,
                    &language.label,
                    request,
                )
                .await
            }
            ProviderKind::Anthropic => {
                adapters::anthropic::generate(
                    &self.client,
                    &provider.api_url,
                    &provider.model,
                    api_key,
                    &language.label,
                    request,
                )
                .await
            }
            ProviderKind::Gemini => {
                adapters::gemini::generate(
                    &self.client,
                    &provider.api_url,
                    api_key,
                    &language.label,
                    request,
                )
                .await
            }
        };

        match result {
            Ok(Some(text)) => text,
            Ok(None) => "Click on this element to proceed.".to_string(),
            Err(e) => {
                warn!("Vendor call to {} failed: {}", provider.name, e);
                fallback_instruction(&request.element_label)
            }
        }
    }
}

impl Default for InstructionService {
    fn default() -> Self {
        Self::new()
    }
}

/// The deterministic instruction used whenever a real one cannot be had.
pub fn fallback_instruction(element_label: &str) -> String {
    format!("Click on the \"{}\" to proceed.", element_label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_substitutes_label_verbatim() {
        assert_eq!(
            fallback_instruction("Submit Order"),
            "Click on the \"Submit Order\" to proceed."
        );
        assert_eq!(
            fallback_instruction(""),
            "Click on the \"\" to proceed."
        );
    }

    #[tokio::test]
    async fn test_unknown_kind_falls_back_without_network() {
        use chrono::Utc;

        let service = InstructionService::new();
        let provider = AiProvider {
            id: "p1".to_string(),
            user_id: "u1".to_string(),
            name: "Mystery".to_string(),
            kind: "mystery-llm".to_string(),
            // An unroutable endpoint: if dispatch tried the network this
            // test would hang out to the timeout instead of returning fast
            api_url: "http://192.0.2.1/v1".to_string(),
            model: "m".to_string(),
            logo_url: None,
            languages_supported: vec![],
            api_key_encrypted: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let language = Language {
            id: "l1".to_string(),
            user_id: "u1".to_string(),
            code: "en".to_string(),
            label: "English".to_string(),
            tts_voice_tag: "en-US-female".to_string(),
            is_default: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let request = InstructionRequest {
            element_label: "Checkout".to_string(),
            html_context: "<button>Checkout</button>".to_string(),
        };

        let started = std::time::Instant::now();
        let instruction = service.generate(&provider, "", &language, &request).await;

        assert_eq!(instruction, "Click on the \"Checkout\" to proceed.");
        assert!(started.elapsed() < std::time::Duration::from_secs(5));
    }
}
