// ABOUTME: Google Gemini generateContent adapter
// ABOUTME: x-goog-api-key auth, contents/parts envelope

use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::non_empty;
use crate::service::{InstructionError, InstructionRequest};

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

pub async fn generate(
    client: &Client,
    api_url: &str,
    api_key: &str,
    language_label: &str,
    request: &InstructionRequest,
) -> Result<Option<String>, InstructionError> {
    // The model name is part of the stored endpoint for Gemini
    // (.../models/<model>:generateContent), so it is not sent in the body.
    let body = GenerateContentRequest {
        contents: vec![Content {
            parts: vec![Part {
                text: Some(format!(
                    "Generate a brief, clear instruction in {} for interacting with this web element: {}. HTML Context: {}. Keep it under 50 words.",
                    language_label, request.element_label, request.html_context
                )),
            }],
        }],
        generation_config: GenerationConfig {
            max_output_tokens: 100,
            temperature: 0.7,
        },
    };

    let response = client
        .post(api_url)
        .header("x-goog-api-key", api_key)
        .header("Content-Type", "application/json")
        .json(&body)
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        return Err(InstructionError::ApiError { status, body });
    }

    let parsed: GenerateContentResponse = response
        .json()
        .await
        .map_err(|e| InstructionError::ParseError(e.to_string()))?;

    let text = parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .and_then(|c| c.parts.into_iter().next())
        .and_then(|p| p.text);

    Ok(non_empty(text))
}
