// ABOUTME: Anthropic messages adapter
// ABOUTME: x-api-key auth with anthropic-version header, content-block envelope

use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::non_empty;
use crate::service::{InstructionError, InstructionRequest};

const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    text: Option<String>,
}

pub async fn generate(
    client: &Client,
    api_url: &str,
    model: &str,
    api_key: &str,
    language_label: &str,
    request: &InstructionRequest,
) -> Result<Option<String>, InstructionError> {
    let body = MessagesRequest {
        model: model.to_string(),
        max_tokens: 100,
        messages: vec![Message {
            role: "user".to_string(),
            content: format!(
                "Generate a brief, clear instruction in {} for interacting with this web element: {}. HTML Context: {}. Keep it under 50 words.",
                language_label, request.element_label, request.html_context
            ),
        }],
    };

    let response = client
        .post(api_url)
        .header("x-api-key", api_key)
        .header("anthropic-version", ANTHROPIC_VERSION)
        .header("Content-Type", "application/json")
        .json(&body)
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        return Err(InstructionError::ApiError { status, body });
    }

    let parsed: MessagesResponse = response
        .json()
        .await
        .map_err(|e| InstructionError::ParseError(e.to_string()))?;

    Ok(non_empty(
        parsed.content.into_iter().next().and_then(|block| block.text),
    ))
}
