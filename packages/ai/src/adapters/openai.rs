// ABOUTME: OpenAI chat-completions adapter
// ABOUTME: Bearer-token auth, system+user messages, choices envelope

use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::non_empty;
use crate::service::{InstructionError, InstructionRequest};

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

pub async fn generate(
    client: &Client,
    api_url: &str,
    model: &str,
    api_key: &str,
    language_label: &str,
    request: &InstructionRequest,
) -> Result<Option<String>, InstructionError> {
    let body = ChatRequest {
        model: model.to_string(),
        messages: vec![
            Message {
                role: "system".to_string(),
                content: format!(
                    "You are a helpful DOM tutor. Generate a brief, clear instruction in {} for interacting with a web element. Keep it under 50 words.",
                    language_label
                ),
            },
            Message {
                role: "user".to_string(),
                content: format!(
                    "Element: {}\nHTML Context: {}\nLanguage: {}",
                    request.element_label, request.html_context, language_label
                ),
            },
        ],
        max_tokens: 100,
        temperature: 0.7,
    };

    let response = client
        .post(api_url)
        .header("Authorization", format!("Bearer {}", api_key))
        .header("Content-Type", "application/json")
        .json(&body)
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        return Err(InstructionError::ApiError { status, body });
    }

    let parsed: ChatResponse = response
        .json()
        .await
        .map_err(|e| InstructionError::ParseError(e.to_string()))?;

    Ok(non_empty(
        parsed.choices.into_iter().next().and_then(|c| c.message.content),
    ))
}
