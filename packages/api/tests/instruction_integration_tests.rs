// ABOUTME: Integration tests for generate-instruction
// ABOUTME: Mock vendors verify protocol shapes; failures verify the fallback

mod common;

use std::sync::atomic::Ordering;

use axum::http::StatusCode;
use common::{add_user, setup_test_server, spawn_vendor, TestContext};
use serde_json::{json, Value};

fn client() -> reqwest::Client {
    reqwest::Client::new()
}

async fn seed_language(ctx: &TestContext) {
    let response = client()
        .post(format!("{}/api/languages", ctx.base_url))
        .bearer_auth(&ctx.token)
        .json(&json!({
            "code": "es",
            "label": "Spanish",
            "tts_voice_tag": "es-ES-female",
            "is_default": true
        }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
}

async fn seed_provider(ctx: &TestContext, name: &str, kind: &str, api_url: &str) -> String {
    let response = client()
        .post(format!("{}/api/providers", ctx.base_url))
        .bearer_auth(&ctx.token)
        .json(&json!({
            "name": name,
            "kind": kind,
            "api_url": api_url,
            "model": "test-model",
            "api_key": "sk-vendor-key"
        }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let body: Value = response.json().await.unwrap();
    body["data"]["id"].as_str().unwrap().to_string()
}

async fn generate(ctx: &TestContext, token: &str, provider_id: &str) -> reqwest::Response {
    client()
        .post(format!("{}/api/generate-instruction", ctx.base_url))
        .bearer_auth(token)
        .json(&json!({
            "elementLabel": "Checkout",
            "htmlContext": "<button id=\"checkout\">Checkout</button>",
            "languageCode": "es",
            "providerId": provider_id
        }))
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn test_openai_vendor_success_is_normalized() {
    let ctx = setup_test_server().await;
    seed_language(&ctx).await;

    let vendor = spawn_vendor(
        StatusCode::OK,
        json!({
            "choices": [
                { "message": { "content": "Haz clic en el botón Checkout para continuar." } }
            ]
        }),
    )
    .await;

    let provider_id = seed_provider(
        &ctx,
        "OpenAI",
        "openai",
        &format!("{}/v1/chat/completions", vendor.url),
    )
    .await;

    let response = generate(&ctx, &ctx.token, &provider_id).await;
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body["instruction"],
        "Haz clic en el botón Checkout para continuar."
    );
    assert_eq!(body["language"], "es");
    assert_eq!(body["provider"], "OpenAI");
    assert_eq!(body["tts_voice_tag"], "es-ES-female");

    // Bearer-token convention, decrypted key
    let headers = vendor.last_headers.lock().unwrap().clone().unwrap();
    assert_eq!(
        headers.get("authorization").unwrap().to_str().unwrap(),
        "Bearer sk-vendor-key"
    );

    // The vendor saw the element and the language label
    let sent = vendor.last_body.lock().unwrap().clone().unwrap();
    let serialized = sent.to_string();
    assert!(serialized.contains("Checkout"));
    assert!(serialized.contains("Spanish"));
    assert_eq!(sent["model"], "test-model");
    assert_eq!(sent["max_tokens"], 100);
}

#[tokio::test]
async fn test_anthropic_vendor_uses_api_key_header() {
    let ctx = setup_test_server().await;
    seed_language(&ctx).await;

    let vendor = spawn_vendor(
        StatusCode::OK,
        json!({
            "content": [ { "type": "text", "text": "Pulsa el botón Checkout." } ]
        }),
    )
    .await;

    let provider_id = seed_provider(
        &ctx,
        "Anthropic",
        "anthropic",
        &format!("{}/v1/messages", vendor.url),
    )
    .await;

    let response = generate(&ctx, &ctx.token, &provider_id).await;
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["instruction"], "Pulsa el botón Checkout.");

    let headers = vendor.last_headers.lock().unwrap().clone().unwrap();
    assert_eq!(
        headers.get("x-api-key").unwrap().to_str().unwrap(),
        "sk-vendor-key"
    );
    assert_eq!(
        headers.get("anthropic-version").unwrap().to_str().unwrap(),
        "2023-06-01"
    );
    assert!(headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_gemini_vendor_uses_goog_api_key_header() {
    let ctx = setup_test_server().await;
    seed_language(&ctx).await;

    let vendor = spawn_vendor(
        StatusCode::OK,
        json!({
            "candidates": [
                { "content": { "parts": [ { "text": "Haz clic en Checkout." } ] } }
            ]
        }),
    )
    .await;

    let provider_id = seed_provider(
        &ctx,
        "Gemini",
        "gemini",
        &format!("{}/v1beta/models/gemini-pro:generateContent", vendor.url),
    )
    .await;

    let response = generate(&ctx, &ctx.token, &provider_id).await;
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["instruction"], "Haz clic en Checkout.");

    let headers = vendor.last_headers.lock().unwrap().clone().unwrap();
    assert_eq!(
        headers.get("x-goog-api-key").unwrap().to_str().unwrap(),
        "sk-vendor-key"
    );
}

#[tokio::test]
async fn test_vendor_error_status_degrades_to_fallback() {
    let ctx = setup_test_server().await;
    seed_language(&ctx).await;

    let vendor = spawn_vendor(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "error": "upstream exploded" }),
    )
    .await;

    let provider_id = seed_provider(
        &ctx,
        "OpenAI",
        "openai",
        &format!("{}/v1/chat/completions", vendor.url),
    )
    .await;

    let response = generate(&ctx, &ctx.token, &provider_id).await;
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["instruction"], "Click on the \"Checkout\" to proceed.");
    // Envelope still carries the real language and provider
    assert_eq!(body["provider"], "OpenAI");
    assert_eq!(body["tts_voice_tag"], "es-ES-female");
    assert_eq!(vendor.hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_unreachable_vendor_degrades_to_fallback() {
    let ctx = setup_test_server().await;
    seed_language(&ctx).await;

    // A port nothing listens on
    let provider_id = seed_provider(
        &ctx,
        "OpenAI",
        "openai",
        "http://127.0.0.1:9/v1/chat/completions",
    )
    .await;

    let response = generate(&ctx, &ctx.token, &provider_id).await;
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["instruction"], "Click on the \"Checkout\" to proceed.");
}

#[tokio::test]
async fn test_unknown_kind_falls_back_without_calling_out() {
    let ctx = setup_test_server().await;
    seed_language(&ctx).await;

    let vendor = spawn_vendor(StatusCode::OK, json!({})).await;
    let provider_id = seed_provider(&ctx, "HomegrownLLM", "homegrown", &vendor.url).await;

    let response = generate(&ctx, &ctx.token, &provider_id).await;
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["instruction"], "Click on the \"Checkout\" to proceed.");
    assert_eq!(vendor.hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_empty_vendor_content_uses_generic_fallback() {
    let ctx = setup_test_server().await;
    seed_language(&ctx).await;

    let vendor = spawn_vendor(
        StatusCode::OK,
        json!({ "choices": [ { "message": { "content": "" } } ] }),
    )
    .await;

    let provider_id = seed_provider(
        &ctx,
        "OpenAI",
        "openai",
        &format!("{}/v1/chat/completions", vendor.url),
    )
    .await;

    let response = generate(&ctx, &ctx.token, &provider_id).await;
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["instruction"], "Click on this element to proceed.");
}

#[tokio::test]
async fn test_missing_provider_is_not_found() {
    let ctx = setup_test_server().await;
    seed_language(&ctx).await;

    let response = generate(&ctx, &ctx.token, "no-such-provider").await;
    assert_eq!(response.status(), 404);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "error": "AI provider not found" }));
}

#[tokio::test]
async fn test_missing_language_is_not_found() {
    let ctx = setup_test_server().await;

    let vendor = spawn_vendor(StatusCode::OK, json!({})).await;
    let provider_id = seed_provider(&ctx, "OpenAI", "openai", &vendor.url).await;

    let response = generate(&ctx, &ctx.token, &provider_id).await;
    assert_eq!(response.status(), 404);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Language not found" }));
}

#[tokio::test]
async fn test_other_users_provider_is_not_found() {
    let ctx = setup_test_server().await;
    seed_language(&ctx).await;

    let vendor = spawn_vendor(StatusCode::OK, json!({})).await;
    let provider_id = seed_provider(&ctx, "OpenAI", "openai", &vendor.url).await;

    let (_other_id, other_token) = add_user(&ctx, "intruder@example.com").await;

    let response = generate(&ctx, &other_token, &provider_id).await;
    assert_eq!(response.status(), 404);

    // Nothing about the provider leaks, and no vendor call happened
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "error": "AI provider not found" }));
    assert_eq!(vendor.hits.load(Ordering::SeqCst), 0);
}
