// ABOUTME: Integration tests for public-config, export-config, import-config
// ABOUTME: Drives the four handlers over real HTTP with bearer auth

mod common;

use common::{add_user, setup_test_server};
use serde_json::{json, Value};

fn client() -> reqwest::Client {
    reqwest::Client::new()
}

async fn create_language(ctx: &common::TestContext, token: &str, code: &str, label: &str) {
    let response = client()
        .post(format!("{}/api/languages", ctx.base_url))
        .bearer_auth(token)
        .json(&json!({
            "code": code,
            "label": label,
            "tts_voice_tag": format!("{}-voice", code),
            "is_default": code == "en"
        }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
}

async fn create_provider(ctx: &common::TestContext, token: &str, name: &str, api_key: &str) {
    let response = client()
        .post(format!("{}/api/providers", ctx.base_url))
        .bearer_auth(token)
        .json(&json!({
            "name": name,
            "kind": "openai",
            "api_url": "https://api.openai.com/v1/chat/completions",
            "model": "gpt-4",
            "languages_supported": ["en", "es"],
            "api_key": api_key
        }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
}

#[tokio::test]
async fn test_requests_without_token_are_unauthorized() {
    let ctx = setup_test_server().await;

    for path in ["/api/public-config", "/api/export-config"] {
        let response = client()
            .get(format!("{}{}", ctx.base_url, path))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 401);

        let body: Value = response.json().await.unwrap();
        assert_eq!(body, json!({ "error": "Unauthorized" }));
    }
}

#[tokio::test]
async fn test_garbage_token_is_unauthorized() {
    let ctx = setup_test_server().await;

    let response = client()
        .get(format!("{}/api/public-config", ctx.base_url))
        .bearer_auth("definitely-not-a-token")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn test_public_config_falls_back_to_earliest_created() {
    let ctx = setup_test_server().await;

    create_language(&ctx, &ctx.token, "en", "English").await;
    create_language(&ctx, &ctx.token, "es", "Spanish").await;
    create_provider(&ctx, &ctx.token, "OpenAI", "sk-one").await;

    let response = client()
        .get(format!("{}/api/public-config", ctx.base_url))
        .bearer_auth(&ctx.token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["defaultLanguage"]["code"], "en");
    assert_eq!(body["activeProvider"]["name"], "OpenAI");
    assert_eq!(body["settings"], json!({}));
}

#[tokio::test]
async fn test_public_config_with_empty_store() {
    let ctx = setup_test_server().await;

    let response = client()
        .get(format!("{}/api/public-config", ctx.base_url))
        .bearer_auth(&ctx.token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["defaultLanguage"], Value::Null);
    assert_eq!(body["activeProvider"], Value::Null);
}

#[tokio::test]
async fn test_public_config_prefers_saved_settings_row() {
    let ctx = setup_test_server().await;

    create_language(&ctx, &ctx.token, "en", "English").await;
    create_language(&ctx, &ctx.token, "es", "Spanish").await;

    // Point the settings row at Spanish explicitly
    let languages: Value = client()
        .get(format!("{}/api/languages", ctx.base_url))
        .bearer_auth(&ctx.token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let es_id = languages["languages"][1]["id"].as_str().unwrap().to_string();

    let response = client()
        .put(format!("{}/api/settings", ctx.base_url))
        .bearer_auth(&ctx.token)
        .json(&json!({ "default_language_id": es_id }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: Value = client()
        .get(format!("{}/api/public-config", ctx.base_url))
        .bearer_auth(&ctx.token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["defaultLanguage"]["code"], "es");
    // No provider was ever selected and the row exists: no fallback
    assert_eq!(body["activeProvider"], Value::Null);
}

#[tokio::test]
async fn test_export_is_scrubbed_and_downloadable() {
    let ctx = setup_test_server().await;

    create_language(&ctx, &ctx.token, "en", "English").await;
    create_provider(&ctx, &ctx.token, "OpenAI", "sk-live-super-secret").await;

    let response = client()
        .get(format!("{}/api/export-config", ctx.base_url))
        .bearer_auth(&ctx.token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let disposition = response
        .headers()
        .get("content-disposition")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(disposition.contains("ai-dom-tutor-config.json"));

    let text = response.text().await.unwrap();
    assert!(!text.contains("sk-live-super-secret"));
    assert!(!text.contains("api_key"));

    let snapshot: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(snapshot["version"], "1.0");
    assert_eq!(snapshot["languages"].as_array().unwrap().len(), 1);
    assert_eq!(snapshot["ai_providers"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_import_round_trip_into_fresh_user() {
    let ctx = setup_test_server().await;

    create_language(&ctx, &ctx.token, "en", "English").await;
    create_language(&ctx, &ctx.token, "es", "Spanish").await;
    create_provider(&ctx, &ctx.token, "OpenAI", "sk-original").await;

    let snapshot: Value = client()
        .get(format!("{}/api/export-config", ctx.base_url))
        .bearer_auth(&ctx.token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let (fresh_user_id, fresh_token) = add_user(&ctx, "fresh@example.com").await;

    let response = client()
        .post(format!("{}/api/import-config", ctx.base_url))
        .bearer_auth(&fresh_token)
        .json(&snapshot)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let report: Value = response.json().await.unwrap();
    assert_eq!(report["success"], true);
    assert_eq!(report["imported"]["languages"], 2);
    assert_eq!(report["imported"]["ai_providers"], 1);

    // The fresh user now owns equivalent rows, with a sentinel credential
    let languages = ctx.db.language_storage.list(&fresh_user_id).await.unwrap();
    assert_eq!(languages.len(), 2);

    let providers = ctx
        .db
        .provider_storage
        .list_masked(&fresh_user_id)
        .await
        .unwrap();
    assert_eq!(providers.len(), 1);
    let full = ctx
        .db
        .provider_storage
        .get(&fresh_user_id, &providers[0].id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(full.api_key_encrypted, "NEEDS_RECONFIGURATION");
}

#[tokio::test]
async fn test_import_twice_is_idempotent() {
    let ctx = setup_test_server().await;

    let snapshot = json!({
        "languages": [
            {"code": "en", "label": "English", "tts_voice_tag": "en-US-female", "is_default": true}
        ],
        "ai_providers": [
            {"name": "OpenAI", "kind": "openai", "api_url": "https://api.openai.com/v1/chat/completions", "model": "gpt-4"}
        ]
    });

    for _ in 0..2 {
        let response = client()
            .post(format!("{}/api/import-config", ctx.base_url))
            .bearer_auth(&ctx.token)
            .json(&snapshot)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
    }

    assert_eq!(ctx.db.language_storage.list(&ctx.user_id).await.unwrap().len(), 1);
    assert_eq!(
        ctx.db.provider_storage.list_masked(&ctx.user_id).await.unwrap().len(),
        1
    );
}

#[tokio::test]
async fn test_import_rejects_malformed_snapshot() {
    let ctx = setup_test_server().await;

    let response = client()
        .post(format!("{}/api/import-config", ctx.base_url))
        .bearer_auth(&ctx.token)
        .json(&json!({ "languages": [] }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Invalid configuration format" }));
}
