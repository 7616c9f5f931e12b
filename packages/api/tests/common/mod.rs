// ABOUTME: Common test utilities for integration tests
// ABOUTME: Boots a real server on a random port plus mock vendor endpoints

#![allow(dead_code)]

use std::sync::atomic::AtomicUsize;
use std::sync::{Arc, Mutex};

use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::Value;

use tutor_api::{create_api_router, AppState, DbState};

/// Test context containing server URL, database state, and a ready user
pub struct TestContext {
    pub base_url: String,
    pub db: DbState,
    pub user_id: String,
    pub token: String,
}

/// Create a test server with an isolated in-memory database and one
/// provisioned user + bearer token
pub async fn setup_test_server() -> TestContext {
    let pool = tutor_storage::connect_in_memory()
        .await
        .expect("Failed to create database pool");

    let db = DbState::new(pool).expect("Failed to create DbState");

    let user = db
        .user_storage
        .create("admin@example.com", "Admin")
        .await
        .expect("Failed to create user");
    let token = db
        .token_storage
        .create_token(&user.id, "tests")
        .await
        .expect("Failed to create token");

    let app = create_api_router(AppState::new(db.clone()));

    // Bind to random available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{}", addr);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestContext {
        base_url,
        db,
        user_id: user.id,
        token: token.token,
    }
}

/// Provision an additional user with their own bearer token
pub async fn add_user(ctx: &TestContext, email: &str) -> (String, String) {
    let user = ctx
        .db
        .user_storage
        .create(email, "Other")
        .await
        .expect("Failed to create user");
    let token = ctx
        .db
        .token_storage
        .create_token(&user.id, "tests")
        .await
        .expect("Failed to create token");
    (user.id, token.token)
}

/// What a mock vendor observed
pub struct VendorProbe {
    pub url: String,
    pub hits: Arc<AtomicUsize>,
    pub last_headers: Arc<Mutex<Option<HeaderMap>>>,
    pub last_body: Arc<Mutex<Option<Value>>>,
}

/// Spawn a mock vendor endpoint answering every POST with the given
/// status and body, recording hits, headers, and request bodies
pub async fn spawn_vendor(status: StatusCode, body: Value) -> VendorProbe {
    let hits = Arc::new(AtomicUsize::new(0));
    let last_headers: Arc<Mutex<Option<HeaderMap>>> = Arc::new(Mutex::new(None));
    let last_body: Arc<Mutex<Option<Value>>> = Arc::new(Mutex::new(None));

    let hits_handle = hits.clone();
    let headers_handle = last_headers.clone();
    let body_handle = last_body.clone();

    let app = Router::new().route(
        "/{*path}",
        post(move |headers: HeaderMap, Json(request): Json<Value>| {
            let hits = hits_handle.clone();
            let captured_headers = headers_handle.clone();
            let captured_body = body_handle.clone();
            let body = body.clone();
            async move {
                hits.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                *captured_headers.lock().unwrap() = Some(headers);
                *captured_body.lock().unwrap() = Some(request);
                (status, Json(body))
            }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let url = format!("http://{}", addr);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    VendorProbe {
        url,
        hits,
        last_headers,
        last_body,
    }
}
