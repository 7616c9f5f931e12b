// ABOUTME: HTTP request handlers for AI provider CRUD
// ABOUTME: Credentials are accepted on write and never returned on read

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::info;

use crate::auth::CurrentUser;
use crate::db::DbState;
use crate::error::ApiError;
use tutor_providers::{MaskedProvider, ProviderInput, ProviderUpdate};

#[derive(Serialize)]
pub struct ProvidersResponse {
    pub providers: Vec<MaskedProvider>,
}

/// List the user's providers (masked projection) in creation order
pub async fn list_providers(
    State(db): State<DbState>,
    current_user: CurrentUser,
) -> Result<Json<ProvidersResponse>, ApiError> {
    let providers = db.provider_storage.list_masked(&current_user.id).await?;
    Ok(Json(ProvidersResponse { providers }))
}

/// Register a provider; the submitted api_key is encrypted before it
/// touches the database and does not appear in the response
pub async fn create_provider(
    State(db): State<DbState>,
    current_user: CurrentUser,
    Json(input): Json<ProviderInput>,
) -> Result<Json<Value>, ApiError> {
    info!("Creating provider {} for user {}", input.name, current_user.id);

    let provider = db.provider_storage.create(&current_user.id, input).await?;
    Ok(Json(json!({ "success": true, "data": provider })))
}

/// Partially update a provider; a present api_key is re-encrypted
pub async fn update_provider(
    State(db): State<DbState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
    Json(update): Json<ProviderUpdate>,
) -> Result<Json<Value>, ApiError> {
    info!("Updating provider {} for user {}", id, current_user.id);

    let provider = db
        .provider_storage
        .update(&current_user.id, &id, update)
        .await?;
    Ok(Json(json!({ "success": true, "data": provider })))
}

/// Delete a provider
pub async fn delete_provider(
    State(db): State<DbState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    info!("Deleting provider {} for user {}", id, current_user.id);

    db.provider_storage.delete(&current_user.id, &id).await?;
    Ok(Json(json!({ "success": true })))
}
