// ABOUTME: HTTP request handlers for user settings
// ABOUTME: Single-row get/upsert; absence reads as the empty shape

use axum::{extract::State, Json};
use serde_json::{json, Value};
use tracing::info;

use crate::auth::CurrentUser;
use crate::db::DbState;
use crate::error::ApiError;
use tutor_settings::SettingsInput;

/// Fetch the user's settings row, or the empty shape if none exists yet
pub async fn get_settings(
    State(db): State<DbState>,
    current_user: CurrentUser,
) -> Result<Json<Value>, ApiError> {
    match db.settings_storage.get(&current_user.id).await? {
        Some(settings) => Ok(Json(serde_json::to_value(settings).map_err(
            tutor_storage::StorageError::Json,
        )?)),
        None => Ok(Json(json!({
            "default_language_id": null,
            "active_provider_id": null,
            "settings_json": {}
        }))),
    }
}

/// Upsert the user's settings row
pub async fn update_settings(
    State(db): State<DbState>,
    current_user: CurrentUser,
    Json(input): Json<SettingsInput>,
) -> Result<Json<Value>, ApiError> {
    info!("Updating settings for user {}", current_user.id);

    let settings = db.settings_storage.upsert(&current_user.id, input).await?;
    Ok(Json(
        serde_json::to_value(settings).map_err(tutor_storage::StorageError::Json)?,
    ))
}
