// ABOUTME: HTTP request handlers for language CRUD
// ABOUTME: Per-user language rows with single-default enforcement

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
use tutor_languages::{Language, LanguageInput, LanguageUpdate};

#[derive(Serialize)]
pub struct LanguagesResponse {
    pub languages: Vec<Language>,
}

/// List the user's languages in creation order
pub async fn list_languages(
    State(db): State<DbState>,
    current_user: CurrentUser,
) -> Result<Json<LanguagesResponse>, ApiError> {
    let languages = db.language_storage.list(&current_user.id).await?;
    Ok(Json(LanguagesResponse { languages }))
}

/// Create a language. `is_default: true` atomically clears the previous
/// default in the same transaction.
pub async fn create_language(
    State(db): State<DbState>,
    current_user: CurrentUser,
    Json(input): Json<LanguageInput>,
) -> Result<Json<Value>, ApiError> {
    info!("Creating language {} for user {}", input.code, current_user.id);

    let language = db.language_storage.create(&current_user.id, input).await?;
    Ok(Json(json!({ "success": true, "data": language })))
}

/// Partially update a language
pub async fn update_language(
    State(db): State<DbState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
    Json(update): Json<LanguageUpdate>,
) -> Result<Json<Value>, ApiError> {
    info!("Updating language {} for user {}", id, current_user.id);

    let language = db
        .language_storage
        .update(&current_user.id, &id, update)
        .await?;
    Ok(Json(json!({ "success": true, "data": language })))
}

/// Delete a language. A settings row pointing at it is left dangling;
/// resolution treats that as "no default chosen".
pub async fn delete_language(
    State(db): State<DbState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    info!("Deleting language {} for user {}", id, current_user.id);

    db.language_storage.delete(&current_user.id, &id).await?;
    Ok(Json(json!({ "success": true })))
}
