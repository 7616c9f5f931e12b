// ABOUTME: HTTP request handlers for configuration operations
// ABOUTME: Effective-config resolution and snapshot export/import

use axum::{http::header, response::IntoResponse, Json};
use axum::extract::State;
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::auth::CurrentUser;
use crate::db::DbState;
use crate::error::ApiError;
use tutor_settings::PublicConfig;
use tutor_snapshot::{export_snapshot, import_snapshot, ImportCounts, ImportError};

/// Resolve the user's effective configuration:
/// `{defaultLanguage, activeProvider, settings}`
pub async fn public_config(
    State(db): State<DbState>,
    current_user: CurrentUser,
) -> Result<Json<PublicConfig>, ApiError> {
    info!("Resolving public config for user {}", current_user.id);

    let config = db.settings_storage.resolve(&current_user.id).await?;
    Ok(Json(config))
}

/// Export the user's configuration as a downloadable snapshot
pub async fn export_config(
    State(db): State<DbState>,
    current_user: CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    info!("Exporting configuration for user {}", current_user.id);

    let snapshot = export_snapshot(
        &db.language_storage,
        &db.provider_storage,
        &db.settings_storage,
        &current_user.id,
    )
    .await?;

    Ok((
        [(
            header::CONTENT_DISPOSITION,
            "attachment; filename=\"ai-dom-tutor-config.json\"",
        )],
        Json(snapshot),
    ))
}

#[derive(Serialize)]
pub struct ImportReport {
    pub success: bool,
    pub message: String,
    pub imported: ImportCounts,
}

/// Merge an uploaded snapshot into the user's configuration
pub async fn import_config(
    State(db): State<DbState>,
    current_user: CurrentUser,
    Json(snapshot): Json<Value>,
) -> Result<Json<ImportReport>, ApiError> {
    info!("Importing configuration for user {}", current_user.id);

    let imported = import_snapshot(
        &db.language_storage,
        &db.provider_storage,
        &db.settings_storage,
        &current_user.id,
        &snapshot,
    )
    .await
    .map_err(|e| match e {
        ImportError::InvalidFormat => {
            ApiError::InvalidFormat("Invalid configuration format".to_string())
        }
        ImportError::Storage(e) => ApiError::Storage(e),
    })?;

    Ok(Json(ImportReport {
        success: true,
        message: "Configuration imported successfully. Please re-enter API keys for security."
            .to_string(),
        imported,
    }))
}
