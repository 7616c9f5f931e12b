// ABOUTME: Authentication context for API requests
// ABOUTME: Resolves bearer tokens to user identities before handlers run

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use tracing::{debug, warn};

use crate::db::DbState;
use crate::error::ApiError;

/// Current authenticated user
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: String,
}

impl<S> FromRequestParts<S> for CurrentUser
where
    DbState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let db = DbState::from_ref(state);

        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or(ApiError::Unauthorized)?;

        let record = db
            .token_storage
            .verify_token(token)
            .await
            .map_err(|e| {
                warn!("Token verification failed: {}", e);
                ApiError::Unauthorized
            })?
            .ok_or_else(|| {
                warn!("Invalid bearer token");
                ApiError::Unauthorized
            })?;

        // Best effort; a failed timestamp update never fails the request
        if let Err(e) = db.token_storage.update_last_used(&record.token_hash).await {
            warn!("Failed to update token last_used timestamp: {}", e);
        }

        debug!("Authenticated user {}", record.user_id);

        Ok(CurrentUser {
            id: record.user_id,
        })
    }
}
