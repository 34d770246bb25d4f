// src/profile/handlers.rs

use axum::extract::{rejection::JsonRejection, Extension, Json};
use tracing::warn;

use super::models::{UpdateProfileRequest, User};
use super::services::UsersService;
use crate::auth::AuthedUser;
use crate::common::{ApiError, SharedState};

/// GET /api/me - Current user's profile document
pub async fn me_handler(
    Extension(state_lock): Extension<SharedState>,
    authed: AuthedUser,
) -> Result<Json<User>, ApiError> {
    let state = state_lock.read().await.clone();
    let users = UsersService::new(state.db);

    let user = users
        .get_user(&authed.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(user))
}

/// PUT /api/me - Edit display name and/or avatar reference
///
/// # Request Body
/// ```json
/// { "displayName": "Ada", "avatarUrl": "https://example.com/ada.png" }
/// ```
pub async fn update_me_handler(
    Extension(state_lock): Extension<SharedState>,
    authed: AuthedUser,
    payload: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> Result<Json<User>, ApiError> {
    let Json(request) = payload.map_err(|e| {
        warn!(error = %e, "Malformed profile update body");
        ApiError::BadRequest(e.body_text())
    })?;

    let state = state_lock.read().await.clone();
    let users = UsersService::new(state.db);

    let user = users.update_profile(&authed.id, request).await?;
    Ok(Json(user))
}
