//! Authentication handlers

use axum::{
    extract::{rejection::JsonRejection, Extension, Json},
    http::{header::SET_COOKIE, StatusCode},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use tracing::{error, info, warn};

use super::extractors::AuthedUser;
use super::models::{CreateSessionRequest, SuccessResponse};
use super::session::AuthError;
use crate::common::{safe_email_log, safe_token_log, ApiError, SharedState};
use crate::profile::UsersService;
use crate::projects::ProjectsService;

/// POST /api/auth/session
/// Exchanges an identity token for the `session` cookie
///
/// # Request Body
/// ```json
/// {
///   "idToken": "<identity provider token>"
/// }
/// ```
///
/// # Response
/// `200 {"success": true}` with `Set-Cookie: session=...`.
/// `400` when the token is missing, `401` (with a clearing cookie) when it
/// does not verify.
pub async fn create_session_handler(
    Extension(state_lock): Extension<SharedState>,
    payload: Result<Json<CreateSessionRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload.map_err(|e| {
        warn!(error = %e, "Malformed session request body");
        ApiError::BadRequest(e.body_text())
    })?;

    let id_token = request.id_token.unwrap_or_default();
    if id_token.trim().is_empty() {
        warn!("Session request without idToken");
        return Err(AuthError::MissingToken.into());
    }

    let state = state_lock.read().await.clone();
    info!(token = %safe_token_log(&id_token), "🔐 Received session request");

    let issued = match state.sessions.create_session(&id_token).await {
        Ok(issued) => issued,
        Err(e @ (AuthError::Signing(_) | AuthError::Storage(_))) => {
            error!(error = %e, "Failed to mint session cookie");
            return Err(e.into());
        }
        Err(e) => {
            warn!(error = %e, "Identity token rejected");
            // A failed sign-in also drops whatever session the browser held
            let mut response = ApiError::from(e).into_response();
            if let Ok(clear) = state.sessions.delete_session() {
                response.headers_mut().append(SET_COOKIE, clear);
            }
            return Ok(response);
        }
    };

    let users = UsersService::new(state.db.clone());
    let (user, created) = users.ensure_user(&issued.claims.identity()).await?;

    if created {
        let projects = ProjectsService::new(state.db.clone());
        if let Err(e) = projects.create_welcome_project(&user.id).await {
            error!(error = %e, user_id = %user.id, "Failed to seed welcome project");
        }
    }

    info!(
        user_id = %user.id,
        email = %safe_email_log(&user.email),
        new_user = created,
        "✅ Session created"
    );

    Ok((
        StatusCode::OK,
        [(SET_COOKIE, issued.set_cookie)],
        Json(SuccessResponse::ok()),
    )
        .into_response())
}

/// DELETE /api/auth/session
/// Clears the session cookie. Succeeds whether or not a session existed.
pub async fn delete_session_handler(
    Extension(state_lock): Extension<SharedState>,
) -> Result<Response, ApiError> {
    let sessions = state_lock.read().await.sessions.clone();

    let clear = sessions.delete_session().map_err(|e| {
        error!(error = %e, "Failed to clear session cookie");
        ApiError::InternalServer("Failed to delete session".to_string())
    })?;

    info!("Session cookie cleared");

    Ok((StatusCode::OK, [(SET_COOKIE, clear)], Json(SuccessResponse::ok())).into_response())
}

/// POST /api/auth/revoke
/// Invalidates every session issued to the caller so far, this one included
pub async fn revoke_sessions_handler(
    Extension(state_lock): Extension<SharedState>,
    authed: AuthedUser,
) -> Result<Response, ApiError> {
    let state = state_lock.read().await.clone();
    let users = UsersService::new(state.db.clone());

    // Tokens carry whole seconds; anything issued up to and including now is revoked
    users
        .revoke_sessions(&authed.id, Utc::now().timestamp() + 1)
        .await?;

    info!(
        user_id = %authed.id,
        email = %safe_email_log(&authed.email),
        "Sessions revoked"
    );

    let clear = state
        .sessions
        .delete_session()
        .map_err(|_| ApiError::InternalServer("Failed to clear session".to_string()))?;

    Ok((StatusCode::OK, [(SET_COOKIE, clear)], Json(SuccessResponse::ok())).into_response())
}
