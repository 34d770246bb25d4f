//! Authentication extractors for Axum

use async_trait::async_trait;
use axum::{
    extract::{Extension, FromRequestParts},
    http::request::Parts,
};
use tracing::{debug, warn};

use super::models::SessionClaims;
use super::session::session_cookie_from_headers;
use crate::common::{safe_email_log, ApiError, SharedState};

/// Authenticated user extractor
///
/// Reads the `session` cookie, verifies it (revocation included) and yields
/// the caller's identity. Handlers taking an `AuthedUser` answer 401 without it.
#[derive(Debug, Clone)]
pub struct AuthedUser {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub picture: Option<String>,
}

impl From<SessionClaims> for AuthedUser {
    fn from(claims: SessionClaims) -> Self {
        Self {
            id: claims.sub,
            email: claims.email,
            name: claims.name,
            picture: claims.picture,
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Extension(state_lock): Extension<SharedState> =
            Extension::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::InternalServer("missing app state".to_string()))?;

        let sessions = state_lock.read().await.sessions.clone();

        let cookie = match session_cookie_from_headers(&parts.headers) {
            Some(c) => c,
            None => {
                debug!("Authentication failed: no session cookie");
                return Err(ApiError::Unauthorized("Unauthorized".into()));
            }
        };

        match sessions.verify_session(&cookie, true).await {
            Some(claims) => {
                debug!(
                    user_id = %claims.sub,
                    email = %safe_email_log(&claims.email),
                    "Session authentication successful via extractor"
                );
                Ok(AuthedUser::from(claims))
            }
            None => {
                warn!("Authentication failed: invalid or revoked session cookie");
                Err(ApiError::Unauthorized("Unauthorized".into()))
            }
        }
    }
}
