//! Session bridge
//!
//! Exchanges a verified identity token for a long-lived session cookie and
//! verifies that cookie on later requests. The cookie carries an HS256 JWT
//! signed with the server's session secret.

use axum::http::{header::COOKIE, HeaderMap, HeaderValue};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::identity::{IdentityError, IdentityProvider};
use super::models::{IdentityClaims, SessionClaims, SESSION_COOKIE_NAME};
use crate::common::{safe_email_log, ApiError};

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("idToken is required")]
    MissingToken,

    #[error("invalid identity token: {0}")]
    InvalidToken(String),

    #[error("identity provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("failed to sign session: {0}")]
    Signing(String),

    #[error("session store unavailable: {0}")]
    Storage(String),
}

impl From<IdentityError> for AuthError {
    fn from(e: IdentityError) -> Self {
        match e {
            IdentityError::Rejected(msg) => AuthError::InvalidToken(msg),
            IdentityError::Unavailable(msg) => AuthError::ProviderUnavailable(msg),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::MissingToken => ApiError::BadRequest(e.to_string()),
            AuthError::InvalidToken(_) | AuthError::ProviderUnavailable(_) => {
                ApiError::Unauthorized("Failed to create session".to_string())
            }
            AuthError::Signing(_) | AuthError::Storage(_) => {
                ApiError::InternalServer("Failed to create session".to_string())
            }
        }
    }
}

/// Signs and verifies session tokens
#[derive(Clone)]
pub struct SessionSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl SessionSigner {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Mint claims for `identity`, valid from `issued_at` for the configured ttl
    pub fn claims_for(&self, identity: &IdentityClaims, issued_at: i64) -> SessionClaims {
        SessionClaims {
            sub: identity.subject.clone(),
            email: identity.email.clone(),
            name: identity.name.clone(),
            picture: identity.picture.clone(),
            iat: issued_at,
            exp: issued_at + self.ttl.num_seconds(),
        }
    }

    pub fn sign(&self, claims: &SessionClaims) -> Result<String, AuthError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }

    pub fn verify(&self, token: &str) -> Result<SessionClaims, jsonwebtoken::errors::Error> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        decode::<SessionClaims>(token, &self.decoding, &validation).map(|data| data.claims)
    }
}

/// Attributes shared by the session cookie and its clearing counterpart
#[derive(Debug, Clone, Copy)]
pub struct CookieSettings {
    pub secure: bool,
    pub max_age_secs: i64,
}

impl CookieSettings {
    fn attributes(&self, max_age: i64) -> String {
        let mut attrs = format!("Max-Age={}; Path=/; HttpOnly; SameSite=Lax", max_age);
        if self.secure {
            attrs.push_str("; Secure");
        }
        attrs
    }

    /// `Set-Cookie` value carrying a session token
    pub fn session_cookie(&self, token: &str) -> String {
        format!("{}={}; {}", SESSION_COOKIE_NAME, token, self.attributes(self.max_age_secs))
    }

    /// `Set-Cookie` value that removes the session cookie
    pub fn clearing_cookie(&self) -> String {
        format!(
            "{}=; {}; Expires=Thu, 01 Jan 1970 00:00:00 GMT",
            SESSION_COOKIE_NAME,
            self.attributes(0)
        )
    }
}

/// Reads the session cookie value from request headers, ignoring empty values
pub fn session_cookie_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|raw| raw.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE_NAME)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Result of a successful [`SessionBridge::create_session`]
#[derive(Debug)]
pub struct IssuedSession {
    pub claims: SessionClaims,
    pub set_cookie: HeaderValue,
}

pub struct SessionBridge {
    identity: Arc<dyn IdentityProvider>,
    signer: SessionSigner,
    cookies: CookieSettings,
    db: SqlitePool,
}

impl SessionBridge {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        signer: SessionSigner,
        secure_cookies: bool,
        db: SqlitePool,
    ) -> Self {
        let cookies = CookieSettings {
            secure: secure_cookies,
            max_age_secs: signer.ttl().num_seconds(),
        };
        Self {
            identity,
            signer,
            cookies,
            db,
        }
    }

    /// Exchange an identity token for a signed session cookie
    pub async fn create_session(&self, id_token: &str) -> Result<IssuedSession, AuthError> {
        let id_token = id_token.trim();
        if id_token.is_empty() {
            return Err(AuthError::MissingToken);
        }

        let identity = self.identity.verify_id_token(id_token).await?;

        // A revocation moments ago may sit ahead of the clock; never issue below it
        let valid_after = self
            .tokens_valid_after(&identity.subject)
            .await
            .map_err(|e| AuthError::Storage(e.to_string()))?
            .unwrap_or(0);
        let issued_at = Utc::now().timestamp().max(valid_after);
        let claims = self.signer.claims_for(&identity, issued_at);
        let token = self.signer.sign(&claims)?;

        let set_cookie = HeaderValue::from_str(&self.cookies.session_cookie(&token))
            .map_err(|e| AuthError::Signing(e.to_string()))?;

        info!(
            user_id = %claims.sub,
            email = %safe_email_log(&claims.email),
            expires_at = claims.exp,
            "Session cookie minted"
        );

        Ok(IssuedSession { claims, set_cookie })
    }

    /// The user's revocation watermark, `None` before the first sign-in
    async fn tokens_valid_after(&self, user_id: &str) -> Result<Option<i64>, sqlx::Error> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT tokens_valid_after FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&self.db)
            .await?;
        Ok(row.map(|(valid_after,)| valid_after))
    }

    /// `Set-Cookie` header that clears the session cookie
    pub fn delete_session(&self) -> Result<HeaderValue, AuthError> {
        HeaderValue::from_str(&self.cookies.clearing_cookie()).map_err(|e| {
            error!(error = %e, "Failed to build clearing cookie");
            AuthError::Signing(e.to_string())
        })
    }

    /// Verify a session cookie. Any failure yields `None`.
    ///
    /// With `check_revoked` the token must also postdate the user's
    /// `tokens_valid_after` watermark, and the user must still exist.
    pub async fn verify_session(&self, cookie: &str, check_revoked: bool) -> Option<SessionClaims> {
        let claims = match self.signer.verify(cookie) {
            Ok(claims) => claims,
            Err(e) => {
                debug!(error = %e, "Session cookie failed verification");
                return None;
            }
        };

        if !check_revoked {
            return Some(claims);
        }

        let watermark = match self.tokens_valid_after(&claims.sub).await {
            Ok(watermark) => watermark,
            Err(e) => {
                error!(error = %e, user_id = %claims.sub, "Database error during revocation check");
                return None;
            }
        };

        match watermark {
            Some(valid_after) if claims.iat >= valid_after => Some(claims),
            Some(valid_after) => {
                warn!(
                    user_id = %claims.sub,
                    issued_at = claims.iat,
                    valid_after = valid_after,
                    "Session cookie has been revoked"
                );
                None
            }
            None => {
                warn!(user_id = %claims.sub, "Session cookie for unknown user");
                None
            }
        }
    }
}
