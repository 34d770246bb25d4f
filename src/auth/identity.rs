//! Identity provider clients
//!
//! The browser signs in with the hosted identity provider and posts the
//! resulting ID token to us. An [`IdentityProvider`] decides whether that
//! token is genuine and returns the identity it asserts.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use tracing::{debug, error, warn};

use super::models::IdentityClaims;
use crate::common::dev_mode::DevModeConfig;
use crate::common::{safe_email_log, safe_token_log};

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("identity token rejected: {0}")]
    Rejected(String),

    #[error("identity provider unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Verify a short-lived ID token and return the identity it asserts
    async fn verify_id_token(&self, id_token: &str) -> Result<IdentityClaims, IdentityError>;
}

/// Verifies ID tokens against an OAuth2 `tokeninfo` style endpoint
///
/// The endpoint receives `?id_token=<token>` and answers with the decoded
/// claims (`sub`, `email`, `name`, `picture`, `aud`, `exp`) or a 4xx.
pub struct TokenInfoIdentityProvider {
    http: Client,
    tokeninfo_url: String,
    audience: Option<String>,
}

impl TokenInfoIdentityProvider {
    pub fn new(http: Client, tokeninfo_url: String, audience: Option<String>) -> Self {
        Self {
            http,
            tokeninfo_url,
            audience,
        }
    }
}

#[async_trait]
impl IdentityProvider for TokenInfoIdentityProvider {
    async fn verify_id_token(&self, id_token: &str) -> Result<IdentityClaims, IdentityError> {
        let url = format!(
            "{}?id_token={}",
            self.tokeninfo_url,
            urlencoding::encode(id_token)
        );

        debug!(token = %safe_token_log(id_token), "Validating identity token with tokeninfo endpoint");

        let response = self.http.get(&url).send().await.map_err(|e| {
            error!(
                error = %e,
                endpoint = %self.tokeninfo_url,
                "HTTP error contacting tokeninfo endpoint"
            );
            IdentityError::Unavailable(e.to_string())
        })?;

        let status = response.status();
        if status.is_client_error() {
            warn!(http_status = %status, "tokeninfo rejected identity token");
            return Err(IdentityError::Rejected(format!("tokeninfo returned {}", status)));
        }
        if !status.is_success() {
            warn!(http_status = %status, "tokeninfo returned error status");
            return Err(IdentityError::Unavailable(format!("tokeninfo returned {}", status)));
        }

        let body = response.json::<serde_json::Value>().await.map_err(|e| {
            error!(error = %e, "Failed to parse tokeninfo JSON response");
            IdentityError::Rejected("malformed tokeninfo response".to_string())
        })?;

        claims_from_tokeninfo(&body, self.audience.as_deref(), Utc::now().timestamp())
    }
}

/// Extracts and checks identity claims from a tokeninfo payload
///
/// `exp` may arrive as a number or a numeric string depending on the provider.
pub fn claims_from_tokeninfo(
    body: &serde_json::Value,
    expected_audience: Option<&str>,
    now: i64,
) -> Result<IdentityClaims, IdentityError> {
    let text = |key: &str| body.get(key).and_then(|v| v.as_str()).map(str::to_string);

    let (subject, email) = match (text("sub"), text("email")) {
        (Some(sub), Some(email)) if !sub.is_empty() => (sub, email),
        (sub, email) => {
            warn!(
                has_sub = sub.is_some(),
                has_email = email.is_some(),
                "Identity token missing required fields (sub/email)"
            );
            return Err(IdentityError::Rejected("token missing required fields".to_string()));
        }
    };

    let exp = body.get("exp").and_then(|v| {
        v.as_i64()
            .or_else(|| v.as_str().and_then(|s| s.parse::<i64>().ok()))
    });
    if let Some(exp) = exp {
        if exp < now {
            warn!(token_exp = exp, current_time = now, "Identity token has expired");
            return Err(IdentityError::Rejected("token has expired".to_string()));
        }
    }

    if let Some(expected) = expected_audience {
        match text("aud") {
            Some(aud) if aud == expected => {}
            Some(aud) => {
                warn!(token_audience = %aud, expected = %expected, "Identity token audience mismatch");
                return Err(IdentityError::Rejected("token audience mismatch".to_string()));
            }
            None => {
                warn!(expected = %expected, "Identity token missing audience");
                return Err(IdentityError::Rejected("token missing audience".to_string()));
            }
        }
    }

    debug!(email = %safe_email_log(&email), "Identity token verified");

    Ok(IdentityClaims {
        subject,
        email,
        name: text("name"),
        picture: text("picture"),
    })
}

/// Accepts any non-empty token and returns the configured dev identity
pub struct DevIdentityProvider {
    config: DevModeConfig,
}

impl DevIdentityProvider {
    pub fn new(config: DevModeConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl IdentityProvider for DevIdentityProvider {
    async fn verify_id_token(&self, id_token: &str) -> Result<IdentityClaims, IdentityError> {
        if id_token.trim().is_empty() {
            return Err(IdentityError::Rejected("empty token".to_string()));
        }
        debug!("DEV MODE: identity token accepted without verification");
        Ok(self.config.create_dev_identity())
    }
}
