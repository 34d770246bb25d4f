use sqlx::SqlitePool;
use tracing::info;

use super::models::{UpdateProfileRequest, User};
use super::validators::UpdateProfileValidator;
use crate::auth::models::IdentityClaims;
use crate::common::{now_rfc3339, safe_email_log, ApiError, Validator};

const USER_COLUMNS: &str =
    "id, email, display_name, avatar_url, tokens_valid_after, created_at, updated_at";

pub struct UsersService {
    db: SqlitePool,
}

impl UsersService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Get user by ID
    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, ApiError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE id = ?",
            USER_COLUMNS
        ))
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(user)
    }

    /// Create the user document on first sign-in.
    ///
    /// Idempotent: an existing document is returned untouched. The flag is
    /// `true` only when this call created it.
    pub async fn ensure_user(&self, identity: &IdentityClaims) -> Result<(User, bool), ApiError> {
        let now = now_rfc3339();

        let inserted = sqlx::query(
            r#"
            INSERT OR IGNORE INTO users (id, email, display_name, avatar_url, tokens_valid_after, created_at, updated_at)
            VALUES (?, ?, ?, ?, 0, ?, ?)
            "#,
        )
        .bind(&identity.subject)
        .bind(&identity.email)
        .bind(&identity.name)
        .bind(&identity.picture)
        .bind(&now)
        .bind(&now)
        .execute(&self.db)
        .await?
        .rows_affected()
            > 0;

        if inserted {
            info!(
                user_id = %identity.subject,
                email = %safe_email_log(&identity.email),
                "Created user document on first sign-in"
            );
        }

        let user = self
            .get_user(&identity.subject)
            .await?
            .ok_or_else(|| ApiError::InternalServer("user vanished after upsert".to_string()))?;

        Ok((user, inserted))
    }

    /// Apply a profile edit
    pub async fn update_profile(
        &self,
        user_id: &str,
        request: UpdateProfileRequest,
    ) -> Result<User, ApiError> {
        UpdateProfileValidator.validate(&request).into_result()?;

        let existing = self
            .get_user(user_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        let display_name = request
            .display_name
            .map(|n| n.trim().to_string())
            .or(existing.display_name);
        // An empty avatar string clears the reference
        let avatar_url = match request.avatar_url {
            Some(url) if url.is_empty() => None,
            Some(url) => Some(url),
            None => existing.avatar_url,
        };

        sqlx::query("UPDATE users SET display_name = ?, avatar_url = ?, updated_at = ? WHERE id = ?")
            .bind(&display_name)
            .bind(&avatar_url)
            .bind(now_rfc3339())
            .bind(user_id)
            .execute(&self.db)
            .await?;

        info!(user_id = %user_id, "Profile updated");

        self.get_user(user_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))
    }

    /// Invalidate every session issued before `now` (unix seconds)
    pub async fn revoke_sessions(&self, user_id: &str, now: i64) -> Result<(), ApiError> {
        let result = sqlx::query("UPDATE users SET tokens_valid_after = ?, updated_at = ? WHERE id = ?")
            .bind(now)
            .bind(now_rfc3339())
            .bind(user_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("User not found".to_string()));
        }

        info!(user_id = %user_id, valid_after = now, "Revoked existing sessions");
        Ok(())
    }
}
