// src/common/dev_mode.rs
//! Development mode configuration and utilities
//! Lets a local client sign in without a real identity provider. Session
//! cookies are still minted and verified, only the identity token check
//! is skipped.

use std::env;

use crate::auth::models::IdentityClaims;

/// Fixed subject so the dev user keeps the same projects across restarts
pub const DEV_USER_SUBJECT: &str = "dev-user-0001";

#[derive(Debug, Clone)]
pub struct DevModeConfig {
    pub enabled: bool,
    pub user_email: String,
    pub user_name: String,
}

impl DevModeConfig {
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let enabled = lookup("DEV_MODE")
            .unwrap_or_else(|| "false".to_string())
            .to_lowercase()
            == "true";

        let user_email = lookup("DEV_USER_EMAIL").unwrap_or_else(|| "dev@test.com".to_string());

        let user_name = lookup("DEV_USER_NAME").unwrap_or_else(|| "Dev User".to_string());

        Self {
            enabled,
            user_email,
            user_name,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Identity handed out for any non-empty token while dev mode is on
    pub fn create_dev_identity(&self) -> IdentityClaims {
        IdentityClaims {
            subject: DEV_USER_SUBJECT.to_string(),
            email: self.user_email.clone(),
            name: Some(self.user_name.clone()),
            picture: None,
        }
    }
}

/// Print dev mode status on startup
pub fn print_dev_mode_status(config: &DevModeConfig) {
    if config.enabled {
        println!("⚠️  🔓 DEV MODE ENABLED 🔓 ⚠️");
        println!("   Identity tokens are accepted without provider verification");
        println!("   Dev User: {} ({})", config.user_name, config.user_email);
        println!("   ⚠️  DO NOT USE IN PRODUCTION ⚠️");
        println!();
    } else {
        println!("🔒 Production mode - identity provider verification required");
    }
}

/// CLI argument parsing for dev mode
pub fn parse_dev_mode_args<I>(args: I) -> Option<bool>
where
    I: IntoIterator<Item = String>,
{
    for arg in args {
        match arg.as_str() {
            "--dev" | "--dev-mode" => return Some(true),
            "--no-dev" | "--prod" | "--production" => return Some(false),
            _ => {}
        }
    }

    None
}

/// Override dev mode from CLI args
pub fn apply_cli_override(mut config: DevModeConfig) -> DevModeConfig {
    if let Some(cli_dev_mode) = parse_dev_mode_args(env::args()) {
        println!("🔧 CLI override: DEV_MODE = {}", cli_dev_mode);
        config.enabled = cli_dev_mode;
    }

    config
}
