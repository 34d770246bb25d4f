// src/common/config.rs
//! Process configuration collected from the environment once at startup

use std::env;

use super::dev_mode::DevModeConfig;

pub const DEFAULT_TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_SESSION_TTL_DAYS: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "production" | "prod" => Environment::Production,
            _ => Environment::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub port: u16,
    pub environment: Environment,
    pub session_secret: String,
    pub session_ttl_days: i64,
    pub identity_tokeninfo_url: String,
    pub identity_audience: Option<String>,
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub openai_model: String,
    pub openai_timeout_secs: u64,
    pub cors_origins: Vec<String>,
    pub sentry_dsn: Option<String>,
    pub dev_mode: DevModeConfig,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let cors_origins = get("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:3000,http://localhost:5173".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Self {
            database_url: get("DATABASE_URL")
                .unwrap_or_else(|| "sqlite://projectpilot.db".to_string()),
            port: get("PORT").and_then(|p| p.parse().ok()).unwrap_or(8080),
            environment: Environment::parse(&get("APP_ENV").unwrap_or_default()),
            session_secret: get("SESSION_SECRET")
                .unwrap_or_else(|| "replace_with_strong_secret".to_string()),
            session_ttl_days: get("SESSION_TTL_DAYS")
                .and_then(|d| d.parse().ok())
                .filter(|d: &i64| *d > 0)
                .unwrap_or(DEFAULT_SESSION_TTL_DAYS),
            identity_tokeninfo_url: get("IDENTITY_TOKENINFO_URL")
                .unwrap_or_else(|| DEFAULT_TOKENINFO_URL.to_string()),
            identity_audience: get("IDENTITY_AUDIENCE"),
            openai_api_key: get("OPENAI_API_KEY"),
            openai_base_url: get("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            openai_model: get("OPENAI_MODEL").unwrap_or_else(|| "gpt-4o-mini".to_string()),
            openai_timeout_secs: get("OPENAI_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(60),
            cors_origins,
            sentry_dsn: get("SENTRY_DSN"),
            dev_mode: DevModeConfig::from_lookup(&lookup),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.port, 8080);
        assert_eq!(config.session_ttl_days, 5);
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.identity_tokeninfo_url, DEFAULT_TOKENINFO_URL);
        assert!(config.openai_api_key.is_none());
        assert_eq!(config.cors_origins.len(), 2);
    }

    #[test]
    fn test_production_and_overrides() {
        let config = config_from(&[
            ("APP_ENV", "Production"),
            ("PORT", "9000"),
            ("SESSION_TTL_DAYS", "2"),
            ("OPENAI_API_KEY", "sk-test"),
            ("CORS_ORIGINS", "https://a.example, https://b.example,"),
        ]);
        assert!(config.environment.is_production());
        assert_eq!(config.port, 9000);
        assert_eq!(config.session_ttl_days, 2);
        assert_eq!(config.openai_api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.cors_origins, vec!["https://a.example", "https://b.example"]);
    }

    #[test]
    fn test_invalid_numbers_fall_back() {
        let config = config_from(&[("PORT", "not-a-port"), ("SESSION_TTL_DAYS", "-3")]);
        assert_eq!(config.port, 8080);
        assert_eq!(config.session_ttl_days, DEFAULT_SESSION_TTL_DAYS);
    }

    #[test]
    fn test_empty_values_count_as_unset() {
        let config = config_from(&[("OPENAI_API_KEY", "  ")]);
        assert!(config.openai_api_key.is_none());
    }
}
