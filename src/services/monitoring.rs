// Error reporting with Sentry
use sentry::ClientInitGuard;
use tracing::info;

use crate::common::AppConfig;

#[derive(Debug, Clone, PartialEq)]
pub struct MonitoringConfig {
    pub sentry_dsn: Option<String>,
    pub environment: String,
    pub traces_sample_rate: f32,
}

impl MonitoringConfig {
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            sentry_dsn: config.sentry_dsn.clone(),
            environment: if config.environment.is_production() {
                "production".to_string()
            } else {
                "development".to_string()
            },
            traces_sample_rate: 0.0,
        }
    }
}

/// Start the Sentry client when a DSN is configured.
/// Keep the returned guard alive for the life of the process.
pub fn init_sentry(config: &MonitoringConfig) -> Option<ClientInitGuard> {
    let Some(dsn) = config.sentry_dsn.as_deref() else {
        info!("Sentry DSN not configured");
        return None;
    };

    let guard = sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: Some(config.environment.clone().into()),
            traces_sample_rate: config.traces_sample_rate,
            ..Default::default()
        },
    ));

    info!("Sentry initialized successfully");
    Some(guard)
}
