// src/main.rs
use chrono::Duration;
use dotenv::dotenv;
use reqwest::Client;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::path::PathBuf;
use std::{net::SocketAddr, str::FromStr, sync::Arc};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{info, warn};
use tracing_subscriber::{prelude::*, EnvFilter};

// ============================================================================
// COMMON IMPORTS
// ============================================================================

use projectpilot::app;
use projectpilot::auth::{
    DevIdentityProvider, IdentityProvider, SessionBridge, SessionSigner, TokenInfoIdentityProvider,
};
use projectpilot::common::dev_mode::{apply_cli_override, print_dev_mode_status};
use projectpilot::common::migrations::run_migrations;
use projectpilot::common::{AppConfig, AppState};
use projectpilot::services::monitoring::{init_sentry, MonitoringConfig};
use projectpilot::services::OpenAIService;

// ============================================================================
// MAIN APPLICATION ENTRY POINT
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(sentry_tracing::layer())
        .init();

    // ========================================================================
    // ENVIRONMENT CONFIGURATION
    // ========================================================================

    let mut config = AppConfig::from_env();
    config.dev_mode = apply_cli_override(config.dev_mode);
    print_dev_mode_status(&config.dev_mode);

    let _sentry = init_sentry(&MonitoringConfig::from_app_config(&config));

    if config.session_secret == "replace_with_strong_secret" {
        warn!("SESSION_SECRET is not set; using the insecure default");
    }

    // ========================================================================
    // DATABASE SETUP
    // ========================================================================

    if let Some(path_part) = config.database_url.strip_prefix("sqlite://") {
        let path_without_params = path_part.split('?').next().unwrap_or("");
        if !path_without_params.is_empty() && !path_without_params.starts_with(':') {
            let db_path = PathBuf::from(path_without_params);
            if let Some(parent) = db_path.parent() {
                if !parent.as_os_str().is_empty() {
                    tokio::fs::create_dir_all(parent).await?;
                }
            }
        }
    }

    let connect_options =
        SqliteConnectOptions::from_str(&config.database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .connect_with(connect_options)
        .await?;

    // Run database migrations
    run_migrations(&pool).await?;

    // ========================================================================
    // SERVICE INITIALIZATION
    // ========================================================================

    let http_client = Client::builder().no_proxy().build()?;

    let identity: Arc<dyn IdentityProvider> = if config.dev_mode.is_enabled() {
        info!("DevIdentityProvider initialized");
        Arc::new(DevIdentityProvider::new(config.dev_mode.clone()))
    } else {
        info!(url = %config.identity_tokeninfo_url, "TokenInfoIdentityProvider initialized");
        Arc::new(TokenInfoIdentityProvider::new(
            http_client,
            config.identity_tokeninfo_url.clone(),
            config.identity_audience.clone(),
        ))
    };

    let sessions = Arc::new(SessionBridge::new(
        identity,
        SessionSigner::new(
            &config.session_secret,
            Duration::days(config.session_ttl_days),
        ),
        config.environment.is_production(),
        pool.clone(),
    ));
    info!("SessionBridge initialized");

    let openai_service = OpenAIService::new(&config);
    if !openai_service.is_configured() {
        warn!("OPENAI_API_KEY is not set; AI endpoints will answer 503");
    }
    info!(model = %config.openai_model, "OpenAIService initialized");

    // ========================================================================
    // APPLICATION STATE
    // ========================================================================

    let port = config.port;
    let cors_origins = config.cors_origins.clone();

    let app_state = AppState {
        db: pool,
        config,
        sessions,
        model: Arc::new(openai_service),
    };

    let shared = Arc::new(RwLock::new(app_state));

    // ========================================================================
    // SERVER STARTUP
    // ========================================================================

    let app = app::build_router(shared, &cors_origins);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
