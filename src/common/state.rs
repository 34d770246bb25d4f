// Application state shared across all modules

use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::config::AppConfig;
use crate::ai::ModelClient;
use crate::auth::SessionBridge;

/// Application state containing the database pool, process-wide clients and configuration.
///
/// Built once in `main` and handed to handlers through an `Extension`.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: AppConfig,
    pub sessions: Arc<SessionBridge>,
    pub model: Arc<dyn ModelClient>,
}

pub type SharedState = Arc<RwLock<AppState>>;
