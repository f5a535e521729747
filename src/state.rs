//! Application state management

use crate::config::AppConfig;
use crate::db::Database;
use crate::fmp::{FmpClient, QuoteSource};
use dashmap::DashMap;
use std::path::Path;
use std::sync::Arc;

/// Authenticated session resolved from the session cookie
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: i64,
    pub open_id: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// In-memory session store keyed by opaque session token
#[derive(Default)]
pub struct SessionStore {
    sessions: DashMap<String, Session>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session and return its token
    pub fn create(&self, user_id: i64, open_id: String) -> String {
        let token = uuid::Uuid::new_v4().to_string();
        self.sessions.insert(
            token.clone(),
            Session {
                user_id,
                open_id,
                created_at: chrono::Utc::now(),
            },
        );
        token
    }

    pub fn get(&self, token: &str) -> Option<Session> {
        self.sessions.get(token).map(|s| s.clone())
    }

    pub fn remove(&self, token: &str) {
        self.sessions.remove(token);
    }
}

/// Application state shared across all request handlers
pub struct AppState {
    /// Startup configuration
    pub config: AppConfig,

    /// Persistent store; `None` when no database is configured, in which
    /// case reads degrade to empty results and writes no-op
    pub db: Option<Arc<Database>>,

    /// Upstream market-data source
    pub quotes: Arc<dyn QuoteSource>,

    /// Active sessions
    pub sessions: SessionStore,
}

impl AppState {
    /// Assemble state from explicitly constructed parts
    pub fn new(config: AppConfig, db: Option<Arc<Database>>, quotes: Arc<dyn QuoteSource>) -> Self {
        Self {
            config,
            db,
            quotes,
            sessions: SessionStore::new(),
        }
    }

    /// Build state from configuration: open the store (degrading to none on
    /// failure) and construct the upstream client
    pub fn from_config(config: AppConfig) -> Self {
        let db = match &config.database_path {
            Some(path) => match Database::open(Path::new(path)) {
                Ok(db) => {
                    tracing::info!("Database ready at {}", path);
                    Some(Arc::new(db))
                }
                Err(e) => {
                    tracing::warn!("Failed to open database at {}: {}", path, e);
                    None
                }
            },
            None => {
                tracing::warn!("DATABASE_URL not configured; store-backed reads will be empty");
                None
            }
        };

        let quotes: Arc<dyn QuoteSource> = Arc::new(FmpClient::new(config.fmp_api_key.clone()));

        Self::new(config, db, quotes)
    }
}
