//! Environment-driven configuration
//!
//! Missing `DATABASE_URL` or `FMP_API_KEY` does not fail startup; the
//! affected subsystems degrade to empty results instead.

use std::env;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8723;

/// Application configuration, read once at startup
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// SQLite database location; `None` runs the server storeless
    pub database_path: Option<String>,

    /// Upstream market-data provider API key
    pub fmp_api_key: Option<String>,

    /// OAuth identity that is promoted to admin on upsert
    pub owner_open_id: Option<String>,

    /// Bind address for the API server
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Self {
        let database_path = env::var("DATABASE_URL")
            .ok()
            .filter(|v| !v.is_empty())
            .map(|v| strip_sqlite_scheme(&v).to_string());

        let fmp_api_key = env::var("FMP_API_KEY").ok().filter(|v| !v.is_empty());
        let owner_open_id = env::var("OWNER_OPEN_ID").ok().filter(|v| !v.is_empty());

        let host = env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
        let port = env::var("PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        Self {
            database_path,
            fmp_api_key,
            owner_open_id,
            host,
            port,
        }
    }
}

/// Accept both a bare path and a `sqlite://` connection string
fn strip_sqlite_scheme(url: &str) -> &str {
    url.strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))
        .unwrap_or(url)
}
