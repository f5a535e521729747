//! API request and response payloads

use serde::{Deserialize, Serialize};

pub const DEFAULT_MOVERS_LIMIT: usize = 10;
pub const DEFAULT_SEARCH_LIMIT: usize = 20;
pub const DEFAULT_NEWS_LIMIT: usize = 20;
pub const DEFAULT_IPO_LIMIT: usize = 10;
pub const DEFAULT_HISTORY_LIMIT: u32 = 100;

/// Optional limit for list endpoints
#[derive(Debug, Default, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<usize>,
}

/// Stock search input
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub query: String,
    pub limit: Option<usize>,
}

/// Historical price input
#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<u32>,
}

/// Watchlist mutation input
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistRequest {
    pub stock_id: i64,
}

/// Saved screener creation input
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateScreenerRequest {
    pub name: String,
    pub description: Option<String>,
    /// Filter criteria, stored as JSON
    pub filters: serde_json::Value,
    #[serde(default)]
    pub is_public: bool,
}

/// Verified identity delivered by the external OAuth portal's callback
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallbackQuery {
    pub open_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub login_method: Option<String>,
}

/// Generic success acknowledgement
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}
