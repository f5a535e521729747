//! Business logic services
//!
//! Services sit between the API boundary and the store/adapter layers:
//! aggregation shapes ranked views, the watchlist service enforces per-user
//! ownership, and the refresh service feeds the cached market tables.

pub mod market_service;
pub mod refresh_service;
pub mod watchlist_service;

pub use market_service::{screener_filter, MarketService, ScreenerBounds};
pub use refresh_service::{RefreshService, RefreshSummary};
pub use watchlist_service::WatchlistService;
