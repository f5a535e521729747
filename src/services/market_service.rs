//! Market data aggregation
//!
//! Shapes store rows into the ranked and filtered views the API serves.
//! Every read degrades to an empty result when the store is unconfigured or
//! errors; the screener predicate is a pure function over an
//! already-fetched candidate set.

use crate::db::models::{Ipo, MarketIndex, NewsArticle, Stock};
use crate::db::Database;
use crate::error::Result;
use crate::state::AppState;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, error};

/// Rows pulled from each side of the market when building the screener
/// candidate pool
const CANDIDATE_POOL: usize = 20;

/// Optional closed-interval bounds for the ad-hoc screener
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScreenerBounds {
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub min_change_percent: Option<Decimal>,
    pub max_change_percent: Option<Decimal>,
}

/// Market data service for ranked and filtered store views
pub struct MarketService;

impl MarketService {
    /// Top stocks by percent change, descending, truncated to `limit`
    pub fn top_gainers(state: &AppState, limit: usize) -> Vec<Stock> {
        Self::read_list(state, "top gainers", |db| db.top_gainers(limit))
    }

    /// Bottom stocks by percent change, ascending
    pub fn top_losers(state: &AppState, limit: usize) -> Vec<Stock> {
        Self::read_list(state, "top losers", |db| db.top_losers(limit))
    }

    /// Case-insensitive substring search over symbol or name
    pub fn search(state: &AppState, query: &str, limit: usize) -> Vec<Stock> {
        Self::read_list(state, "stock search", |db| db.search_stocks(query, limit))
    }

    pub fn get_stock(state: &AppState, symbol: &str) -> Option<Stock> {
        Self::read_optional(state, "stock lookup", |db| db.get_stock_by_symbol(symbol))
    }

    pub fn indices(state: &AppState) -> Vec<MarketIndex> {
        Self::read_list(state, "indices", |db| db.get_indices())
    }

    pub fn get_index(state: &AppState, symbol: &str) -> Option<MarketIndex> {
        Self::read_optional(state, "index lookup", |db| db.get_index_by_symbol(symbol))
    }

    pub fn latest_news(state: &AppState, limit: usize) -> Vec<NewsArticle> {
        Self::read_list(state, "news", |db| db.latest_news(limit))
    }

    pub fn upcoming_ipos(state: &AppState, limit: usize) -> Vec<Ipo> {
        Self::read_list(state, "upcoming IPOs", |db| db.upcoming_ipos(limit))
    }

    pub fn recent_ipos(state: &AppState, limit: usize) -> Vec<Ipo> {
        Self::read_list(state, "recent IPOs", |db| db.recent_ipos(limit))
    }

    /// Union of top gainers and losers, de-duplicated by symbol with the
    /// first occurrence winning
    pub fn screener_candidates(state: &AppState) -> Vec<Stock> {
        let gainers = Self::top_gainers(state, CANDIDATE_POOL);
        let losers = Self::top_losers(state, CANDIDATE_POOL);

        let mut seen = HashSet::new();
        gainers
            .into_iter()
            .chain(losers)
            .filter(|stock| seen.insert(stock.symbol.clone()))
            .collect()
    }

    fn read_list<T>(
        state: &AppState,
        what: &str,
        query: impl FnOnce(&Database) -> Result<Vec<T>>,
    ) -> Vec<T> {
        let Some(db) = &state.db else {
            debug!("Store not configured; returning empty {}", what);
            return vec![];
        };
        match query(db) {
            Ok(rows) => rows,
            Err(e) => {
                error!("Failed to read {}: {}", what, e);
                vec![]
            }
        }
    }

    fn read_optional<T>(
        state: &AppState,
        what: &str,
        query: impl FnOnce(&Database) -> Result<Option<T>>,
    ) -> Option<T> {
        let Some(db) = &state.db else {
            debug!("Store not configured; {} resolves to none", what);
            return None;
        };
        match query(db) {
            Ok(row) => row,
            Err(e) => {
                error!("Failed to read {}: {}", what, e);
                None
            }
        }
    }
}

/// Filter an already-fetched candidate set against the supplied bounds.
///
/// Each bound is optional; absence means unbounded on that side. Intervals
/// are closed, so a price exactly equal to `min_price` passes. With no
/// bounds the input comes back unchanged.
pub fn screener_filter(candidates: Vec<Stock>, bounds: &ScreenerBounds) -> Vec<Stock> {
    candidates
        .into_iter()
        .filter(|stock| {
            within(stock.price, bounds.min_price, bounds.max_price)
                && within(
                    stock.change_percent,
                    bounds.min_change_percent,
                    bounds.max_change_percent,
                )
        })
        .collect()
}

fn within(value: Decimal, min: Option<Decimal>, max: Option<Decimal>) -> bool {
    min.map_or(true, |m| value >= m) && max.map_or(true, |m| value <= m)
}
