//! Market data ingestion
//!
//! Pulls the current movers and index quotes from the upstream provider and
//! refreshes the cached store rows. Triggered by the admin refresh
//! procedure; a missing store or provider degrades to a zero-count no-op.

use crate::db::{IndexUpsert, StockUpsert};
use crate::fmp::types::{IndexQuote, Quote};
use crate::state::AppState;
use serde::Serialize;
use std::collections::HashSet;
use tracing::{error, info, warn};

/// Counts of rows refreshed in one ingestion pass
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshSummary {
    pub stocks: usize,
    pub indices: usize,
}

/// Ingestion service feeding the cached stock/index tables
pub struct RefreshService;

impl RefreshService {
    /// Refresh cached stocks from the movers lists and cached indices from
    /// the tracked index set
    pub async fn refresh_market_data(state: &AppState) -> RefreshSummary {
        let Some(db) = &state.db else {
            warn!("Store not configured; skipping market data refresh");
            return RefreshSummary::default();
        };

        let mut summary = RefreshSummary::default();

        let gainers = state.quotes.get_top_gainers().await;
        let losers = state.quotes.get_top_losers().await;

        let mut seen = HashSet::new();
        for quote in gainers.into_iter().chain(losers) {
            if !seen.insert(quote.symbol.clone()) {
                continue;
            }
            match db.upsert_stock(&stock_upsert(&quote)) {
                Ok(_) => summary.stocks += 1,
                Err(e) => error!("Failed to refresh stock {}: {}", quote.symbol, e),
            }
        }

        for index in state.quotes.get_market_indices().await {
            match db.upsert_index(&index_upsert(&index)) {
                Ok(_) => summary.indices += 1,
                Err(e) => error!("Failed to refresh index {}: {}", index.symbol, e),
            }
        }

        info!(
            "Market data refresh complete: {} stocks, {} indices",
            summary.stocks, summary.indices
        );
        summary
    }
}

fn stock_upsert(quote: &Quote) -> StockUpsert {
    StockUpsert {
        symbol: quote.symbol.clone(),
        name: quote.name.clone(),
        price: quote.price,
        change: quote.change,
        change_percent: quote.change_percent,
        volume: Some(quote.volume.to_string()),
        market_cap: Some(quote.market_cap.to_string()),
        pe_ratio: quote.pe_ratio,
        dividend_yield: None,
    }
}

fn index_upsert(index: &IndexQuote) -> IndexUpsert {
    IndexUpsert {
        symbol: index.symbol.clone(),
        name: index.name.clone(),
        value: index.value,
        change: index.change,
        change_percent: index.change_percent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::db::Database;
    use crate::fmp::types::{CompanyProfile, PricePoint};
    use crate::fmp::QuoteSource;
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use std::sync::Arc;

    /// Canned quote source standing in for the upstream provider
    struct StubSource;

    fn quote(symbol: &str, change_percent: &str) -> Quote {
        Quote {
            symbol: symbol.to_string(),
            name: format!("{} Inc.", symbol),
            price: Decimal::from_str("100.00").unwrap(),
            change: Decimal::from_str("1.00").unwrap(),
            change_percent: Decimal::from_str(change_percent).unwrap(),
            volume: 1_000,
            market_cap: 1_000_000,
            pe_ratio: None,
        }
    }

    #[async_trait]
    impl QuoteSource for StubSource {
        async fn get_quote(&self, _symbol: &str) -> Option<Quote> {
            None
        }

        async fn get_quotes(&self, _symbols: &[String]) -> Vec<Quote> {
            vec![]
        }

        async fn get_top_gainers(&self) -> Vec<Quote> {
            vec![quote("UPPP", "8.00"), quote("BOTH", "4.00")]
        }

        async fn get_top_losers(&self) -> Vec<Quote> {
            vec![quote("DOWN", "-6.00"), quote("BOTH", "4.00")]
        }

        async fn get_market_indices(&self) -> Vec<IndexQuote> {
            vec![IndexQuote {
                symbol: "^GSPC".to_string(),
                name: "S&P 500".to_string(),
                value: Decimal::from_str("5123.41").unwrap(),
                change: Decimal::from_str("-12.30").unwrap(),
                change_percent: Decimal::from_str("-0.24").unwrap(),
            }]
        }

        async fn search(&self, _query: &str) -> Vec<Quote> {
            vec![]
        }

        async fn get_company_profile(&self, _symbol: &str) -> Option<CompanyProfile> {
            None
        }

        async fn get_historical_prices(&self, _symbol: &str, _limit: u32) -> Vec<PricePoint> {
            vec![]
        }
    }

    fn test_config() -> AppConfig {
        AppConfig {
            database_path: None,
            fmp_api_key: None,
            owner_open_id: None,
            host: "127.0.0.1".to_string(),
            port: 0,
        }
    }

    #[tokio::test]
    async fn refresh_upserts_movers_and_indices() {
        let state = AppState::new(
            test_config(),
            Some(Arc::new(Database::open_in_memory().unwrap())),
            Arc::new(StubSource),
        );

        let summary = RefreshService::refresh_market_data(&state).await;
        // BOTH appears in gainers and losers but is ingested once
        assert_eq!(summary.stocks, 3);
        assert_eq!(summary.indices, 1);

        let db = state.db.as_ref().unwrap();
        let stock = db.get_stock_by_symbol("UPPP").unwrap().unwrap();
        assert_eq!(stock.change_percent.to_string(), "8.00");
        assert_eq!(stock.volume.as_deref(), Some("1000"));

        let index = db.get_index_by_symbol("^GSPC").unwrap().unwrap();
        assert_eq!(index.name, "S&P 500");

        // A second pass refreshes in place
        let summary = RefreshService::refresh_market_data(&state).await;
        assert_eq!(summary.stocks, 3);
        let count: usize = db.top_gainers(50).unwrap().len();
        assert_eq!(count, 3);
    }

    #[tokio::test]
    async fn storeless_refresh_is_a_counted_no_op() {
        let state = AppState::new(test_config(), None, Arc::new(StubSource));
        let summary = RefreshService::refresh_market_data(&state).await;
        assert_eq!(summary.stocks, 0);
        assert_eq!(summary.indices, 0);
    }
}
