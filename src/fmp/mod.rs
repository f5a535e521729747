//! Quote source adapter for the FMP market-data API
//!
//! Every operation degrades on expected failures: a missing API key, a
//! non-success response, a malformed payload, or a network error logs and
//! returns `None`/empty so callers render an empty state instead of failing
//! the request.

pub mod types;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use tracing::{error, warn};
use types::*;

const BASE_URL: &str = "https://financialmodelingprep.com/api/v3";

/// Cap on gainers/losers rows returned upstream-side, independent of the
/// caller-requested limit
const MOVERS_CAP: usize = 20;

/// How many search matches get a full quote fetch
const SEARCH_QUOTE_LIMIT: usize = 10;

/// Upstream quote source seam; services and tests depend on this trait
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Fetch a single real-time quote
    async fn get_quote(&self, symbol: &str) -> Option<Quote>;

    /// Fetch quotes for multiple symbols in one call
    async fn get_quotes(&self, symbols: &[String]) -> Vec<Quote>;

    /// Top gaining stocks, capped at 20
    async fn get_top_gainers(&self) -> Vec<Quote>;

    /// Top losing stocks, capped at 20
    async fn get_top_losers(&self) -> Vec<Quote>;

    /// Quotes for the fixed set of tracked market indices
    async fn get_market_indices(&self) -> Vec<IndexQuote>;

    /// Search stocks by query, returning full quotes in relevance order
    async fn search(&self, query: &str) -> Vec<Quote>;

    /// Company profile lookup
    async fn get_company_profile(&self, symbol: &str) -> Option<CompanyProfile>;

    /// Historical daily prices, most recent first
    async fn get_historical_prices(&self, symbol: &str, limit: u32) -> Vec<PricePoint>;
}

/// FMP REST client; stateless between calls
pub struct FmpClient {
    client: reqwest::Client,
    api_key: Option<String>,
}

impl FmpClient {
    pub fn new(api_key: Option<String>) -> Self {
        if api_key.is_none() {
            warn!("FMP API key not configured; market data will be empty");
        }
        Self {
            client: reqwest::Client::new(),
            api_key,
        }
    }

    /// GET a JSON payload from the API, degrading to None on any failure
    async fn fetch_json<T: DeserializeOwned>(&self, path_and_query: &str, what: &str) -> Option<T> {
        let api_key = match &self.api_key {
            Some(key) => key,
            None => {
                warn!("FMP API key not configured; skipping {}", what);
                return None;
            }
        };

        let separator = if path_and_query.contains('?') { '&' } else { '?' };
        let url = format!(
            "{}/{}{}apikey={}",
            BASE_URL, path_and_query, separator, api_key
        );

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                error!("Error fetching {}: {}", what, e);
                return None;
            }
        };

        if !response.status().is_success() {
            error!("Failed to fetch {}: {}", what, response.status());
            return None;
        }

        match response.json::<T>().await {
            Ok(payload) => Some(payload),
            Err(e) => {
                error!("Failed to decode {} response: {}", what, e);
                None
            }
        }
    }
}

#[async_trait]
impl QuoteSource for FmpClient {
    async fn get_quote(&self, symbol: &str) -> Option<Quote> {
        let path = format!("quote/{}", urlencoding::encode(symbol));
        let quotes: Vec<FmpQuote> = self.fetch_json(&path, "quote").await?;
        quotes.into_iter().next().map(map_quote)
    }

    async fn get_quotes(&self, symbols: &[String]) -> Vec<Quote> {
        if symbols.is_empty() {
            return vec![];
        }

        let joined = symbols.join(",");
        let path = format!("quote/{}", urlencoding::encode(&joined));
        let quotes: Vec<FmpQuote> = self.fetch_json(&path, "quotes").await.unwrap_or_default();
        quotes.into_iter().map(map_quote).collect()
    }

    async fn get_top_gainers(&self) -> Vec<Quote> {
        let quotes: Vec<FmpQuote> = self
            .fetch_json("gainers", "top gainers")
            .await
            .unwrap_or_default();
        quotes
            .into_iter()
            .take(MOVERS_CAP)
            .map(map_quote)
            .collect()
    }

    async fn get_top_losers(&self) -> Vec<Quote> {
        let quotes: Vec<FmpQuote> = self
            .fetch_json("losers", "top losers")
            .await
            .unwrap_or_default();
        quotes
            .into_iter()
            .take(MOVERS_CAP)
            .map(map_quote)
            .collect()
    }

    async fn get_market_indices(&self) -> Vec<IndexQuote> {
        let joined = INDEX_SYMBOLS.join(",");
        let path = format!("quote/{}", urlencoding::encode(&joined));
        let quotes: Vec<FmpQuote> = self
            .fetch_json(&path, "market indices")
            .await
            .unwrap_or_default();
        quotes.into_iter().map(map_index_quote).collect()
    }

    async fn search(&self, query: &str) -> Vec<Quote> {
        let path = format!("search?query={}&limit=20", urlencoding::encode(query));
        let matches: Vec<FmpSearchMatch> =
            self.fetch_json(&path, "search").await.unwrap_or_default();
        if matches.is_empty() {
            return vec![];
        }

        // The search endpoint returns matches without quote data; fetch full
        // quotes for the top matches and keep the relevance order, since the
        // batched quote endpoint does not guarantee ordering.
        let symbols: Vec<String> = matches
            .into_iter()
            .take(SEARCH_QUOTE_LIMIT)
            .map(|m| m.symbol)
            .collect();
        let rank: HashMap<&str, usize> = symbols
            .iter()
            .enumerate()
            .map(|(i, s)| (s.as_str(), i))
            .collect();

        let mut quotes = self.get_quotes(&symbols).await;
        quotes.sort_by_key(|q| rank.get(q.symbol.as_str()).copied().unwrap_or(usize::MAX));
        quotes
    }

    async fn get_company_profile(&self, symbol: &str) -> Option<CompanyProfile> {
        let path = format!("profile/{}", urlencoding::encode(symbol));
        let profiles: Vec<FmpProfile> = self.fetch_json(&path, "company profile").await?;
        profiles.into_iter().next().map(map_profile)
    }

    async fn get_historical_prices(&self, symbol: &str, limit: u32) -> Vec<PricePoint> {
        let path = format!(
            "historical-price-full/{}?limit={}",
            urlencoding::encode(symbol),
            limit
        );
        let response: Option<FmpHistoricalResponse> =
            self.fetch_json(&path, "historical prices").await;
        response
            .and_then(|r| r.historical)
            .unwrap_or_default()
            .into_iter()
            .map(map_price_point)
            .collect()
    }
}
