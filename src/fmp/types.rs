//! FMP payload types and boundary conversion
//!
//! Raw structs mirror the provider's JSON shape and tolerate missing fields
//! via `#[serde(default)]`. The `map_*` functions are the only place raw
//! payloads become internal types: missing numeric fields map to decimal
//! zero, and every monetary/percent value is rescaled to two fixed decimal
//! places so nothing downstream ever sees a binary float.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Market index symbols fetched by `get_market_indices`
pub const INDEX_SYMBOLS: [&str; 4] = ["^GSPC", "^IXIC", "^DJI", "^RUT"];

// ============================================================================
// Raw FMP Response Types
// ============================================================================

/// Quote entry from the /quote endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct FmpQuote {
    pub symbol: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub change: f64,
    #[serde(rename = "changesPercentage", default)]
    pub changes_percentage: f64,
    #[serde(default)]
    pub volume: i64,
    #[serde(rename = "marketCap", default)]
    pub market_cap: f64,
    #[serde(default)]
    pub pe: Option<f64>,
    #[serde(default)]
    pub timestamp: i64,
}

/// Lightweight match from the /search endpoint (no live quote data)
#[derive(Debug, Clone, Deserialize)]
pub struct FmpSearchMatch {
    pub symbol: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "stockExchange", default)]
    pub stock_exchange: Option<String>,
}

/// Company profile entry from the /profile endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct FmpProfile {
    pub symbol: String,
    #[serde(rename = "companyName", default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub exchange: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub ceo: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

/// Wrapper from the /historical-price-full endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct FmpHistoricalResponse {
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub historical: Option<Vec<FmpPricePoint>>,
}

/// Daily bar from the /historical-price-full endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct FmpPricePoint {
    pub date: String,
    #[serde(default)]
    pub open: f64,
    #[serde(default)]
    pub high: f64,
    #[serde(default)]
    pub low: f64,
    #[serde(default)]
    pub close: f64,
    #[serde(default)]
    pub volume: i64,
}

// ============================================================================
// Normalized Types
// ============================================================================

/// Normalized stock quote
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub symbol: String,
    pub name: String,
    pub price: Decimal,
    pub change: Decimal,
    pub change_percent: Decimal,
    pub volume: i64,
    pub market_cap: i64,
    pub pe_ratio: Option<Decimal>,
}

/// Normalized market index quote
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexQuote {
    pub symbol: String,
    pub name: String,
    pub value: Decimal,
    pub change: Decimal,
    pub change_percent: Decimal,
}

/// Normalized company profile
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfile {
    pub symbol: String,
    pub company_name: String,
    pub price: Decimal,
    pub exchange: Option<String>,
    pub industry: Option<String>,
    pub sector: Option<String>,
    pub website: Option<String>,
    pub description: Option<String>,
    pub ceo: Option<String>,
    pub image: Option<String>,
}

/// Normalized daily price bar
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricePoint {
    pub date: String,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: i64,
}

// ============================================================================
// Boundary Conversion
// ============================================================================

/// Convert an upstream float to a scale-2 decimal ("150.00", "0.00")
pub fn to_money(value: f64) -> Decimal {
    let mut d = Decimal::from_f64_retain(value)
        .unwrap_or_default()
        .round_dp(2);
    d.rescale(2);
    d
}

/// Human-readable name for an index symbol; unknown symbols pass through
pub fn index_display_name(symbol: &str) -> &str {
    match symbol {
        "^GSPC" => "S&P 500",
        "^IXIC" => "Nasdaq Composite",
        "^DJI" => "Dow Jones",
        "^RUT" => "Russell 2000",
        other => other,
    }
}

/// Map a raw quote into the normalized shape
pub fn map_quote(raw: FmpQuote) -> Quote {
    let name = raw.name.unwrap_or_else(|| raw.symbol.clone());
    Quote {
        symbol: raw.symbol,
        name,
        price: to_money(raw.price),
        change: to_money(raw.change),
        change_percent: to_money(raw.changes_percentage),
        volume: raw.volume,
        market_cap: raw.market_cap as i64,
        pe_ratio: raw.pe.map(to_money),
    }
}

/// Map a raw quote for a tracked index into an index quote
pub fn map_index_quote(raw: FmpQuote) -> IndexQuote {
    let name = index_display_name(&raw.symbol).to_string();
    IndexQuote {
        symbol: raw.symbol,
        name,
        value: to_money(raw.price),
        change: to_money(raw.change),
        change_percent: to_money(raw.changes_percentage),
    }
}

/// Map a raw company profile into the normalized shape
pub fn map_profile(raw: FmpProfile) -> CompanyProfile {
    let company_name = raw.company_name.unwrap_or_else(|| raw.symbol.clone());
    CompanyProfile {
        symbol: raw.symbol,
        company_name,
        price: to_money(raw.price),
        exchange: raw.exchange,
        industry: raw.industry,
        sector: raw.sector,
        website: raw.website,
        description: raw.description,
        ceo: raw.ceo,
        image: raw.image,
    }
}

/// Map a raw daily bar into the normalized shape
pub fn map_price_point(raw: FmpPricePoint) -> PricePoint {
    PricePoint {
        date: raw.date,
        open: to_money(raw.open),
        high: to_money(raw.high),
        low: to_money(raw.low),
        close: to_money(raw.close),
        volume: raw.volume,
    }
}
