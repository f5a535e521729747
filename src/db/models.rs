//! Persistent store row types

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// User role; a single configured owner identity is promoted to admin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    pub fn parse(value: &str) -> Self {
        match value {
            "admin" => Role::Admin,
            _ => Role::User,
        }
    }
}

/// User row backing the auth flow
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub open_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub login_method: Option<String>,
    pub role: Role,
    pub created_at: String,
    pub updated_at: String,
    pub last_signed_in: String,
}

/// Upsert input for the login path
#[derive(Debug, Clone, Default)]
pub struct UserUpsert {
    pub open_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub login_method: Option<String>,
    pub role: Option<Role>,
}

/// Cached stock row; monetary columns are fixed-point decimals
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stock {
    pub id: i64,
    pub symbol: String,
    pub name: String,
    pub price: Decimal,
    pub change: Decimal,
    pub change_percent: Decimal,
    pub volume: Option<String>,
    pub market_cap: Option<String>,
    pub pe_ratio: Option<Decimal>,
    pub dividend_yield: Option<Decimal>,
    pub last_updated: String,
    pub created_at: String,
}

/// Tracked market index row
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketIndex {
    pub id: i64,
    pub symbol: String,
    pub name: String,
    pub value: Decimal,
    pub change: Decimal,
    pub change_percent: Decimal,
    pub last_updated: String,
    pub created_at: String,
}

/// Watchlist membership row linking one user to one stock
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistEntry {
    pub id: i64,
    pub user_id: i64,
    pub stock_id: i64,
    pub added_at: String,
}

/// Watchlist entry joined with its stock
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistItem {
    pub entry: WatchlistEntry,
    pub stock: Stock,
}

/// Saved screener filter row
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Screener {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub description: Option<String>,
    /// JSON-encoded filter criteria
    pub filters: String,
    pub is_public: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Cached news article row
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsArticle {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub url: String,
    pub source: String,
    pub image_url: Option<String>,
    pub published_at: String,
    pub sentiment: String,
    pub created_at: String,
}

/// IPO lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IpoStatus {
    Upcoming,
    Recent,
    Completed,
}

impl IpoStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            IpoStatus::Upcoming => "upcoming",
            IpoStatus::Recent => "recent",
            IpoStatus::Completed => "completed",
        }
    }

    pub fn parse(value: &str) -> Self {
        match value {
            "recent" => IpoStatus::Recent,
            "completed" => IpoStatus::Completed,
            _ => IpoStatus::Upcoming,
        }
    }
}

/// IPO listing row
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ipo {
    pub id: i64,
    pub symbol: Option<String>,
    pub company_name: String,
    pub ipo_date: Option<String>,
    pub status: IpoStatus,
    pub pricing_date: Option<String>,
    pub offering_price: Option<Decimal>,
    pub shares: Option<String>,
    pub proceeds: Option<String>,
    pub underwriters: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Parse a TEXT decimal column; stored values are written by this crate so
/// a parse failure only means a hand-edited database
pub(crate) fn decimal_column(value: String) -> Decimal {
    Decimal::from_str(&value).unwrap_or_default()
}

/// Parse a nullable TEXT decimal column
pub(crate) fn optional_decimal_column(value: Option<String>) -> Option<Decimal> {
    value.and_then(|v| Decimal::from_str(&v).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips() {
        assert_eq!(Role::parse("admin"), Role::Admin);
        assert_eq!(Role::parse("user"), Role::User);
        assert_eq!(Role::parse("garbage"), Role::User);
        assert_eq!(Role::Admin.as_str(), "admin");
    }

    #[test]
    fn decimal_columns_preserve_scale() {
        assert_eq!(decimal_column("150.00".to_string()).to_string(), "150.00");
        assert_eq!(decimal_column("-2.50".to_string()).to_string(), "-2.50");
        assert_eq!(
            optional_decimal_column(Some("1.69".to_string()))
                .unwrap()
                .to_string(),
            "1.69"
        );
        assert!(optional_decimal_column(None).is_none());
    }
}
