//! Cached stock queries
//!
//! Decimal columns are stored as TEXT; ranked queries cast to REAL for
//! comparison only, so stored values never lose their fixed-point form.

use crate::db::models::{decimal_column, optional_decimal_column, Stock};
use crate::error::Result;
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;

/// Upsert input for the ingestion path
#[derive(Debug, Clone)]
pub struct StockUpsert {
    pub symbol: String,
    pub name: String,
    pub price: Decimal,
    pub change: Decimal,
    pub change_percent: Decimal,
    pub volume: Option<String>,
    pub market_cap: Option<String>,
    pub pe_ratio: Option<Decimal>,
    pub dividend_yield: Option<Decimal>,
}

/// Look up a stock by ticker symbol
pub fn get_by_symbol(conn: &Connection, symbol: &str) -> Result<Option<Stock>> {
    let stock = conn
        .query_row(
            &format!("{} WHERE symbol = ?1", SELECT_STOCK),
            params![symbol],
            map_stock_row,
        )
        .optional()?;
    Ok(stock)
}

/// Top stocks by percent change, descending; ties stay in insertion order
pub fn top_gainers(conn: &Connection, limit: usize) -> Result<Vec<Stock>> {
    ranked(conn, "DESC", limit)
}

/// Bottom stocks by percent change, ascending
pub fn top_losers(conn: &Connection, limit: usize) -> Result<Vec<Stock>> {
    ranked(conn, "ASC", limit)
}

fn ranked(conn: &Connection, direction: &str, limit: usize) -> Result<Vec<Stock>> {
    let sql = format!(
        "{} ORDER BY CAST(change_percent AS REAL) {}, id ASC LIMIT ?1",
        SELECT_STOCK, direction
    );
    let mut stmt = conn.prepare(&sql)?;
    let stocks = stmt
        .query_map(params![limit as i64], map_stock_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(stocks)
}

/// Case-insensitive substring search over symbol or name
pub fn search(conn: &Connection, query: &str, limit: usize) -> Result<Vec<Stock>> {
    let sql = format!(
        "{} WHERE symbol LIKE '%' || ?1 || '%' OR name LIKE '%' || ?1 || '%' \
         ORDER BY id ASC LIMIT ?2",
        SELECT_STOCK
    );
    let mut stmt = conn.prepare(&sql)?;
    let stocks = stmt
        .query_map(params![query, limit as i64], map_stock_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(stocks)
}

/// Insert or refresh a cached stock keyed on its symbol
pub fn upsert_stock(conn: &Connection, stock: &StockUpsert) -> Result<Stock> {
    conn.execute(
        r#"
        INSERT INTO stocks (symbol, name, price, change, change_percent,
                            volume, market_cap, pe_ratio, dividend_yield)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
        ON CONFLICT(symbol) DO UPDATE SET
            name = excluded.name,
            price = excluded.price,
            change = excluded.change,
            change_percent = excluded.change_percent,
            volume = excluded.volume,
            market_cap = excluded.market_cap,
            pe_ratio = excluded.pe_ratio,
            dividend_yield = excluded.dividend_yield,
            last_updated = datetime('now')
        "#,
        params![
            stock.symbol,
            stock.name,
            stock.price.to_string(),
            stock.change.to_string(),
            stock.change_percent.to_string(),
            stock.volume,
            stock.market_cap,
            stock.pe_ratio.map(|d| d.to_string()),
            stock.dividend_yield.map(|d| d.to_string()),
        ],
    )?;

    get_by_symbol(conn, &stock.symbol)?.ok_or_else(|| {
        crate::error::AppError::Internal("stock vanished after upsert".to_string())
    })
}

const SELECT_STOCK: &str = "SELECT id, symbol, name, price, change, change_percent, volume, \
     market_cap, pe_ratio, dividend_yield, last_updated, created_at FROM stocks";

pub(crate) fn map_stock_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Stock> {
    Ok(Stock {
        id: row.get(0)?,
        symbol: row.get(1)?,
        name: row.get(2)?,
        price: decimal_column(row.get(3)?),
        change: decimal_column(row.get(4)?),
        change_percent: decimal_column(row.get(5)?),
        volume: row.get(6)?,
        market_cap: row.get(7)?,
        pe_ratio: optional_decimal_column(row.get(8)?),
        dividend_yield: optional_decimal_column(row.get(9)?),
        last_updated: row.get(10)?,
        created_at: row.get(11)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations;
    use std::str::FromStr;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys=ON;").unwrap();
        migrations::run_migrations(&conn).unwrap();
        conn
    }

    fn sample(symbol: &str, price: &str, change_percent: &str) -> StockUpsert {
        StockUpsert {
            symbol: symbol.to_string(),
            name: format!("{} Inc.", symbol),
            price: Decimal::from_str(price).unwrap(),
            change: Decimal::from_str("2.50").unwrap(),
            change_percent: Decimal::from_str(change_percent).unwrap(),
            volume: Some("1000000".to_string()),
            market_cap: Some("500000000".to_string()),
            pe_ratio: None,
            dividend_yield: None,
        }
    }

    #[test]
    fn decimal_strings_round_trip_exactly() {
        let conn = test_conn();
        upsert_stock(&conn, &sample("AAPL", "150.00", "1.69")).unwrap();

        let stock = get_by_symbol(&conn, "AAPL").unwrap().unwrap();
        assert_eq!(stock.price.to_string(), "150.00");
        assert_eq!(stock.change.to_string(), "2.50");
        assert_eq!(stock.change_percent.to_string(), "1.69");
    }

    #[test]
    fn upsert_refreshes_instead_of_duplicating() {
        let conn = test_conn();
        upsert_stock(&conn, &sample("AAPL", "150.00", "1.69")).unwrap();
        upsert_stock(&conn, &sample("AAPL", "152.25", "3.20")).unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM stocks", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
        let stock = get_by_symbol(&conn, "AAPL").unwrap().unwrap();
        assert_eq!(stock.price.to_string(), "152.25");
    }

    #[test]
    fn gainers_are_descending_and_losers_ascending() {
        let conn = test_conn();
        upsert_stock(&conn, &sample("AAA", "10.00", "1.00")).unwrap();
        upsert_stock(&conn, &sample("BBB", "10.00", "5.00")).unwrap();
        upsert_stock(&conn, &sample("CCC", "10.00", "-3.00")).unwrap();

        let gainers = top_gainers(&conn, 10).unwrap();
        let symbols: Vec<&str> = gainers.iter().map(|s| s.symbol.as_str()).collect();
        assert_eq!(symbols, ["BBB", "AAA", "CCC"]);

        let losers = top_losers(&conn, 10).unwrap();
        let symbols: Vec<&str> = losers.iter().map(|s| s.symbol.as_str()).collect();
        assert_eq!(symbols, ["CCC", "AAA", "BBB"]);
    }

    #[test]
    fn ranking_ties_keep_insertion_order() {
        let conn = test_conn();
        upsert_stock(&conn, &sample("OLD", "10.00", "2.00")).unwrap();
        upsert_stock(&conn, &sample("NEW", "10.00", "2.00")).unwrap();

        let gainers = top_gainers(&conn, 10).unwrap();
        let symbols: Vec<&str> = gainers.iter().map(|s| s.symbol.as_str()).collect();
        assert_eq!(symbols, ["OLD", "NEW"]);
    }

    #[test]
    fn ranking_respects_limit() {
        let conn = test_conn();
        for (i, symbol) in ["AAA", "BBB", "CCC", "DDD"].iter().enumerate() {
            upsert_stock(&conn, &sample(symbol, "10.00", &format!("{}.00", i))).unwrap();
        }
        assert_eq!(top_gainers(&conn, 2).unwrap().len(), 2);
        assert_eq!(top_gainers(&conn, 0).unwrap().len(), 0);
    }

    #[test]
    fn search_matches_symbol_or_name_case_insensitively() {
        let conn = test_conn();
        upsert_stock(&conn, &sample("AAPL", "150.00", "1.69")).unwrap();
        upsert_stock(&conn, &sample("MSFT", "410.00", "0.50")).unwrap();

        let by_symbol = search(&conn, "aap", 20).unwrap();
        assert_eq!(by_symbol.len(), 1);
        assert_eq!(by_symbol[0].symbol, "AAPL");

        // name is "MSFT Inc."
        let by_name = search(&conn, "inc", 20).unwrap();
        assert_eq!(by_name.len(), 2);

        assert!(search(&conn, "zzz", 20).unwrap().is_empty());
    }
}
