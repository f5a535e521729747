//! Tracked market index queries

use crate::db::models::{decimal_column, MarketIndex};
use crate::error::Result;
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;

/// Upsert input for the ingestion path
#[derive(Debug, Clone)]
pub struct IndexUpsert {
    pub symbol: String,
    pub name: String,
    pub value: Decimal,
    pub change: Decimal,
    pub change_percent: Decimal,
}

/// All tracked indices in insertion order
pub fn get_all(conn: &Connection) -> Result<Vec<MarketIndex>> {
    let sql = format!("{} ORDER BY id ASC", SELECT_INDEX);
    let mut stmt = conn.prepare(&sql)?;
    let indices = stmt
        .query_map([], map_index_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(indices)
}

/// Look up an index by symbol
pub fn get_by_symbol(conn: &Connection, symbol: &str) -> Result<Option<MarketIndex>> {
    let index = conn
        .query_row(
            &format!("{} WHERE symbol = ?1", SELECT_INDEX),
            params![symbol],
            map_index_row,
        )
        .optional()?;
    Ok(index)
}

/// Insert or refresh a tracked index keyed on its symbol
pub fn upsert_index(conn: &Connection, index: &IndexUpsert) -> Result<MarketIndex> {
    conn.execute(
        r#"
        INSERT INTO indices (symbol, name, value, change, change_percent)
        VALUES (?1, ?2, ?3, ?4, ?5)
        ON CONFLICT(symbol) DO UPDATE SET
            name = excluded.name,
            value = excluded.value,
            change = excluded.change,
            change_percent = excluded.change_percent,
            last_updated = datetime('now')
        "#,
        params![
            index.symbol,
            index.name,
            index.value.to_string(),
            index.change.to_string(),
            index.change_percent.to_string(),
        ],
    )?;

    get_by_symbol(conn, &index.symbol)?.ok_or_else(|| {
        crate::error::AppError::Internal("index vanished after upsert".to_string())
    })
}

const SELECT_INDEX: &str = "SELECT id, symbol, name, value, change, change_percent, \
     last_updated, created_at FROM indices";

fn map_index_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<MarketIndex> {
    Ok(MarketIndex {
        id: row.get(0)?,
        symbol: row.get(1)?,
        name: row.get(2)?,
        value: decimal_column(row.get(3)?),
        change: decimal_column(row.get(4)?),
        change_percent: decimal_column(row.get(5)?),
        last_updated: row.get(6)?,
        created_at: row.get(7)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations;
    use std::str::FromStr;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        migrations::run_migrations(&conn).unwrap();
        conn
    }

    fn sample(symbol: &str, name: &str, value: &str) -> IndexUpsert {
        IndexUpsert {
            symbol: symbol.to_string(),
            name: name.to_string(),
            value: Decimal::from_str(value).unwrap(),
            change: Decimal::from_str("-12.30").unwrap(),
            change_percent: Decimal::from_str("-0.24").unwrap(),
        }
    }

    #[test]
    fn upsert_and_lookup_round_trip() {
        let conn = test_conn();
        upsert_index(&conn, &sample("^GSPC", "S&P 500", "5123.41")).unwrap();

        let index = get_by_symbol(&conn, "^GSPC").unwrap().unwrap();
        assert_eq!(index.name, "S&P 500");
        assert_eq!(index.value.to_string(), "5123.41");
        assert_eq!(index.change.to_string(), "-12.30");

        assert!(get_by_symbol(&conn, "^MISSING").unwrap().is_none());
    }

    #[test]
    fn get_all_returns_insertion_order() {
        let conn = test_conn();
        upsert_index(&conn, &sample("^GSPC", "S&P 500", "5123.41")).unwrap();
        upsert_index(&conn, &sample("^IXIC", "Nasdaq Composite", "16201.77")).unwrap();
        // Refresh of the first must not reorder
        upsert_index(&conn, &sample("^GSPC", "S&P 500", "5130.00")).unwrap();

        let all = get_all(&conn).unwrap();
        let symbols: Vec<&str> = all.iter().map(|i| i.symbol.as_str()).collect();
        assert_eq!(symbols, ["^GSPC", "^IXIC"]);
    }
}
