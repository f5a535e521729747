//! Per-user watchlist membership
//!
//! Every operation is scoped to the owning user. The (user_id, stock_id)
//! pair is unique in the schema, so a repeated add cannot create a visible
//! duplicate and concurrent adds collapse into one row.

use crate::db::models::{
    decimal_column, optional_decimal_column, Stock, WatchlistEntry, WatchlistItem,
};
use crate::error::{AppError, Result};
use rusqlite::{params, Connection, OptionalExtension};

/// The calling user's watchlist joined with stock rows, oldest first
pub fn list_for_user(conn: &Connection, user_id: i64) -> Result<Vec<WatchlistItem>> {
    let mut stmt = conn.prepare(
        "SELECT w.id, w.user_id, w.stock_id, w.added_at, \
                s.id, s.symbol, s.name, s.price, s.change, s.change_percent, s.volume, \
                s.market_cap, s.pe_ratio, s.dividend_yield, s.last_updated, s.created_at \
         FROM watchlist w \
         INNER JOIN stocks s ON s.id = w.stock_id \
         WHERE w.user_id = ?1 \
         ORDER BY w.id ASC",
    )?;

    let items = stmt
        .query_map(params![user_id], |row| {
            Ok(WatchlistItem {
                entry: WatchlistEntry {
                    id: row.get(0)?,
                    user_id: row.get(1)?,
                    stock_id: row.get(2)?,
                    added_at: row.get(3)?,
                },
                stock: Stock {
                    id: row.get(4)?,
                    symbol: row.get(5)?,
                    name: row.get(6)?,
                    price: decimal_column(row.get(7)?),
                    change: decimal_column(row.get(8)?),
                    change_percent: decimal_column(row.get(9)?),
                    volume: row.get(10)?,
                    market_cap: row.get(11)?,
                    pe_ratio: optional_decimal_column(row.get(12)?),
                    dividend_yield: optional_decimal_column(row.get(13)?),
                    last_updated: row.get(14)?,
                    created_at: row.get(15)?,
                },
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(items)
}

/// Add a stock to the user's watchlist; idempotent for an existing pair
pub fn add(conn: &Connection, user_id: i64, stock_id: i64) -> Result<WatchlistEntry> {
    let stock_exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM stocks WHERE id = ?1)",
        params![stock_id],
        |row| row.get(0),
    )?;
    if !stock_exists {
        return Err(AppError::NotFound(format!("stock {} not found", stock_id)));
    }

    conn.execute(
        "INSERT OR IGNORE INTO watchlist (user_id, stock_id) VALUES (?1, ?2)",
        params![user_id, stock_id],
    )?;

    get_entry(conn, user_id, stock_id)?
        .ok_or_else(|| AppError::Internal("watchlist entry vanished after insert".to_string()))
}

/// Remove a stock from the user's watchlist; absent pairs are a no-op
pub fn remove(conn: &Connection, user_id: i64, stock_id: i64) -> Result<()> {
    conn.execute(
        "DELETE FROM watchlist WHERE user_id = ?1 AND stock_id = ?2",
        params![user_id, stock_id],
    )?;
    Ok(())
}

fn get_entry(conn: &Connection, user_id: i64, stock_id: i64) -> Result<Option<WatchlistEntry>> {
    let entry = conn
        .query_row(
            "SELECT id, user_id, stock_id, added_at FROM watchlist \
             WHERE user_id = ?1 AND stock_id = ?2",
            params![user_id, stock_id],
            |row| {
                Ok(WatchlistEntry {
                    id: row.get(0)?,
                    user_id: row.get(1)?,
                    stock_id: row.get(2)?,
                    added_at: row.get(3)?,
                })
            },
        )
        .optional()?;
    Ok(entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations;
    use crate::db::models::UserUpsert;
    use crate::db::stocks::{self, StockUpsert};
    use crate::db::users;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys=ON;").unwrap();
        migrations::run_migrations(&conn).unwrap();
        conn
    }

    fn make_user(conn: &Connection, open_id: &str) -> i64 {
        users::upsert_user(
            conn,
            &UserUpsert {
                open_id: open_id.to_string(),
                ..Default::default()
            },
            None,
        )
        .unwrap()
        .id
    }

    fn make_stock(conn: &Connection, symbol: &str) -> i64 {
        stocks::upsert_stock(
            conn,
            &StockUpsert {
                symbol: symbol.to_string(),
                name: format!("{} Inc.", symbol),
                price: Decimal::from_str("10.00").unwrap(),
                change: Decimal::from_str("0.10").unwrap(),
                change_percent: Decimal::from_str("1.00").unwrap(),
                volume: None,
                market_cap: None,
                pe_ratio: None,
                dividend_yield: None,
            },
        )
        .unwrap()
        .id
    }

    #[test]
    fn add_then_list_returns_the_joined_stock() {
        let conn = test_conn();
        let user = make_user(&conn, "u1");
        let stock = make_stock(&conn, "AAPL");

        let entry = add(&conn, user, stock).unwrap();
        assert_eq!(entry.user_id, user);
        assert_eq!(entry.stock_id, stock);

        let items = list_for_user(&conn, user).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].stock.symbol, "AAPL");
    }

    #[test]
    fn double_add_leaves_exactly_one_row() {
        let conn = test_conn();
        let user = make_user(&conn, "u1");
        let stock = make_stock(&conn, "AAPL");

        let first = add(&conn, user, stock).unwrap();
        let second = add(&conn, user, stock).unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(list_for_user(&conn, user).unwrap().len(), 1);
    }

    #[test]
    fn add_for_missing_stock_fails_without_orphan_row() {
        let conn = test_conn();
        let user = make_user(&conn, "u1");

        let result = add(&conn, user, 999_999);
        assert!(matches!(result, Err(AppError::NotFound(_))));

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM watchlist", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn double_remove_is_a_no_op() {
        let conn = test_conn();
        let user = make_user(&conn, "u1");
        let stock = make_stock(&conn, "AAPL");
        add(&conn, user, stock).unwrap();

        remove(&conn, user, stock).unwrap();
        remove(&conn, user, stock).unwrap();
        assert!(list_for_user(&conn, user).unwrap().is_empty());
    }

    #[test]
    fn users_are_isolated() {
        let conn = test_conn();
        let alice = make_user(&conn, "alice");
        let bob = make_user(&conn, "bob");
        let stock = make_stock(&conn, "AAPL");

        add(&conn, alice, stock).unwrap();
        assert!(list_for_user(&conn, bob).unwrap().is_empty());

        // Bob removing the shared stock must not touch Alice's entry
        remove(&conn, bob, stock).unwrap();
        assert_eq!(list_for_user(&conn, alice).unwrap().len(), 1);
    }

    #[test]
    fn list_is_insertion_ordered() {
        let conn = test_conn();
        let user = make_user(&conn, "u1");
        let first = make_stock(&conn, "AAPL");
        let second = make_stock(&conn, "MSFT");

        add(&conn, user, first).unwrap();
        add(&conn, user, second).unwrap();

        let items = list_for_user(&conn, user).unwrap();
        let symbols: Vec<&str> = items.iter().map(|i| i.stock.symbol.as_str()).collect();
        assert_eq!(symbols, ["AAPL", "MSFT"]);
    }
}
