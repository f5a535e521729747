//! SQLite persistent store
//!
//! A single `Database` handle wraps one connection; it is opened once at
//! startup and injected into everything that needs it. Row-level atomicity
//! comes from SQLite itself.

pub mod models;
mod migrations;
mod users;
mod stocks;
mod indices;
mod watchlist;
mod screeners;
mod news;
mod ipos;

pub use indices::IndexUpsert;
pub use screeners::ScreenerCreate;
pub use stocks::StockUpsert;

use crate::error::Result;
use models::*;
use parking_lot::Mutex;
use rusqlite::Connection;
use std::path::Path;

/// SQLite database wrapper
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) the database at `path` and run migrations
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;

        // WAL for concurrent reads; foreign keys back the watchlist integrity
        conn.execute_batch(
            "PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL; PRAGMA foreign_keys=ON;",
        )?;

        Self::from_connection(conn)
    }

    /// In-memory database, used by tests and store-less tooling
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.run_migrations()?;
        Ok(db)
    }

    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn.lock();
        migrations::run_migrations(&conn)
    }

    // ========== User Methods ==========

    /// Insert or update a user on login; failures propagate
    pub fn upsert_user(&self, user: &UserUpsert, owner_open_id: Option<&str>) -> Result<User> {
        let conn = self.conn.lock();
        users::upsert_user(&conn, user, owner_open_id)
    }

    pub fn get_user_by_open_id(&self, open_id: &str) -> Result<Option<User>> {
        let conn = self.conn.lock();
        users::get_user_by_open_id(&conn, open_id)
    }

    pub fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        let conn = self.conn.lock();
        users::get_user_by_id(&conn, id)
    }

    // ========== Stock Methods ==========

    pub fn get_stock_by_symbol(&self, symbol: &str) -> Result<Option<Stock>> {
        let conn = self.conn.lock();
        stocks::get_by_symbol(&conn, symbol)
    }

    pub fn top_gainers(&self, limit: usize) -> Result<Vec<Stock>> {
        let conn = self.conn.lock();
        stocks::top_gainers(&conn, limit)
    }

    pub fn top_losers(&self, limit: usize) -> Result<Vec<Stock>> {
        let conn = self.conn.lock();
        stocks::top_losers(&conn, limit)
    }

    pub fn search_stocks(&self, query: &str, limit: usize) -> Result<Vec<Stock>> {
        let conn = self.conn.lock();
        stocks::search(&conn, query, limit)
    }

    pub fn upsert_stock(&self, stock: &StockUpsert) -> Result<Stock> {
        let conn = self.conn.lock();
        stocks::upsert_stock(&conn, stock)
    }

    // ========== Index Methods ==========

    pub fn get_indices(&self) -> Result<Vec<MarketIndex>> {
        let conn = self.conn.lock();
        indices::get_all(&conn)
    }

    pub fn get_index_by_symbol(&self, symbol: &str) -> Result<Option<MarketIndex>> {
        let conn = self.conn.lock();
        indices::get_by_symbol(&conn, symbol)
    }

    pub fn upsert_index(&self, index: &IndexUpsert) -> Result<MarketIndex> {
        let conn = self.conn.lock();
        indices::upsert_index(&conn, index)
    }

    // ========== Watchlist Methods ==========

    pub fn watchlist_for_user(&self, user_id: i64) -> Result<Vec<WatchlistItem>> {
        let conn = self.conn.lock();
        watchlist::list_for_user(&conn, user_id)
    }

    pub fn watchlist_add(&self, user_id: i64, stock_id: i64) -> Result<WatchlistEntry> {
        let conn = self.conn.lock();
        watchlist::add(&conn, user_id, stock_id)
    }

    pub fn watchlist_remove(&self, user_id: i64, stock_id: i64) -> Result<()> {
        let conn = self.conn.lock();
        watchlist::remove(&conn, user_id, stock_id)
    }

    // ========== Screener Methods ==========

    pub fn create_screener(&self, user_id: i64, screener: &ScreenerCreate) -> Result<Screener> {
        let conn = self.conn.lock();
        screeners::create(&conn, user_id, screener)
    }

    pub fn screeners_for_user(&self, user_id: i64) -> Result<Vec<Screener>> {
        let conn = self.conn.lock();
        screeners::list_for_user(&conn, user_id)
    }

    // ========== News Methods ==========

    pub fn latest_news(&self, limit: usize) -> Result<Vec<NewsArticle>> {
        let conn = self.conn.lock();
        news::latest(&conn, limit)
    }

    // ========== IPO Methods ==========

    pub fn upcoming_ipos(&self, limit: usize) -> Result<Vec<Ipo>> {
        let conn = self.conn.lock();
        ipos::upcoming(&conn, limit)
    }

    pub fn recent_ipos(&self, limit: usize) -> Result<Vec<Ipo>> {
        let conn = self.conn.lock();
        ipos::recent(&conn, limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_creates_the_schema_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stockdash.db");

        let db = Database::open(&path).unwrap();
        assert!(db.get_stock_by_symbol("AAPL").unwrap().is_none());
        drop(db);

        // Reopening must not re-run migrations destructively
        let db = Database::open(&path).unwrap();
        assert!(db.get_indices().unwrap().is_empty());
    }
}
