//! SQLite database migrations

use crate::error::Result;
use rusqlite::Connection;

/// Run all database migrations
pub fn run_migrations(conn: &Connection) -> Result<()> {
    // Create migrations table
    conn.execute(
        "CREATE TABLE IF NOT EXISTS migrations (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    run_migration(conn, "001_users", CREATE_USERS_TABLE)?;
    run_migration(conn, "002_stocks", CREATE_STOCKS_TABLE)?;
    run_migration(conn, "003_indices", CREATE_INDICES_TABLE)?;
    run_migration(conn, "004_watchlist", CREATE_WATCHLIST_TABLE)?;
    run_migration(conn, "005_screeners", CREATE_SCREENERS_TABLE)?;
    run_migration(conn, "006_news", CREATE_NEWS_TABLE)?;
    run_migration(conn, "007_ipos", CREATE_IPOS_TABLE)?;

    tracing::info!("Database migrations completed");
    Ok(())
}

fn run_migration(conn: &Connection, name: &str, sql: &str) -> Result<()> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM migrations WHERE name = ?)",
        [name],
        |row| row.get(0),
    )?;

    if !exists {
        tracing::info!("Running migration: {}", name);
        conn.execute_batch(sql)?;
        conn.execute("INSERT INTO migrations (name) VALUES (?)", [name])?;
    }

    Ok(())
}

const CREATE_USERS_TABLE: &str = r#"
CREATE TABLE users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    open_id TEXT NOT NULL UNIQUE,
    name TEXT,
    email TEXT,
    login_method TEXT,
    role TEXT NOT NULL DEFAULT 'user' CHECK (role IN ('user', 'admin')),
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now')),
    last_signed_in TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;

// Decimal columns are TEXT so fixed-point values round-trip byte-exactly.
const CREATE_STOCKS_TABLE: &str = r#"
CREATE TABLE stocks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    symbol TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    price TEXT NOT NULL,
    change TEXT NOT NULL,
    change_percent TEXT NOT NULL,
    volume TEXT,
    market_cap TEXT,
    pe_ratio TEXT,
    dividend_yield TEXT,
    last_updated TEXT NOT NULL DEFAULT (datetime('now')),
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);
CREATE INDEX idx_stocks_symbol ON stocks(symbol);
"#;

const CREATE_INDICES_TABLE: &str = r#"
CREATE TABLE indices (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    symbol TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    value TEXT NOT NULL,
    change TEXT NOT NULL,
    change_percent TEXT NOT NULL,
    last_updated TEXT NOT NULL DEFAULT (datetime('now')),
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);
CREATE INDEX idx_indices_symbol ON indices(symbol);
"#;

const CREATE_WATCHLIST_TABLE: &str = r#"
CREATE TABLE watchlist (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    stock_id INTEGER NOT NULL REFERENCES stocks(id) ON DELETE CASCADE,
    added_at TEXT NOT NULL DEFAULT (datetime('now')),
    UNIQUE(user_id, stock_id)
);
CREATE INDEX idx_watchlist_user ON watchlist(user_id);
CREATE INDEX idx_watchlist_stock ON watchlist(stock_id);
"#;

const CREATE_SCREENERS_TABLE: &str = r#"
CREATE TABLE screeners (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    description TEXT,
    filters TEXT NOT NULL,
    is_public INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);
CREATE INDEX idx_screeners_user ON screeners(user_id);
"#;

const CREATE_NEWS_TABLE: &str = r#"
CREATE TABLE news (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    description TEXT,
    url TEXT NOT NULL,
    source TEXT NOT NULL,
    image_url TEXT,
    published_at TEXT NOT NULL,
    sentiment TEXT NOT NULL DEFAULT 'neutral' CHECK (sentiment IN ('positive', 'negative', 'neutral')),
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);
CREATE INDEX idx_news_published ON news(published_at);
"#;

const CREATE_IPOS_TABLE: &str = r#"
CREATE TABLE ipos (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    symbol TEXT,
    company_name TEXT NOT NULL,
    ipo_date TEXT,
    status TEXT NOT NULL DEFAULT 'upcoming' CHECK (status IN ('upcoming', 'recent', 'completed')),
    pricing_date TEXT,
    offering_price TEXT,
    shares TEXT,
    proceeds TEXT,
    underwriters TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);
CREATE INDEX idx_ipos_status ON ipos(status);
CREATE INDEX idx_ipos_date ON ipos(ipo_date);
"#;
