//! Saved screener filters

use crate::db::models::Screener;
use crate::error::Result;
use rusqlite::{params, Connection};

/// Create input for a saved screener
#[derive(Debug, Clone)]
pub struct ScreenerCreate {
    pub name: String,
    pub description: Option<String>,
    /// JSON-encoded filter criteria
    pub filters: String,
    pub is_public: bool,
}

/// Save a screener for a user
pub fn create(conn: &Connection, user_id: i64, screener: &ScreenerCreate) -> Result<Screener> {
    conn.execute(
        "INSERT INTO screeners (user_id, name, description, filters, is_public) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            user_id,
            screener.name,
            screener.description,
            screener.filters,
            screener.is_public,
        ],
    )?;

    let id = conn.last_insert_rowid();
    let saved = conn.query_row(
        &format!("{} WHERE id = ?1", SELECT_SCREENER),
        params![id],
        map_screener_row,
    )?;

    Ok(saved)
}

/// The user's own screeners plus public ones, newest first
pub fn list_for_user(conn: &Connection, user_id: i64) -> Result<Vec<Screener>> {
    let sql = format!(
        "{} WHERE user_id = ?1 OR is_public = 1 ORDER BY id DESC",
        SELECT_SCREENER
    );
    let mut stmt = conn.prepare(&sql)?;
    let screeners = stmt
        .query_map(params![user_id], map_screener_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(screeners)
}

const SELECT_SCREENER: &str = "SELECT id, user_id, name, description, filters, is_public, \
     created_at, updated_at FROM screeners";

fn map_screener_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Screener> {
    Ok(Screener {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        filters: row.get(4)?,
        is_public: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}
