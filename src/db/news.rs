//! Cached market news queries
//!
//! The news table is read-mostly; rows arrive through an external ingestion
//! path, so this module only serves reads.

use crate::db::models::NewsArticle;
use crate::error::Result;
use rusqlite::{params, Connection};

/// Latest articles, newest first
pub fn latest(conn: &Connection, limit: usize) -> Result<Vec<NewsArticle>> {
    let mut stmt = conn.prepare(
        "SELECT id, title, description, url, source, image_url, published_at, \
                sentiment, created_at \
         FROM news ORDER BY published_at DESC LIMIT ?1",
    )?;

    let articles = stmt
        .query_map(params![limit as i64], |row| {
            Ok(NewsArticle {
                id: row.get(0)?,
                title: row.get(1)?,
                description: row.get(2)?,
                url: row.get(3)?,
                source: row.get(4)?,
                image_url: row.get(5)?,
                published_at: row.get(6)?,
                sentiment: row.get(7)?,
                created_at: row.get(8)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(articles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        migrations::run_migrations(&conn).unwrap();
        conn
    }

    fn insert_article(conn: &Connection, title: &str, published_at: &str) {
        conn.execute(
            "INSERT INTO news (title, url, source, published_at) VALUES (?1, ?2, ?3, ?4)",
            params![title, "https://example.com/a", "Newswire", published_at],
        )
        .unwrap();
    }

    #[test]
    fn latest_is_newest_first_and_limited() {
        let conn = test_conn();
        insert_article(&conn, "old", "2026-08-01 09:00:00");
        insert_article(&conn, "newest", "2026-08-07 09:00:00");
        insert_article(&conn, "middle", "2026-08-04 09:00:00");

        let articles = latest(&conn, 2).unwrap();
        let titles: Vec<&str> = articles.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, ["newest", "middle"]);
    }

    #[test]
    fn empty_table_returns_empty_list() {
        let conn = test_conn();
        assert!(latest(&conn, 20).unwrap().is_empty());
    }
}
