//! IPO listing queries

use crate::db::models::{optional_decimal_column, Ipo, IpoStatus};
use crate::error::Result;
use rusqlite::{params, Connection};

/// Upcoming IPOs by date, most recent first
pub fn upcoming(conn: &Connection, limit: usize) -> Result<Vec<Ipo>> {
    by_status(conn, IpoStatus::Upcoming, limit)
}

/// Recently listed IPOs by date, most recent first
pub fn recent(conn: &Connection, limit: usize) -> Result<Vec<Ipo>> {
    by_status(conn, IpoStatus::Recent, limit)
}

fn by_status(conn: &Connection, status: IpoStatus, limit: usize) -> Result<Vec<Ipo>> {
    let mut stmt = conn.prepare(
        "SELECT id, symbol, company_name, ipo_date, status, pricing_date, \
                offering_price, shares, proceeds, underwriters, created_at, updated_at \
         FROM ipos WHERE status = ?1 ORDER BY ipo_date DESC LIMIT ?2",
    )?;

    let ipos = stmt
        .query_map(params![status.as_str(), limit as i64], map_ipo_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(ipos)
}

fn map_ipo_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Ipo> {
    Ok(Ipo {
        id: row.get(0)?,
        symbol: row.get(1)?,
        company_name: row.get(2)?,
        ipo_date: row.get(3)?,
        status: IpoStatus::parse(&row.get::<_, String>(4)?),
        pricing_date: row.get(5)?,
        offering_price: optional_decimal_column(row.get(6)?),
        shares: row.get(7)?,
        proceeds: row.get(8)?,
        underwriters: row.get(9)?,
        created_at: row.get(10)?,
        updated_at: row.get(11)?,
    })
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

    fn insert_ipo(conn: &Connection, company: &str, status: &str, date: &str) {
        conn.execute(
            "INSERT INTO ipos (company_name, status, ipo_date, offering_price) \
             VALUES (?1, ?2, ?3, ?4)",
            params![company, status, date, "21.00"],
        )
        .unwrap();
    }

    #[test]
    fn status_filters_and_date_ordering() {
        let conn = test_conn();
        insert_ipo(&conn, "SoonCo", "upcoming", "2026-09-01");
        insert_ipo(&conn, "SoonerCo", "upcoming", "2026-08-15");
        insert_ipo(&conn, "ListedCo", "recent", "2026-07-20");

        let upcoming = upcoming(&conn, 10).unwrap();
        let names: Vec<&str> = upcoming.iter().map(|i| i.company_name.as_str()).collect();
        assert_eq!(names, ["SoonCo", "SoonerCo"]);
        assert_eq!(upcoming[0].status, IpoStatus::Upcoming);
        assert_eq!(upcoming[0].offering_price.unwrap().to_string(), "21.00");

        let recent = recent(&conn, 10).unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].company_name, "ListedCo");
    }

    #[test]
    fn limit_is_applied() {
        let conn = test_conn();
        insert_ipo(&conn, "A", "upcoming", "2026-09-01");
        insert_ipo(&conn, "B", "upcoming", "2026-09-02");
        assert_eq!(upcoming(&conn, 1).unwrap().len(), 1);
    }
}
