//! User management
//!
//! `upsert_user` is the login path: identity persistence failures propagate
//! instead of degrading, unlike every other write in the store.

use crate::db::models::{Role, User, UserUpsert};
use crate::error::{AppError, Result};
use rusqlite::{params, Connection, OptionalExtension};

/// Insert or update a user keyed on their external identity.
///
/// Optional fields only overwrite when provided. The role resolves to an
/// explicitly supplied role, else `admin` for the configured owner identity,
/// else the stored role (defaulting to `user` on first insert).
pub fn upsert_user(
    conn: &Connection,
    user: &UserUpsert,
    owner_open_id: Option<&str>,
) -> Result<User> {
    if user.open_id.is_empty() {
        return Err(AppError::Validation(
            "user open_id is required for upsert".to_string(),
        ));
    }

    let role = user.role.or_else(|| {
        (owner_open_id == Some(user.open_id.as_str())).then_some(Role::Admin)
    });

    conn.execute(
        r#"
        INSERT INTO users (open_id, name, email, login_method, role)
        VALUES (?1, ?2, ?3, ?4, COALESCE(?5, 'user'))
        ON CONFLICT(open_id) DO UPDATE SET
            name = COALESCE(excluded.name, users.name),
            email = COALESCE(excluded.email, users.email),
            login_method = COALESCE(excluded.login_method, users.login_method),
            role = COALESCE(?5, users.role),
            last_signed_in = datetime('now'),
            updated_at = datetime('now')
        "#,
        params![
            user.open_id,
            user.name,
            user.email,
            user.login_method,
            role.map(|r| r.as_str()),
        ],
    )?;

    get_user_by_open_id(conn, &user.open_id)?
        .ok_or_else(|| AppError::Internal("user vanished after upsert".to_string()))
}

/// Look up a user by external identity token
pub fn get_user_by_open_id(conn: &Connection, open_id: &str) -> Result<Option<User>> {
    let user = conn
        .query_row(
            &format!("{} WHERE open_id = ?1", SELECT_USER),
            params![open_id],
            map_user_row,
        )
        .optional()?;
    Ok(user)
}

/// Look up a user by surrogate id
pub fn get_user_by_id(conn: &Connection, id: i64) -> Result<Option<User>> {
    let user = conn
        .query_row(
            &format!("{} WHERE id = ?1", SELECT_USER),
            params![id],
            map_user_row,
        )
        .optional()?;
    Ok(user)
}

const SELECT_USER: &str = "SELECT id, open_id, name, email, login_method, role, \
     created_at, updated_at, last_signed_in FROM users";

fn map_user_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        open_id: row.get(1)?,
        name: row.get(2)?,
        email: row.get(3)?,
        login_method: row.get(4)?,
        role: Role::parse(&row.get::<_, String>(5)?),
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
        last_signed_in: row.get(8)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys=ON;").unwrap();
        migrations::run_migrations(&conn).unwrap();
        conn
    }

    fn upsert(conn: &Connection, open_id: &str, owner: Option<&str>) -> User {
        upsert_user(
            conn,
            &UserUpsert {
                open_id: open_id.to_string(),
                ..Default::default()
            },
            owner,
        )
        .unwrap()
    }

    #[test]
    fn first_upsert_creates_a_user_with_default_role() {
        let conn = test_conn();
        let user = upsert(&conn, "oid-1", None);
        assert_eq!(user.role, Role::User);
        assert_eq!(user.open_id, "oid-1");
    }

    #[test]
    fn owner_identity_is_promoted_to_admin() {
        let conn = test_conn();
        let user = upsert(&conn, "oid-owner", Some("oid-owner"));
        assert_eq!(user.role, Role::Admin);

        // Other identities are unaffected by the owner setting
        let other = upsert(&conn, "oid-2", Some("oid-owner"));
        assert_eq!(other.role, Role::User);
    }

    #[test]
    fn repeated_upsert_updates_in_place() {
        let conn = test_conn();
        upsert_user(
            &conn,
            &UserUpsert {
                open_id: "oid-1".to_string(),
                name: Some("First".to_string()),
                email: Some("first@example.com".to_string()),
                ..Default::default()
            },
            None,
        )
        .unwrap();

        // Second upsert without email keeps the stored value
        let updated = upsert_user(
            &conn,
            &UserUpsert {
                open_id: "oid-1".to_string(),
                name: Some("Renamed".to_string()),
                ..Default::default()
            },
            None,
        )
        .unwrap();

        assert_eq!(updated.name.as_deref(), Some("Renamed"));
        assert_eq!(updated.email.as_deref(), Some("first@example.com"));

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn empty_open_id_is_rejected() {
        let conn = test_conn();
        let result = upsert_user(&conn, &UserUpsert::default(), None);
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn lookup_misses_return_none() {
        let conn = test_conn();
        assert!(get_user_by_open_id(&conn, "missing").unwrap().is_none());
        assert!(get_user_by_id(&conn, 42).unwrap().is_none());
    }
}
