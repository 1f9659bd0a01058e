//! Users and tags.

use crate::errors::AppResult;
use crate::models::status::Status;
use crate::models::tag::{TagBinding, TagRow};
use crate::models::user::User;
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

/// Resolve a tag to the user it is bound to.
pub fn lookup_tag(conn: &Connection, tag: &str) -> AppResult<TagBinding> {
    let row: Option<Option<i64>> = conn
        .query_row(
            "SELECT user_id FROM tags WHERE rfid_id = ?1",
            [tag],
            |row| row.get(0),
        )
        .optional()?;

    Ok(match row {
        None => TagBinding::Unknown,
        Some(None) => TagBinding::Unassigned,
        Some(Some(id)) => TagBinding::User(id),
    })
}

/// Record a tag seen for the first time, bound to nobody.
/// Returns `false` if the tag was already there.
pub fn insert_unbound_tag(conn: &Connection, tag: &str, serial: &str) -> AppResult<bool> {
    let n = conn.execute(
        "INSERT OR IGNORE INTO tags (rfid_id, serial, user_id) VALUES (?1, ?2, NULL)",
        params![tag, serial],
    )?;
    Ok(n > 0)
}

/// Bind (or unbind, with `None`) a tag, creating it if needed.
pub fn assign_tag(
    conn: &Connection,
    tag: &str,
    serial: &str,
    user_id: Option<i64>,
) -> AppResult<()> {
    conn.execute(
        "INSERT INTO tags (rfid_id, serial, user_id) VALUES (?1, ?2, ?3)
         ON CONFLICT(rfid_id) DO UPDATE SET user_id = excluded.user_id",
        params![tag, serial, user_id],
    )?;
    Ok(())
}

pub fn list_tags(conn: &Connection) -> AppResult<Vec<TagRow>> {
    let mut stmt = conn.prepare("SELECT rfid_id, serial, user_id FROM tags ORDER BY rfid_id")?;
    let rows = stmt.query_map([], |row| {
        Ok(TagRow {
            rfid_id: row.get(0)?,
            serial: row.get(1)?,
            user_id: row.get(2)?,
        })
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

fn map_user(row: &Row) -> Result<User> {
    Ok(User {
        id: row.get("id")?,
        name: row.get("name")?,
        country: row.get::<_, Option<String>>("country")?.unwrap_or_default(),
        status: row.get("status")?,
    })
}

pub fn load_user(conn: &Connection, user_id: i64) -> AppResult<Option<User>> {
    let user = conn
        .query_row(
            "SELECT id, name, country, status FROM users WHERE id = ?1",
            [user_id],
            map_user,
        )
        .optional()?;
    Ok(user)
}

pub fn list_users(conn: &Connection) -> AppResult<Vec<User>> {
    query_users(conn, "SELECT id, name, country, status FROM users ORDER BY id")
}

/// Users whose cached status has `LoggedIn` set.
pub fn logged_in_users(conn: &Connection) -> AppResult<Vec<User>> {
    let sql = format!(
        "SELECT id, name, country, status FROM users WHERE (status & {}) != 0 ORDER BY id",
        Status::LOGGED_IN.bits()
    );
    query_users(conn, &sql)
}

fn query_users(conn: &Connection, sql: &str) -> AppResult<Vec<User>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map([], map_user)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn insert_user(conn: &Connection, name: Option<&str>, country: &str) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO users (name, country, status) VALUES (?1, ?2, 0)",
        params![name, country],
    )?;
    Ok(conn.last_insert_rowid())
}
