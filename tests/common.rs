#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::{NaiveDate, NaiveDateTime};
use rtagclock::config::Config;
use rtagclock::db::initialize::open_initialized;
use rtagclock::db::pool::DbPool;
use rtagclock::models::status::Status;
use rusqlite::params;
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn rti() -> Command {
    cargo_bin_cmd!("rtagclock")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rtagclock.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// Fresh, migrated database for library-level tests
pub fn open_test_db(name: &str) -> (String, DbPool) {
    let db_path = setup_test_db(name);
    let pool = open_initialized(&db_path).expect("open test db");
    (db_path, pool)
}

pub fn test_config(db_path: &str) -> Config {
    Config::with_database(db_path.to_string())
}

pub fn add_user(pool: &DbPool, name: &str, country: &str) -> i64 {
    pool.conn
        .execute(
            "INSERT INTO users (name, country, status) VALUES (?1, ?2, 0)",
            params![name, country],
        )
        .expect("insert user");
    pool.conn.last_insert_rowid()
}

pub fn bind_tag(pool: &DbPool, tag: &str, user_id: i64) {
    pool.conn
        .execute(
            "INSERT INTO tags (rfid_id, serial, user_id) VALUES (?1, 'test', ?2)",
            params![tag, user_id],
        )
        .expect("bind tag");
}

/// Append a ledger row with an explicit timestamp and update the cached status,
/// as the terminal would have done at that time
pub fn record(pool: &DbPool, user_id: i64, status: Status, at: &str) -> i64 {
    pool.conn
        .execute(
            "INSERT INTO loggings (user_id, new_status, date) VALUES (?1, ?2, ?3)",
            params![user_id, status, at],
        )
        .expect("insert logging");
    let id = pool.conn.last_insert_rowid();
    pool.conn
        .execute(
            "UPDATE users SET status = ?1 WHERE id = ?2",
            params![status, user_id],
        )
        .expect("update status");
    id
}

pub fn user_status(pool: &DbPool, user_id: i64) -> Status {
    pool.conn
        .query_row("SELECT status FROM users WHERE id = ?1", [user_id], |r| {
            r.get(0)
        })
        .expect("read status")
}

pub fn event_count(pool: &DbPool) -> i64 {
    pool.conn
        .query_row("SELECT COUNT(*) FROM loggings", [], |r| r.get(0))
        .expect("count loggings")
}

pub fn ts(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").expect("valid timestamp")
}

pub fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("valid date")
}
