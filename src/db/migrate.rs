use crate::ui::messages::success;
use rusqlite::{Connection, OptionalExtension, Result};

/// Ensure that the `log` table exists. Every other migration records
/// itself there, so this one runs unconditionally.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

/// Base schema: users, tags, the loggings ledger and holiday deductions.
const BASE_SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        id       INTEGER PRIMARY KEY AUTOINCREMENT,
        name     TEXT,
        country  TEXT NOT NULL DEFAULT '',
        status   INTEGER NOT NULL DEFAULT 0 CHECK(status BETWEEN 0 AND 255)
    );

    CREATE TABLE IF NOT EXISTS tags (
        rfid_id  TEXT PRIMARY KEY,
        serial   TEXT NOT NULL DEFAULT '',
        user_id  INTEGER REFERENCES users(id)
    );

    CREATE TABLE IF NOT EXISTS loggings (
        event_id    INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id     INTEGER NOT NULL REFERENCES users(id),
        new_status  INTEGER NOT NULL CHECK(new_status BETWEEN 0 AND 255),
        date        TEXT NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%S', 'now', 'localtime'))
    );

    CREATE TABLE IF NOT EXISTS holidays (
        day        TEXT NOT NULL,
        country    TEXT NOT NULL,
        deduction  INTEGER NOT NULL,
        PRIMARY KEY (day, country)
    );
"#;

/// Loggings rows are written once and never touched again.
const LEDGER_APPEND_ONLY: &str = r#"
    CREATE TRIGGER IF NOT EXISTS loggings_no_update
    BEFORE UPDATE ON loggings
    BEGIN
        SELECT RAISE(ABORT, 'loggings is append-only');
    END;

    CREATE TRIGGER IF NOT EXISTS loggings_no_delete
    BEFORE DELETE ON loggings
    BEGIN
        SELECT RAISE(ABORT, 'loggings is append-only');
    END;
"#;

const LEDGER_INDEXES: &str = r#"
    CREATE INDEX IF NOT EXISTS idx_loggings_user_date ON loggings(user_id, date);
    CREATE INDEX IF NOT EXISTS idx_tags_user ON tags(user_id);
    CREATE INDEX IF NOT EXISTS idx_users_status ON users(status);
"#;

/// (version, description, sql) in application order.
const MIGRATIONS: &[(&str, &str, &str)] = &[
    ("20250301_0001_base_schema", "Created users, tags, loggings and holidays tables", BASE_SCHEMA),
    ("20250301_0002_ledger_append_only", "Made loggings append-only", LEDGER_APPEND_ONLY),
    ("20250312_0003_ledger_indexes", "Added ledger and status indexes", LEDGER_INDEXES),
];

fn migration_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn apply_migration(conn: &Connection, version: &str, description: &str, sql: &str) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(sql)?;
    tx.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now', 'localtime'), 'migration_applied', ?1, ?2)",
        [version, description],
    )?;
    tx.commit()?;

    success(format!("Migration applied: {} → {}", version, description));
    Ok(())
}

/// Public entry point: run all pending migrations.
///
/// Invoked by db::init_db().
pub fn run_pending_migrations(conn: &Connection) -> Result<()> {
    ensure_log_table(conn)?;

    for (version, description, sql) in MIGRATIONS {
        if !migration_applied(conn, version)? {
            apply_migration(conn, version, description, sql)?;
        }
    }

    Ok(())
}
