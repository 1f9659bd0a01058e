use crate::db::pool::DbPool;
use crate::models::status::Status;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use rusqlite::OptionalExtension;
use std::fs;

fn count(pool: &DbPool, sql: &str) -> rusqlite::Result<i64> {
    pool.conn.query_row(sql, [], |row| row.get(0))
}

pub fn print_db_info(pool: &mut DbPool, db_path: &str) -> rusqlite::Result<()> {
    println!();

    //
    // 1) FILE SIZE
    //
    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_mb = (file_size as f64) / (1024.0 * 1024.0);

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.2} MB", CYAN, RESET, file_mb);

    //
    // 2) ROW COUNTS
    //
    let users = count(pool, "SELECT COUNT(*) FROM users")?;
    let present = count(
        pool,
        &format!(
            "SELECT COUNT(*) FROM users WHERE (status & {}) != 0",
            Status::LOGGED_IN.bits()
        ),
    )?;
    let tags = count(pool, "SELECT COUNT(*) FROM tags")?;
    let unassigned = count(pool, "SELECT COUNT(*) FROM tags WHERE user_id IS NULL")?;
    let events = count(pool, "SELECT COUNT(*) FROM loggings")?;
    let holidays = count(pool, "SELECT COUNT(*) FROM holidays")?;

    println!(
        "{}• Users:{} {}{}{} ({} logged in)",
        CYAN, RESET, GREEN, users, RESET, present
    );
    println!(
        "{}• Tags:{} {}{}{} ({} unassigned)",
        CYAN, RESET, GREEN, tags, RESET, unassigned
    );
    println!("{}• Ledger events:{} {}{}{}", CYAN, RESET, GREEN, events, RESET);
    println!("{}• Holiday rows:{} {}{}{}", CYAN, RESET, GREEN, holidays, RESET);

    //
    // 3) LEDGER RANGE
    //
    let first: Option<String> = pool
        .conn
        .query_row(
            "SELECT date FROM loggings ORDER BY date ASC, event_id ASC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;

    let last: Option<String> = pool
        .conn
        .query_row(
            "SELECT date FROM loggings ORDER BY date DESC, event_id DESC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;

    let fmt_first = first.unwrap_or_else(|| format!("{GREY}--{RESET}"));
    let fmt_last = last.unwrap_or_else(|| format!("{GREY}--{RESET}"));

    println!("{}• Ledger range:{}", CYAN, RESET);
    println!("    from: {}", fmt_first);
    println!("    to:   {}", fmt_last);

    println!();
    Ok(())
}

/// Users whose cached status differs from their newest ledger event,
/// as `(user_id, cached, ledger)`.
pub fn status_mismatches(pool: &DbPool) -> rusqlite::Result<Vec<(i64, Status, Status)>> {
    let mut stmt = pool.conn.prepare(
        "SELECT u.id, u.status, l.new_status
         FROM users u
         JOIN loggings l ON l.event_id = (
             SELECT MAX(event_id) FROM loggings WHERE user_id = u.id
         )
         WHERE u.status != l.new_status
         ORDER BY u.id",
    )?;
    let mismatches = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(mismatches)
}

/// Names of the append-only triggers that are missing from the schema.
pub fn missing_ledger_guards(pool: &DbPool) -> rusqlite::Result<Vec<&'static str>> {
    let mut missing = Vec::new();
    for name in ["loggings_no_update", "loggings_no_delete"] {
        let found = count(
            pool,
            &format!("SELECT COUNT(*) FROM sqlite_master WHERE type = 'trigger' AND name = '{name}'"),
        )?;
        if found == 0 {
            missing.push(name);
        }
    }
    Ok(missing)
}
