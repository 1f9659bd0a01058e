//! The `loggings` ledger: append-only status transitions.
//!
//! `users.status` caches the status of each user's latest event; every
//! append updates it in the same transaction.

use crate::db::TS_FORMAT;
use crate::errors::{AppError, AppResult};
use crate::models::ledger_event::LedgerEvent;
use crate::models::status::Status;
use chrono::NaiveDateTime;
use rusqlite::{Connection, OptionalExtension, TransactionBehavior, params};

/// Result of a successful append.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Appended {
    pub event_id: i64,
    /// Store-assigned timestamp, `None` if it could not be read back.
    pub at: Option<NaiveDateTime>,
}

/// Timestamp shown to the user for an appended event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stamp {
    /// Authoritative time from the store.
    Ledger(NaiveDateTime),
    /// The event is recorded but its time could not be read back;
    /// this is the local clock.
    Local(NaiveDateTime),
}

impl Stamp {
    pub fn resolve(at: Option<NaiveDateTime>, local_now: NaiveDateTime) -> Self {
        match at {
            Some(t) => Stamp::Ledger(t),
            None => Stamp::Local(local_now),
        }
    }

    pub fn time(&self) -> NaiveDateTime {
        match self {
            Stamp::Ledger(t) | Stamp::Local(t) => *t,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Stamp::Local(_))
    }
}

pub fn parse_ts(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, TS_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
}

/// Insert one event and refresh the cached status. The caller owns the
/// surrounding transaction.
fn insert_event(conn: &Connection, user_id: i64, status: Status) -> AppResult<Appended> {
    conn.execute(
        "INSERT INTO loggings (user_id, new_status) VALUES (?1, ?2)",
        params![user_id, status],
    )?;
    let event_id = conn.last_insert_rowid();

    conn.execute(
        "UPDATE users SET status = ?1 WHERE id = ?2",
        params![status, user_id],
    )?;

    // Read the official time back; failing here must not undo the event.
    let raw: Option<String> = match conn
        .query_row(
            "SELECT date FROM loggings WHERE event_id = ?1",
            [event_id],
            |row| row.get(0),
        )
        .optional()
    {
        Ok(raw) => raw,
        Err(e) => {
            tracing::warn!(event_id, error = %e, "could not read back event timestamp");
            None
        }
    };

    let at = raw.as_deref().and_then(parse_ts);
    if at.is_none() {
        tracing::warn!(event_id, raw = ?raw, "event timestamp missing or unreadable");
    }

    Ok(Appended { event_id, at })
}

/// Append `new_status` for `user_id` only if the cached status is still
/// `expected`. Runs in an immediate transaction so nobody can slip an event
/// in between the check and the insert.
pub fn compare_and_append(
    conn: &mut Connection,
    user_id: i64,
    expected: Status,
    new_status: Status,
) -> AppResult<Appended> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let current: Option<Status> = tx
        .query_row("SELECT status FROM users WHERE id = ?1", [user_id], |row| {
            row.get(0)
        })
        .optional()?;

    match current {
        None => return Err(AppError::UnknownUser(user_id)),
        Some(found) if found != expected => {
            return Err(AppError::AppendConflict {
                user_id,
                expected: expected.bits(),
                found: found.bits(),
            });
        }
        Some(_) => {}
    }

    let appended = insert_event(&tx, user_id, new_status)?;
    tx.commit()?;
    Ok(appended)
}

/// Events of one user with `from <= date < to` (no upper bound when `to` is
/// `None`), in timestamp order with ties broken by event id.
///
/// Appends are monotonic, so ordering by time must agree with ordering by
/// event id; a disagreement is reported as [`AppError::LedgerOutOfOrder`].
pub fn events_for_user(
    conn: &Connection,
    user_id: i64,
    from: NaiveDateTime,
    to: Option<NaiveDateTime>,
) -> AppResult<Vec<LedgerEvent>> {
    let mut stmt = conn.prepare_cached(
        "SELECT event_id, user_id, new_status, date FROM loggings
         WHERE user_id = ?1 AND date >= ?2 AND (?3 IS NULL OR date < ?3)
         ORDER BY date ASC, event_id ASC",
    )?;

    let from_s = from.format(TS_FORMAT).to_string();
    let to_s = to.map(|t| t.format(TS_FORMAT).to_string());

    let rows = stmt.query_map(params![user_id, from_s, to_s], |row| {
        Ok((
            row.get::<_, i64>(0)?,
            row.get::<_, i64>(1)?,
            row.get::<_, Status>(2)?,
            row.get::<_, String>(3)?,
        ))
    })?;

    let mut out: Vec<LedgerEvent> = Vec::new();
    for r in rows {
        let (event_id, user_id, status, raw) = r?;
        let at = parse_ts(&raw).ok_or(AppError::InvalidTimestamp(raw))?;

        if let Some(prev) = out.last()
            && event_id < prev.event_id
        {
            return Err(AppError::LedgerOutOfOrder {
                user_id,
                event_id,
                previous_id: prev.event_id,
            });
        }

        out.push(LedgerEvent::new(event_id, user_id, status, at));
    }

    Ok(out)
}

/// A ledger row joined with its user's name, for exports.
#[derive(Debug, Clone)]
pub struct LedgerRow {
    pub event: LedgerEvent,
    pub user_name: Option<String>,
}

/// All events with `from <= date < to`, every user, in ledger order.
pub fn events_between(
    conn: &Connection,
    from: NaiveDateTime,
    to: NaiveDateTime,
) -> AppResult<Vec<LedgerRow>> {
    let mut stmt = conn.prepare(
        "SELECT l.event_id, l.user_id, l.new_status, l.date, u.name
         FROM loggings l LEFT JOIN users u ON u.id = l.user_id
         WHERE l.date >= ?1 AND l.date < ?2
         ORDER BY l.date ASC, l.event_id ASC",
    )?;

    let rows = stmt.query_map(
        params![
            from.format(TS_FORMAT).to_string(),
            to.format(TS_FORMAT).to_string()
        ],
        |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, Status>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, Option<String>>(4)?,
            ))
        },
    )?;

    let mut out = Vec::new();
    for r in rows {
        let (event_id, user_id, status, raw, user_name) = r?;
        let at = parse_ts(&raw).ok_or(AppError::InvalidTimestamp(raw))?;
        out.push(LedgerRow {
            event: LedgerEvent::new(event_id, user_id, status, at),
            user_name,
        });
    }
    Ok(out)
}
