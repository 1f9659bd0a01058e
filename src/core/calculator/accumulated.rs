//! Worked time reconstructed from the ledger.

use crate::db::ledger;
use crate::errors::AppResult;
use crate::models::ledger_event::LedgerEvent;
use chrono::{Duration, NaiveDateTime};
use rusqlite::Connection;

/// A login and the event that closed it.
#[derive(Debug, Clone)]
pub struct Pair {
    pub login: LedgerEvent,
    pub logout: LedgerEvent,
    /// The logout was the first of a run of auto-logouts.
    pub kicked: bool,
}

impl Pair {
    pub fn duration(&self) -> Duration {
        self.logout.at - self.login.at
    }
}

#[derive(Debug, Clone)]
pub struct Accumulated {
    pub pairs: Vec<Pair>,
    /// Login still open at the end of the scanned range; counts as zero.
    pub open_login: Option<LedgerEvent>,
    pub worked: Duration,
    pub was_kicked: bool,
}

impl Default for Accumulated {
    fn default() -> Self {
        Self {
            pairs: Vec::new(),
            open_login: None,
            worked: Duration::zero(),
            was_kicked: false,
        }
    }
}

/// Pair every login with the next event that clears `LoggedIn` and sum the
/// closed intervals. `events` must already be in ledger order.
///
/// A second login while already in keeps the first start; a logout with no
/// open login is ignored.
pub fn accumulate(events: &[LedgerEvent]) -> Accumulated {
    let mut out = Accumulated::default();
    let mut open: Option<&LedgerEvent> = None;
    let mut previous_was_auto = false;

    for ev in events {
        if ev.status.is_logged_in() {
            if open.is_none() {
                open = Some(ev);
            }
        } else if let Some(login) = open.take() {
            let kicked = ev.status.is_auto_log_out() && !previous_was_auto;
            let pair = Pair {
                login: login.clone(),
                logout: ev.clone(),
                kicked,
            };

            out.worked += pair.duration();
            out.was_kicked |= kicked;
            out.pairs.push(pair);
        }

        previous_was_auto = ev.status.is_auto_log_out();
    }

    out.open_login = open.cloned();
    out
}

/// Worked time of `user_id` in `[from, to)`, and whether an auto-logout
/// closed one of its sessions.
pub fn accumulated_time(
    conn: &Connection,
    user_id: i64,
    from: NaiveDateTime,
    to: NaiveDateTime,
) -> AppResult<Accumulated> {
    let events = ledger::events_for_user(conn, user_id, from, Some(to))?;
    Ok(accumulate(&events))
}

/// Worked time of `user_id` from `from` up to now.
pub fn accumulated_time_since(
    conn: &Connection,
    user_id: i64,
    from: NaiveDateTime,
) -> AppResult<Duration> {
    let events = ledger::events_for_user(conn, user_id, from, None)?;
    Ok(accumulate(&events).worked)
}
