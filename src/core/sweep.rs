//! End-of-day forced logout.

use crate::config::Config;
use crate::db::ledger::{self, Stamp};
use crate::db::log::ttlog_quiet;
use crate::db::pool::DbPool;
use crate::db::queries;
use crate::errors::{AppError, AppResult};
use chrono::{NaiveDateTime, Timelike};

#[derive(Debug, Clone)]
pub struct ForcedLogout {
    pub user_id: i64,
    pub name: String,
    pub stamp: Stamp,
}

#[derive(Debug, Clone)]
pub struct SweepReport {
    pub at: NaiveDateTime,
    pub logged_out: Vec<ForcedLogout>,
    /// Users whose status changed between the query and their append.
    pub skipped: Vec<i64>,
}

/// Log out everybody still logged in, marking the event as an auto-logout.
pub fn run_sweep(pool: &mut DbPool, now: NaiveDateTime) -> AppResult<SweepReport> {
    let users = queries::logged_in_users(&pool.conn)?;
    let mut report = SweepReport {
        at: now,
        logged_out: Vec::with_capacity(users.len()),
        skipped: Vec::new(),
    };

    for user in users {
        let forced = user.status.forced_logout();

        match ledger::compare_and_append(&mut pool.conn, user.id, user.status, forced) {
            Ok(appended) => {
                let stamp = Stamp::resolve(appended.at, now);
                ttlog_quiet(
                    &pool.conn,
                    "sweep",
                    &format!("user {}", user.id),
                    &format!(
                        "{} automatically logged out (event {})",
                        user.display_name(),
                        appended.event_id
                    ),
                );
                report.logged_out.push(ForcedLogout {
                    user_id: user.id,
                    name: user.display_name(),
                    stamp,
                });
            }
            Err(AppError::AppendConflict { .. } | AppError::UnknownUser(_)) => {
                tracing::warn!(user_id = user.id, "status changed during sweep, skipped");
                report.skipped.push(user.id);
            }
            Err(e) => return Err(e),
        }
    }

    Ok(report)
}

/// Runs the sweep once per closing time.
///
/// The latch is set by the first idle check at or after the closing hour
/// and cleared by the first one inside opening hours.
#[derive(Debug)]
pub struct ClosingSweep {
    opening_hour: u32,
    closing_hour: u32,
    closed_for_the_night: bool,
}

impl ClosingSweep {
    pub fn new(cfg: &Config) -> Self {
        Self {
            opening_hour: cfg.opening_hour,
            closing_hour: cfg.closing_hour,
            closed_for_the_night: false,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed_for_the_night
    }

    /// Called whenever the reader has been idle for a read timeout.
    ///
    /// The latch is only set once the sweep went through, so a sweep that
    /// failed (store unreachable) is attempted again on the next idle check;
    /// users already logged out are not touched twice.
    pub fn on_idle(&mut self, pool: &mut DbPool, now: NaiveDateTime) -> AppResult<Option<SweepReport>> {
        let hour = now.hour();
        let mut report = None;

        if !self.closed_for_the_night && hour >= self.closing_hour {
            report = Some(run_sweep(pool, now)?);
            self.closed_for_the_night = true;
        }

        if self.opening_hour <= hour && hour < self.closing_hour {
            self.closed_for_the_night = false;
        }

        Ok(report)
    }
}
