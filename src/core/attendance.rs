//! Tag-present workflow: resolve the tag, flip the user's status, record it
//! in the ledger and build the weekly progress report.

use crate::config::Config;
use crate::core::calculator::accumulated::{accumulate, accumulated_time_since};
use crate::core::calculator::norm::{WorkSchedule, compute_norm, norm};
use crate::db::holidays::holidays_between;
use crate::db::ledger::{self, Appended, Stamp};
use crate::db::log::ttlog_quiet;
use crate::db::pool::DbPool;
use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::models::country::Country;
use crate::models::status::Status;
use crate::models::tag::TagBinding;
use crate::models::user::User;
use crate::utils::date::{monday_of, start_of};
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Timelike};
use rusqlite::Connection;

/// Progress against the norm, worst last.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    Ahead,
    OnTrack,
    Behind,
}

/// `Ahead` once `done` reaches `norm`, `Behind` when more than `margin`
/// short of it.
pub fn classify(done: Duration, norm: Duration, margin: Duration) -> Progress {
    if done >= norm {
        Progress::Ahead
    } else if done < norm - margin {
        Progress::Behind
    } else {
        Progress::OnTrack
    }
}

#[derive(Debug, Clone)]
pub struct DayReport {
    pub day: NaiveDate,
    pub norm: Duration,
    pub done: Duration,
    /// A session on this day was closed by the closing sweep.
    pub kicked: bool,
    /// `None` for days after the report date.
    pub progress: Option<Progress>,
}

#[derive(Debug, Clone)]
pub struct WeeklyReport {
    pub monday: NaiveDate,
    pub days: Vec<DayReport>,
    /// Norm for Monday to Friday.
    pub week_norm: Duration,
    /// Norm from Monday through the report date.
    pub norm_to_date: Duration,
    /// Worked since Monday, closed sessions only.
    pub accumulated: Duration,
    pub progress: Progress,
}

/// What the weekly part of a toggle produced.
#[derive(Debug, Clone)]
pub enum Weekly {
    Report(WeeklyReport),
    /// `users.country` holds a code with no greeting or holidays.
    UnknownCountry(String),
    /// The transition is recorded but the report could not be computed.
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct Toggled {
    pub user_id: i64,
    pub name: String,
    pub country: Option<Country>,
    /// Status written to the ledger.
    pub status: Status,
    pub event_id: i64,
    pub stamp: Stamp,
    /// The previous transition was a forced logout; shown once.
    pub auto_logout_notice: bool,
    pub weekly: Weekly,
}

impl Toggled {
    pub fn logged_in(&self) -> bool {
        self.status.is_logged_in()
    }
}

#[derive(Debug, Clone)]
pub enum ToggleOutcome {
    /// First sighting; the tag was stored unassigned.
    UnknownTag {
        tag: String,
        serial: String,
        inserted: bool,
    },
    /// Known tag bound to nobody.
    Unassigned { tag: String },
    Toggled(Box<Toggled>),
}

pub struct AttendanceEngine {
    schedule: WorkSchedule,
    opening_hour: u32,
    closing_hour: u32,
    behind_margin: Duration,
}

impl AttendanceEngine {
    pub fn new(cfg: &Config) -> Self {
        Self {
            schedule: WorkSchedule::from_config(cfg),
            opening_hour: cfg.opening_hour,
            closing_hour: cfg.closing_hour,
            behind_margin: Duration::minutes(cfg.behind_margin_minutes),
        }
    }

    /// Logins are only accepted between opening and closing hour.
    pub fn accepts_logins_at(&self, now: NaiveDateTime) -> bool {
        let hour = now.hour();
        self.opening_hour <= hour && hour < self.closing_hour
    }

    /// Process one tag read at local time `now`.
    pub fn toggle(&self, pool: &mut DbPool, tag: &str, now: NaiveDateTime) -> AppResult<ToggleOutcome> {
        let user_id = match queries::lookup_tag(&pool.conn, tag)? {
            TagBinding::Unknown => {
                let serial = now.format("%Y-%m-%dT%H:%M:%S%.f").to_string();
                let inserted = queries::insert_unbound_tag(&pool.conn, tag, &serial)?;
                if inserted {
                    ttlog_quiet(&pool.conn, "tag", tag, &format!("Unknown tag stored as {serial}"));
                }
                return Ok(ToggleOutcome::UnknownTag {
                    tag: tag.to_string(),
                    serial,
                    inserted,
                });
            }
            TagBinding::Unassigned => {
                return Ok(ToggleOutcome::Unassigned {
                    tag: tag.to_string(),
                });
            }
            TagBinding::User(id) => id,
        };

        let (user, new_status, appended) = self.flip_and_append(&mut pool.conn, user_id, tag)?;
        let stamp = Stamp::resolve(appended.at, now);
        if stamp.is_degraded() {
            tracing::warn!(user_id, event_id = appended.event_id, "using local time for event");
        }

        ttlog_quiet(
            &pool.conn,
            "toggle",
            &format!("user {user_id}"),
            &format!(
                "{} logged {} with tag {tag} (event {})",
                user.display_name(),
                new_status.in_or_out(),
                appended.event_id
            ),
        );

        let country = user.country();
        let weekly = match country {
            None => Weekly::UnknownCountry(user.country.clone()),
            Some(c) => match self.weekly_report(&pool.conn, user_id, c, stamp.time()) {
                Ok(report) => Weekly::Report(report),
                Err(e) => {
                    tracing::error!(user_id, error = %e, "weekly report failed");
                    Weekly::Failed(e.to_string())
                }
            },
        };

        Ok(ToggleOutcome::Toggled(Box::new(Toggled {
            user_id,
            name: user.display_name(),
            country,
            status: new_status,
            event_id: appended.event_id,
            stamp,
            auto_logout_notice: user.status.is_auto_log_out(),
            weekly,
        })))
    }

    /// Read the user, flip `LoggedIn`, normalize and append. If someone else
    /// changed the status in between, start over once.
    fn flip_and_append(
        &self,
        conn: &mut Connection,
        user_id: i64,
        tag: &str,
    ) -> AppResult<(User, Status, Appended)> {
        let mut retried = false;
        loop {
            let user = queries::load_user(conn, user_id)?.ok_or_else(|| AppError::MissingUser {
                user_id,
                tag: tag.to_string(),
            })?;

            let new_status = user.status.toggled().normalized();

            match ledger::compare_and_append(conn, user_id, user.status, new_status) {
                Ok(appended) => return Ok((user, new_status, appended)),
                Err(AppError::AppendConflict { .. }) if !retried => {
                    tracing::warn!(user_id, "status changed while toggling, retrying");
                    retried = true;
                }
                Err(AppError::UnknownUser(_)) => {
                    return Err(AppError::MissingUser {
                        user_id,
                        tag: tag.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Progress of the week containing `at`, up to and including its date.
    pub fn weekly_report(
        &self,
        conn: &Connection,
        user_id: i64,
        country: Country,
        at: NaiveDateTime,
    ) -> AppResult<WeeklyReport> {
        let today = at.date();
        let monday = monday_of(today);
        let friday = monday + Duration::days(4);

        let week_norm = norm(conn, &self.schedule, country.code(), monday, friday)?;
        let norm_to_date = norm(conn, &self.schedule, country.code(), monday, today)?;
        let holidays = holidays_between(conn, country.code(), monday, friday)?;

        let accumulated = accumulated_time_since(conn, user_id, start_of(monday))?;

        // One scan for the per-day breakdown.
        let events = ledger::events_for_user(
            conn,
            user_id,
            start_of(monday),
            Some(start_of(monday + Duration::days(5))),
        )?;

        let days = (0..5)
            .map(|i| {
                let day = monday + Duration::days(i);
                let from = start_of(day);
                let to = start_of(day + Duration::days(1));
                let in_day: Vec<_> = events
                    .iter()
                    .filter(|e| e.at >= from && e.at < to)
                    .cloned()
                    .collect();
                let acc = accumulate(&in_day);
                let day_norm = compute_norm(&self.schedule, day, day, &holidays);

                DayReport {
                    day,
                    norm: day_norm,
                    done: acc.worked,
                    kicked: acc.was_kicked,
                    progress: (day <= today)
                        .then(|| classify(acc.worked, day_norm, self.behind_margin)),
                }
            })
            .collect();

        Ok(WeeklyReport {
            monday,
            days,
            week_norm,
            norm_to_date,
            accumulated,
            progress: classify(accumulated, norm_to_date, self.behind_margin),
        })
    }

    /// Weekly report for `user_id` at `at`, looked up by id.
    pub fn report_for_user(
        &self,
        conn: &Connection,
        user_id: i64,
        at: NaiveDateTime,
    ) -> AppResult<(User, Weekly)> {
        let user = queries::load_user(conn, user_id)?.ok_or(AppError::UnknownUser(user_id))?;
        let weekly = match user.country() {
            Some(c) => Weekly::Report(self.weekly_report(conn, user_id, c, at)?),
            None => Weekly::UnknownCountry(user.country.clone()),
        };
        Ok((user, weekly))
    }
}

/// Weekday label used in the report grid.
pub fn weekday_label(day: NaiveDate) -> String {
    day.weekday().to_string()
}
