//! Expected working time ("norm") for a date range.

use crate::config::Config;
use crate::db::holidays;
use crate::errors::AppResult;
use crate::models::holiday::Holiday;
use crate::utils::date::days_between;
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rusqlite::Connection;

/// Daily baselines in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkSchedule {
    /// Monday to Thursday.
    pub standard_minutes: i64,
    pub friday_minutes: i64,
}

impl WorkSchedule {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            standard_minutes: cfg.standard_daily_minutes,
            friday_minutes: cfg.friday_daily_minutes,
        }
    }

    /// Minutes expected on `day` before holiday deductions.
    pub fn baseline(&self, day: NaiveDate) -> i64 {
        match day.weekday() {
            Weekday::Sat | Weekday::Sun => 0,
            Weekday::Fri => self.friday_minutes,
            _ => self.standard_minutes,
        }
    }

    /// Minutes a holiday takes off its day. Weekend holidays take nothing.
    pub fn deduction(&self, holiday: &Holiday) -> i64 {
        if holiday.is_weekend() {
            0
        } else if holiday.is_whole_day() {
            self.baseline(holiday.day)
        } else {
            holiday.deduction
        }
    }
}

/// Sum of baselines over `[first, last]` minus the deductions of the
/// holidays falling inside the range. May be negative.
pub fn compute_norm(
    schedule: &WorkSchedule,
    first: NaiveDate,
    last: NaiveDate,
    holidays: &[Holiday],
) -> Duration {
    let base: i64 = days_between(first, last).map(|d| schedule.baseline(d)).sum();

    let deducted: i64 = holidays
        .iter()
        .filter(|h| h.day >= first && h.day <= last)
        .map(|h| schedule.deduction(h))
        .sum();

    Duration::minutes(base - deducted)
}

/// Norm of `country` for `[first, last]`, holidays read from the store.
pub fn norm(
    conn: &Connection,
    schedule: &WorkSchedule,
    country: &str,
    first: NaiveDate,
    last: NaiveDate,
) -> AppResult<Duration> {
    let rows = holidays::holidays_between(conn, country, first, last)?;
    Ok(compute_norm(schedule, first, last, &rows))
}
