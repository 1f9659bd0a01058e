// src/export/range.rs

use crate::errors::{AppError, AppResult};
use chrono::{Datelike, NaiveDate};

fn bad(what: &str, raw: &str) -> AppError {
    AppError::InvalidDate(format!("{what}: '{raw}'"))
}

/// First and last day of one period: `YYYY`, `YYYY-MM` or `YYYY-MM-DD`.
fn period_bounds(p: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    match p.len() {
        4 => {
            let y: i32 = p.parse().map_err(|_| bad("invalid year", p))?;
            let first = NaiveDate::from_ymd_opt(y, 1, 1).ok_or_else(|| bad("invalid year", p))?;
            let last = NaiveDate::from_ymd_opt(y, 12, 31).ok_or_else(|| bad("invalid year", p))?;
            Ok((first, last))
        }
        7 => {
            let first = NaiveDate::parse_from_str(&format!("{p}-01"), "%Y-%m-%d")
                .map_err(|_| bad("invalid month", p))?;
            let next = if first.month() == 12 {
                NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
            } else {
                NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
            }
            .ok_or_else(|| bad("invalid month", p))?;
            let last = next.pred_opt().ok_or_else(|| bad("invalid month", p))?;
            Ok((first, last))
        }
        10 => {
            let d = NaiveDate::parse_from_str(p, "%Y-%m-%d").map_err(|_| bad("invalid date", p))?;
            Ok((d, d))
        }
        _ => Err(bad("unsupported range format", p)),
    }
}

/// Parse --range (year / month / day / interval).
///
/// Supports:
/// - YYYY
/// - YYYY-MM
/// - YYYY-MM-DD
/// - any of the above as `start:end`, both sides in the same format
pub fn parse_range(r: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    if let Some((start_raw, end_raw)) = r.split_once(':') {
        let start = start_raw.trim();
        let end = end_raw.trim();

        if start.len() != end.len() {
            return Err(bad("start and end must have the same format", r));
        }

        let (first, _) = period_bounds(start)?;
        let (_, last) = period_bounds(end)?;
        if last < first {
            return Err(bad("range ends before it starts", r));
        }
        Ok((first, last))
    } else {
        period_bounds(r.trim())
    }
}
