use crate::db::DAY_FORMAT;
use crate::errors::{AppError, AppResult};
use crate::models::holiday::Holiday;
use chrono::NaiveDate;
use rusqlite::{Connection, params};

fn parse_day(raw: String) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(&raw, DAY_FORMAT).map_err(|_| AppError::InvalidDate(raw))
}

/// Holiday rows with a non-zero deduction for `country` in `[first, last]`.
pub fn holidays_between(
    conn: &Connection,
    country: &str,
    first: NaiveDate,
    last: NaiveDate,
) -> AppResult<Vec<Holiday>> {
    let mut stmt = conn.prepare_cached(
        "SELECT day, country, deduction FROM holidays
         WHERE country = ?1 AND day >= ?2 AND day <= ?3 AND deduction != 0
         ORDER BY day",
    )?;

    let rows = stmt.query_map(
        params![
            country,
            first.format(DAY_FORMAT).to_string(),
            last.format(DAY_FORMAT).to_string()
        ],
        |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, i64>(2)?,
            ))
        },
    )?;

    let mut out = Vec::new();
    for r in rows {
        let (day, country, deduction) = r?;
        out.push(Holiday {
            day: parse_day(day)?,
            country,
            deduction,
        });
    }
    Ok(out)
}

pub fn list_holidays(conn: &Connection, country: Option<&str>) -> AppResult<Vec<Holiday>> {
    let mut stmt = conn.prepare(
        "SELECT day, country, deduction FROM holidays
         WHERE ?1 IS NULL OR country = ?1
         ORDER BY day, country",
    )?;

    let rows = stmt.query_map([country], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, i64>(2)?,
        ))
    })?;

    let mut out = Vec::new();
    for r in rows {
        let (day, country, deduction) = r?;
        out.push(Holiday {
            day: parse_day(day)?,
            country,
            deduction,
        });
    }
    Ok(out)
}

/// Insert or replace the deduction of one country on one day.
pub fn upsert_holiday(conn: &Connection, holiday: &Holiday) -> AppResult<()> {
    conn.execute(
        "INSERT INTO holidays (day, country, deduction) VALUES (?1, ?2, ?3)
         ON CONFLICT(day, country) DO UPDATE SET deduction = excluded.deduction",
        params![
            holiday.day.format(DAY_FORMAT).to_string(),
            holiday.country,
            holiday.deduction
        ],
    )?;
    Ok(())
}
