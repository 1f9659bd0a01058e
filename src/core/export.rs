use crate::db::ledger::events_between;
use crate::db::log::ttlog_quiet;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::export::{
    EventExport, ExportFormat, ensure_writable, export_csv, export_json, parse_range,
};
use crate::ui::messages::warning;
use crate::utils::date::start_of;
use crate::utils::path::expand_tilde;
use chrono::{Duration, NaiveDate};

pub struct ExportLogic;

impl ExportLogic {
    /// Export ledger events.
    ///
    /// - `range`: `None`, `"all"` or `YYYY`, `YYYY-MM`, `YYYY-MM-DD`,
    ///   optionally as `start:end`
    ///
    /// Returns the number of exported events.
    pub fn export(
        pool: &mut DbPool,
        format: ExportFormat,
        file: &str,
        range: Option<&str>,
        force: bool,
    ) -> AppResult<usize> {
        let path = expand_tilde(file);
        if path.as_os_str().is_empty() {
            return Err(AppError::Export("empty output path".to_string()));
        }

        ensure_writable(&path, force)?;

        let (first, last) = match range {
            None => all_time(),
            Some(r) if r.eq_ignore_ascii_case("all") => all_time(),
            Some(r) => parse_range(r)?,
        };

        let rows = events_between(
            &pool.conn,
            start_of(first),
            start_of(last + Duration::days(1)),
        )?;

        if rows.is_empty() {
            warning("No events found for the selected range. Nothing to export.");
            return Ok(0);
        }

        let events: Vec<EventExport> = rows.iter().map(EventExport::from).collect();

        match format {
            ExportFormat::Csv => export_csv(&events, &path)?,
            ExportFormat::Json => export_json(&events, &path)?,
        }

        ttlog_quiet(
            &pool.conn,
            "export",
            &path.to_string_lossy(),
            &format!("{} events exported as {}", events.len(), format.as_str()),
        );

        Ok(events.len())
    }
}

/// Widest range whose bounds still compare correctly as `YYYY-MM-DD` text.
fn all_time() -> (NaiveDate, NaiveDate) {
    (
        NaiveDate::from_ymd_opt(1, 1, 1).unwrap_or(NaiveDate::MIN),
        NaiveDate::from_ymd_opt(9998, 12, 31).unwrap_or(NaiveDate::MAX),
    )
}
