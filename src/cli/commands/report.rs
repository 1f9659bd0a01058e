use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::attendance::AttendanceEngine;
use crate::db::initialize::open_initialized;
use crate::errors::AppResult;
use crate::ui::messages::header;
use crate::ui::report::render_week_outcome;
use crate::ui::sink::ConsoleSink;
use crate::utils::date::{require_date, start_of, today};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Report { user_id, date } = cmd {
        let day = match date {
            Some(d) => require_date(d)?,
            None => today(),
        };

        let pool = open_initialized(&cfg.database)?;
        let engine = AttendanceEngine::new(cfg);
        let (user, weekly) = engine.report_for_user(&pool.conn, *user_id, start_of(day))?;

        header(format!(
            "{} ({}) - logged {} - week of {}",
            user.display_name(),
            user.country,
            user.status.in_or_out(),
            day
        ));
        render_week_outcome(&mut ConsoleSink, &weekly);
    }

    Ok(())
}
