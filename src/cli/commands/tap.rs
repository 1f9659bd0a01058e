use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::attendance::AttendanceEngine;
use crate::db::initialize::open_initialized;
use crate::errors::AppResult;
use crate::terminal::{Clock, SystemClock};
use crate::ui::report::{render_outside_hours, render_toggle};
use crate::ui::sink::ConsoleSink;

/// One tag read, outside the terminal loop.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Tap { tag, ignore_hours } = cmd {
        let engine = AttendanceEngine::new(cfg);
        let now = SystemClock.now();
        let mut sink = ConsoleSink;

        if !*ignore_hours && !engine.accepts_logins_at(now) {
            render_outside_hours(&mut sink);
            return Ok(());
        }

        let mut pool = open_initialized(&cfg.database)?;
        let outcome = engine.toggle(&mut pool, tag.trim(), now)?;
        render_toggle(&mut sink, &outcome);
    }

    Ok(())
}
