use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::sweep::run_sweep;
use crate::db::initialize::open_initialized;
use crate::errors::AppResult;
use crate::terminal::{Clock, SystemClock};
use crate::ui::messages::info;
use crate::ui::report::render_sweep;
use crate::ui::sink::ConsoleSink;

/// Sweep on demand, regardless of the closing latch.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Sweep = cmd {
        let mut pool = open_initialized(&cfg.database)?;
        let report = run_sweep(&mut pool, SystemClock.now())?;

        if report.logged_out.is_empty() && report.skipped.is_empty() {
            info("Nobody is logged in.");
        } else {
            render_sweep(&mut ConsoleSink, &report);
        }
    }

    Ok(())
}
