use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::initialize::open_initialized;
use crate::db::log::ttlog_quiet;
use crate::errors::AppResult;
use crate::terminal::{LineReader, SystemClock, Terminal};
use crate::ui::sink::ConsoleSink;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Run { device, timeout_ms } = cmd {
        let mut cfg = cfg.clone();
        if let Some(d) = device {
            cfg.device = d.clone();
        }
        if let Some(ms) = timeout_ms {
            cfg.read_timeout_ms = *ms;
        }
        cfg.validate()?;

        let pool = open_initialized(&cfg.database)?;
        ttlog_quiet(&pool.conn, "run", &cfg.device, "Terminal started");
        tracing::info!(device = %cfg.device, db = %cfg.database, "terminal starting");

        let source = LineReader::from_device(&cfg.device);
        let mut terminal = Terminal::new(&cfg, pool, source, ConsoleSink, SystemClock);
        terminal.run()?;
    }

    Ok(())
}
