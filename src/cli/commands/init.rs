use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::initialize::open_initialized;
use crate::db::log;
use crate::errors::AppResult;
use crate::ui::messages::{success, warning};

/// Handle the `init` command
///
/// Creates the config directory and file (unless in test mode), the SQLite
/// database and its schema.
pub fn handle(cli: &Cli) -> AppResult<()> {
    let db_path = Config::init_all(cli.db.clone(), cli.test)?;
    let db_path = db_path.to_string_lossy().to_string();

    println!("⚙️  Initializing rtagclock…");
    let pool = open_initialized(&db_path)?;
    success(format!("Database initialized at {db_path}"));

    if let Err(e) = log::ttlog(
        &pool.conn,
        "init",
        "Database initialized",
        &format!("Database initialized at {db_path}"),
    ) {
        warning(format!("Failed to write internal log: {e}"));
    }

    println!("🎉 rtagclock initialization completed!");
    Ok(())
}
