use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::migrate::run_pending_migrations;
use crate::db::pool::DbPool;
use crate::db::stats;
use crate::errors::AppResult;
use crate::ui::messages::{error, info, success, warning};

/// SQLite page check plus the ledger's own invariants.
fn check(pool: &DbPool) -> AppResult<bool> {
    let mut ok = true;

    let pages: String = pool
        .conn
        .query_row("PRAGMA integrity_check;", [], |row| row.get(0))?;
    if pages != "ok" {
        error(format!("SQLite integrity check failed: {pages}"));
        ok = false;
    }

    for name in stats::missing_ledger_guards(pool)? {
        error(format!("Ledger trigger '{name}' is missing; run `db --migrate`."));
        ok = false;
    }

    for (user_id, cached, ledger) in stats::status_mismatches(pool)? {
        warning(format!(
            "User {user_id}: status {cached} but last ledger event says {ledger}."
        ));
        ok = false;
    }

    Ok(ok)
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Db {
        migrate,
        check: run_check,
        vacuum,
        info: show_info,
    } = cmd
    else {
        return Ok(());
    };

    let mut pool = DbPool::new(&cfg.database)?;

    if *migrate {
        info("Running migrations…");
        run_pending_migrations(&pool.conn)?;
        success("Migration completed.");
    }

    if *show_info {
        stats::print_db_info(&mut pool, &cfg.database)?;
    }

    if *run_check {
        info("Running integrity check…");
        if check(&pool)? {
            success("Integrity check passed.");
        } else {
            warning("Integrity check found problems.");
        }
    }

    if *vacuum {
        info("Running VACUUM…");
        pool.conn.execute_batch("VACUUM;")?;
        success("Vacuum completed.");
    }

    Ok(())
}
