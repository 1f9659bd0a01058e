use crate::cli::parser::{AdminAction, Commands};
use crate::config::Config;
use crate::core::admin::AdminLogic;
use crate::db::initialize::open_initialized;
use crate::errors::AppResult;
use crate::terminal::{Clock, SystemClock};
use crate::ui::messages::{success, warning};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Admin { action } = cmd {
        let mut pool = open_initialized(&cfg.database)?;

        match action {
            AdminAction::Status { user_id, login, .. } => {
                let (status, stamp) =
                    AdminLogic::set_status(&mut pool, *user_id, *login, SystemClock.now())?;
                success(format!(
                    "User {user_id} logged {} by admin at {}.",
                    status.in_or_out(),
                    stamp.time().format("%Y-%m-%d %H:%M:%S")
                ));
                if stamp.is_degraded() {
                    warning("Time shown is local; it could not be read back from the database.");
                }
            }
        }
    }

    Ok(())
}
