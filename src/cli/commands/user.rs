use crate::cli::parser::{Commands, UserAction};
use crate::config::Config;
use crate::core::admin::AdminLogic;
use crate::db::initialize::open_initialized;
use crate::db::queries;
use crate::errors::AppResult;
use crate::ui::messages::{success, warning};
use crate::utils::table::Table;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::User { action } = cmd {
        let mut pool = open_initialized(&cfg.database)?;

        match action {
            UserAction::Add { name, country } => {
                let id = AdminLogic::add_user(&mut pool, name.as_deref(), country)?;
                success(format!("User {id} created ({country})."));
            }
            UserAction::List => {
                let users = queries::list_users(&pool.conn)?;
                if users.is_empty() {
                    warning("No users found.");
                    return Ok(());
                }

                let mut table = Table::new(&["ID", "Name", "Country", "Status", "Flags"]);
                for u in &users {
                    table.add_row(vec![
                        u.id.to_string(),
                        u.display_name(),
                        u.country.clone(),
                        u.status.in_or_out().to_string(),
                        u.status.to_string(),
                    ]);
                }
                print!("{}", table.render());
            }
        }
    }

    Ok(())
}
