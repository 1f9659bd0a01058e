use crate::cli::parser::{Commands, TagAction};
use crate::config::Config;
use crate::core::admin::AdminLogic;
use crate::db::initialize::open_initialized;
use crate::db::queries;
use crate::errors::AppResult;
use crate::terminal::{Clock, SystemClock};
use crate::ui::messages::{success, warning};
use crate::utils::table::Table;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Tag { action } = cmd {
        let mut pool = open_initialized(&cfg.database)?;

        match action {
            TagAction::Assign { tag, user_id } => {
                AdminLogic::assign_tag(&mut pool, tag, Some(*user_id), SystemClock.now())?;
                success(format!("Tag {tag} assigned to user {user_id}."));
            }
            TagAction::Unassign { tag } => {
                AdminLogic::assign_tag(&mut pool, tag, None, SystemClock.now())?;
                success(format!("Tag {tag} released."));
            }
            TagAction::List => {
                let tags = queries::list_tags(&pool.conn)?;
                if tags.is_empty() {
                    warning("No tags found.");
                    return Ok(());
                }

                let mut table = Table::new(&["Tag", "Serial", "User"]);
                for t in &tags {
                    table.add_row(vec![
                        t.rfid_id.clone(),
                        t.serial.clone(),
                        t.user_id.map(|id| id.to_string()).unwrap_or_else(|| "-".into()),
                    ]);
                }
                print!("{}", table.render());
            }
        }
    }

    Ok(())
}
