use crate::cli::parser::{Commands, HolidayAction};
use crate::config::Config;
use crate::core::admin::AdminLogic;
use crate::db::holidays::list_holidays;
use crate::db::initialize::open_initialized;
use crate::errors::AppResult;
use crate::ui::messages::{success, warning};
use crate::utils::date::require_date;
use crate::utils::formatting::mins2readable;
use crate::utils::table::Table;

/// Stored deduction for a whole day off.
const WHOLE_DAY: i64 = -1;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Holiday { action } = cmd {
        let mut pool = open_initialized(&cfg.database)?;

        match action {
            HolidayAction::Add {
                date,
                country,
                minutes,
            } => {
                let day = require_date(date)?;
                let deduction = minutes.unwrap_or(WHOLE_DAY);
                AdminLogic::set_holiday(&mut pool, day, country, deduction)?;
                success(format!("Holiday {day} ({country}) saved."));
            }
            HolidayAction::List { country } => {
                let rows = list_holidays(&pool.conn, country.as_deref())?;
                if rows.is_empty() {
                    warning("No holidays found.");
                    return Ok(());
                }

                let mut table = Table::new(&["Day", "Country", "Deduction"]);
                for h in &rows {
                    let deduction = if h.is_whole_day() {
                        "whole day".to_string()
                    } else {
                        mins2readable(h.deduction, false, false)
                    };
                    table.add_row(vec![h.day.to_string(), h.country.clone(), deduction]);
                }
                print!("{}", table.render());
            }
        }
    }

    Ok(())
}
