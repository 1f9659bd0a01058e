//! Administrative edits: users, tags, holidays and manual status changes.

use crate::db::holidays::upsert_holiday;
use crate::db::ledger::{self, Stamp};
use crate::db::log::ttlog_quiet;
use crate::db::pool::DbPool;
use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::models::country::Country;
use crate::models::holiday::Holiday;
use crate::models::status::Status;
use chrono::{NaiveDate, NaiveDateTime};

pub struct AdminLogic;

impl AdminLogic {
    pub fn add_user(pool: &mut DbPool, name: Option<&str>, country: &str) -> AppResult<i64> {
        if Country::from_code(country).is_none() {
            return Err(AppError::InvalidCountry(country.to_string()));
        }

        let id = queries::insert_user(&pool.conn, name, country)?;
        ttlog_quiet(
            &pool.conn,
            "user",
            &format!("user {id}"),
            &format!("Created user {} ({country})", name.unwrap_or("")),
        );
        Ok(id)
    }

    /// Bind `tag` to `user_id` (or release it with `None`).
    pub fn assign_tag(
        pool: &mut DbPool,
        tag: &str,
        user_id: Option<i64>,
        now: NaiveDateTime,
    ) -> AppResult<()> {
        if let Some(id) = user_id
            && queries::load_user(&pool.conn, id)?.is_none()
        {
            return Err(AppError::UnknownUser(id));
        }

        let serial = now.format("%Y-%m-%dT%H:%M:%S%.f").to_string();
        queries::assign_tag(&pool.conn, tag, &serial, user_id)?;

        let message = match user_id {
            Some(id) => format!("Tag assigned to user {id}"),
            None => "Tag released".to_string(),
        };
        ttlog_quiet(&pool.conn, "tag", tag, &message);
        Ok(())
    }

    pub fn set_holiday(
        pool: &mut DbPool,
        day: NaiveDate,
        country: &str,
        deduction: i64,
    ) -> AppResult<()> {
        if Country::from_code(country).is_none() {
            return Err(AppError::InvalidCountry(country.to_string()));
        }

        let holiday = Holiday {
            day,
            country: country.to_string(),
            deduction,
        };
        upsert_holiday(&pool.conn, &holiday)?;

        let what = if holiday.is_whole_day() {
            "whole day off".to_string()
        } else {
            format!("{deduction} min shorter")
        };
        ttlog_quiet(&pool.conn, "holiday", &format!("{day} {country}"), &what);
        Ok(())
    }

    /// Log a user in or out by hand. The event carries `LoggedByAdmin`,
    /// which the user's next own toggle clears.
    pub fn set_status(
        pool: &mut DbPool,
        user_id: i64,
        logged_in: bool,
        now: NaiveDateTime,
    ) -> AppResult<(Status, Stamp)> {
        let user = queries::load_user(&pool.conn, user_id)?.ok_or(AppError::UnknownUser(user_id))?;

        let base = if logged_in {
            Status::LOGGED_IN
        } else {
            Status::LOGGED_OUT
        };
        let new_status = base.with(Status::LOGGED_BY_ADMIN);

        let appended = ledger::compare_and_append(&mut pool.conn, user_id, user.status, new_status)?;
        let stamp = Stamp::resolve(appended.at, now);

        ttlog_quiet(
            &pool.conn,
            "admin",
            &format!("user {user_id}"),
            &format!(
                "{} logged {} by admin (event {})",
                user.display_name(),
                new_status.in_or_out(),
                appended.event_id
            ),
        );
        Ok((new_status, stamp))
    }
}
