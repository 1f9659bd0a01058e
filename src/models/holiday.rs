use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;

/// One row of the `holidays` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Holiday {
    pub day: NaiveDate,
    pub country: String,
    /// Minutes the day is shortened by; negative means the whole day is off.
    pub deduction: i64,
}

impl Holiday {
    pub fn is_whole_day(&self) -> bool {
        self.deduction < 0
    }

    pub fn is_weekend(&self) -> bool {
        matches!(self.day.weekday(), Weekday::Sat | Weekday::Sun)
    }
}
