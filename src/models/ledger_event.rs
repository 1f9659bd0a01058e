use super::status::Status;
use chrono::NaiveDateTime;
use serde::Serialize;

/// One row of the `loggings` ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerEvent {
    pub event_id: i64,
    pub user_id: i64,
    pub status: Status,
    pub at: NaiveDateTime,
}

impl LedgerEvent {
    pub fn new(event_id: i64, user_id: i64, status: Status, at: NaiveDateTime) -> Self {
        Self {
            event_id,
            user_id,
            status,
            at,
        }
    }
}
