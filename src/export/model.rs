// src/export/model.rs

use crate::db::TS_FORMAT;
use crate::db::ledger::LedgerRow;
use crate::models::user::display_name;
use serde::Serialize;

/// Flat ledger row for CSV / JSON.
#[derive(Serialize, Clone, Debug)]
pub struct EventExport {
    pub event_id: i64,
    pub user_id: i64,
    pub user_name: String,
    pub timestamp: String,
    pub state: String,
    pub auto_logout: bool,
    pub by_admin: bool,
    pub status_bits: u8,
}

impl From<&LedgerRow> for EventExport {
    fn from(row: &LedgerRow) -> Self {
        let status = row.event.status;
        Self {
            event_id: row.event.event_id,
            user_id: row.event.user_id,
            user_name: display_name(row.user_name.as_deref()),
            timestamp: row.event.at.format(TS_FORMAT).to_string(),
            state: status.in_or_out().to_string(),
            auto_logout: status.is_auto_log_out(),
            by_admin: status.is_logged_by_admin(),
            status_bits: status.bits(),
        }
    }
}
