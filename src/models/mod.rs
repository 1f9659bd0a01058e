pub mod country;
pub mod holiday;
pub mod ledger_event;
pub mod status;
pub mod tag;
pub mod user;
