pub mod holidays;
pub mod initialize;
pub mod ledger;
pub mod log;
pub mod migrate;
pub mod pool;
pub mod queries;
pub mod stats;

/// Text format of `loggings.date`, as produced by the store.
pub const TS_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Text format of `holidays.day`.
pub const DAY_FORMAT: &str = "%Y-%m-%d";
