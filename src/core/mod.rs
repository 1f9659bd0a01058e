pub mod admin;
pub mod attendance;
pub mod backup;
pub mod calculator;
pub mod export;
pub mod log;
pub mod sweep;
