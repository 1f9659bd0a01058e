pub mod admin;
pub mod backup;
pub mod config;
pub mod db;
pub mod export;
pub mod holiday;
pub mod init;
pub mod log;
pub mod report;
pub mod run;
pub mod sweep;
pub mod tag;
pub mod tap;
pub mod user;
