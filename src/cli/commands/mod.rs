pub mod client;
pub mod clock;
pub mod config;
pub mod db;
pub mod entries;
pub mod export;
pub mod init;
pub mod log;
