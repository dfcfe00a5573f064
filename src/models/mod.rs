pub mod client;
pub mod day_summary;
pub mod theme;
pub mod time_entry;

pub use client::Client;
pub use day_summary::DaySummary;
pub use theme::{Rgb, Theme, ThemeMode};
pub use time_entry::{OpenSession, TimeEntry};
