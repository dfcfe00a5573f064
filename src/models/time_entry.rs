use super::client::Client;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::Serialize;

/// One clock-in/clock-out session against a client.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeEntry {
    pub id: i64,
    pub client_id: i64,
    pub clock_in: DateTime<Utc>,
    /// `None` while the session is running.
    pub clock_out: Option<DateTime<Utc>>,
    pub hours_worked: Option<f64>,
    pub earnings: Option<f64>,
    pub created_at: String,
}

impl TimeEntry {
    /// Calendar day of the clock-in as seen in `tz`.
    pub fn local_date<Tz: TimeZone>(&self, tz: &Tz) -> NaiveDate {
        self.clock_in.with_timezone(tz).date_naive()
    }
}

/// The running session together with the client it bills.
#[derive(Debug, Clone)]
pub struct OpenSession {
    pub entry: TimeEntry,
    pub client: Client,
}

impl OpenSession {
    pub fn elapsed_seconds(&self, now: &DateTime<Utc>) -> i64 {
        (*now - self.entry.clock_in).num_seconds()
    }

    /// Earnings accrued so far at the client's current rate.
    pub fn running_earnings(&self, now: &DateTime<Utc>) -> f64 {
        self.elapsed_seconds(now).max(0) as f64 / 3600.0 * self.client.hourly_rate
    }
}
