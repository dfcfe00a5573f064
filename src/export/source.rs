use crate::db::pool::DbPool;
use crate::db::queries::{load_clients, load_entries};
use crate::errors::AppResult;
use crate::models::{Client, TimeEntry};
use crate::utils::date::local_range_utc;
use chrono::{NaiveDate, TimeZone};

/// The two reads a timesheet export needs from the record store.
pub trait TimesheetSource {
    fn list_clients(&mut self) -> AppResult<Vec<Client>>;

    /// Entries of `client_id` whose clock-in falls on a calendar day in
    /// `[start, end]`, ascending by clock-in.
    fn list_time_entries(
        &mut self,
        client_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Vec<TimeEntry>>;
}

/// SQLite-backed source; calendar days are interpreted in `tz`.
pub struct StoreSource<'a, Tz: TimeZone> {
    pool: &'a DbPool,
    tz: Tz,
}

impl<'a, Tz: TimeZone> StoreSource<'a, Tz> {
    pub fn new(pool: &'a DbPool, tz: Tz) -> Self {
        Self { pool, tz }
    }
}

impl<Tz: TimeZone> TimesheetSource for StoreSource<'_, Tz> {
    fn list_clients(&mut self) -> AppResult<Vec<Client>> {
        load_clients(&self.pool.conn)
    }

    fn list_time_entries(
        &mut self,
        client_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Vec<TimeEntry>> {
        let window = local_range_utc(start, end, &self.tz);
        load_entries(&self.pool.conn, client_id, Some(window))
    }
}
