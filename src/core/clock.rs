use crate::db::log::ttlog_soft;
use crate::db::pool::DbPool;
use crate::db::queries::{close_entry, insert_entry, load_entry, load_open_entry, require_client};
use crate::errors::{AppError, AppResult};
use crate::models::{Client, OpenSession, TimeEntry};
use crate::utils::time::{hours_between, round2};
use chrono::{DateTime, Utc};
use rusqlite::{ErrorCode, TransactionBehavior};

/// Clock-in / clock-out logic.
pub struct ClockLogic;

/// Hours and earnings stored on clock-out, both rounded to 2 decimals.
/// Earnings are computed from the unrounded hours.
pub fn settle(clock_in: &DateTime<Utc>, clock_out: &DateTime<Utc>, rate: f64) -> (f64, f64) {
    let hours = hours_between(clock_in, clock_out);
    (round2(hours), round2(hours * rate))
}

fn conflict_with(open: &TimeEntry) -> AppError {
    AppError::Conflict(format!(
        "time entry #{} for client #{} is still open since {}; clock out first",
        open.id, open.client_id, open.clock_in
    ))
}

impl ClockLogic {
    /// Start a session for `client_id`. Fails with `Conflict` if any session
    /// is already running.
    pub fn clock_in(pool: &mut DbPool, client_id: i64, at: DateTime<Utc>) -> AppResult<TimeEntry> {
        let tx = pool
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let client = require_client(&tx, client_id)?;

        if let Some(open) = load_open_entry(&tx)? {
            return Err(conflict_with(&open));
        }

        let id = match insert_entry(&tx, client_id, &at) {
            Ok(id) => id,
            Err(AppError::Db(rusqlite::Error::SqliteFailure(e, _)))
                if e.code == ErrorCode::ConstraintViolation =>
            {
                return Err(AppError::Conflict(
                    "another time entry is already open".into(),
                ));
            }
            Err(e) => return Err(e),
        };

        tx.commit()?;

        ttlog_soft(
            &pool.conn,
            "clock_in",
            &format!("#{id}"),
            &format!("Clocked in for '{}'", client.name),
        );

        load_entry(&pool.conn, id)?.ok_or_else(|| AppError::NotFound(format!("time entry #{id}")))
    }

    /// Close the running session at `at`.
    pub fn clock_out(pool: &mut DbPool, at: DateTime<Utc>) -> AppResult<(TimeEntry, Client)> {
        let open = load_open_entry(&pool.conn)?
            .ok_or_else(|| AppError::NotFound("no open time entry to clock out".into()))?;

        if at < open.clock_in {
            return Err(AppError::Validation(format!(
                "clock-out {} is before clock-in {}",
                at, open.clock_in
            )));
        }

        let client = require_client(&pool.conn, open.client_id)?;
        let (hours, earnings) = settle(&open.clock_in, &at, client.hourly_rate);

        if close_entry(&pool.conn, open.id, &at, hours, earnings)? == 0 {
            return Err(AppError::Conflict(format!(
                "time entry #{} was already clocked out",
                open.id
            )));
        }

        ttlog_soft(
            &pool.conn,
            "clock_out",
            &format!("#{}", open.id),
            &format!("{:.2} h, {:.2} earned for '{}'", hours, earnings, client.name),
        );

        let closed = load_entry(&pool.conn, open.id)?
            .ok_or_else(|| AppError::NotFound(format!("time entry #{}", open.id)))?;

        Ok((closed, client))
    }

    pub fn current(pool: &mut DbPool) -> AppResult<Option<OpenSession>> {
        match load_open_entry(&pool.conn)? {
            Some(entry) => {
                let client = require_client(&pool.conn, entry.client_id)?;
                Ok(Some(OpenSession { entry, client }))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn settle_rounds_hours_and_earnings() {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 3, 1, 10, 20, 0).unwrap();
        let (h, e) = settle(&start, &end, 30.0);
        assert_eq!(h, 1.33);
        // 1.3333.. * 30 = 40.00, not 1.33 * 30 = 39.90
        assert_eq!(e, 40.0);
    }
}
