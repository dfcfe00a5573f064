use crate::errors::{AppError, AppResult};
use crate::models::{Client, TimeEntry};
use crate::utils::date::{from_db_timestamp, to_db_timestamp};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

const CLIENT_COLUMNS: &str = "id, name, hourly_rate, created_at";
const ENTRY_COLUMNS: &str =
    "id, client_id, clock_in, clock_out, hours_worked, earnings, created_at";

// ---------------------------
// Row mapping
// ---------------------------

pub fn map_client(row: &Row) -> Result<Client> {
    Ok(Client {
        id: row.get("id")?,
        name: row.get("name")?,
        hourly_rate: row.get("hourly_rate")?,
        created_at: row.get("created_at")?,
    })
}

fn timestamp_column(raw: &str, idx: usize) -> Result<DateTime<Utc>> {
    from_db_timestamp(raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

pub fn map_entry(row: &Row) -> Result<TimeEntry> {
    let clock_in_str: String = row.get("clock_in")?;
    let clock_out_str: Option<String> = row.get("clock_out")?;

    let clock_in = timestamp_column(&clock_in_str, 2)?;
    let clock_out = match clock_out_str {
        Some(s) => Some(timestamp_column(&s, 3)?),
        None => None,
    };

    Ok(TimeEntry {
        id: row.get("id")?,
        client_id: row.get("client_id")?,
        clock_in,
        clock_out,
        hours_worked: row.get("hours_worked")?,
        earnings: row.get("earnings")?,
        created_at: row.get("created_at")?,
    })
}

// ---------------------------
// Clients
// ---------------------------

pub fn insert_client(conn: &Connection, name: &str, rate: f64) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO clients (name, hourly_rate, created_at) VALUES (?1, ?2, ?3)",
        params![name, rate, to_db_timestamp(&Utc::now())],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn update_client(conn: &Connection, id: i64, name: &str, rate: f64) -> AppResult<usize> {
    let n = conn.execute(
        "UPDATE clients SET name = ?1, hourly_rate = ?2 WHERE id = ?3",
        params![name, rate, id],
    )?;
    Ok(n)
}

/// Delete a client and all of its time entries in one transaction.
/// Returns the number of entries removed, or `None` if the client is unknown.
pub fn delete_client_cascade(conn: &mut Connection, id: i64) -> AppResult<Option<usize>> {
    let tx = conn.transaction()?;

    let entries = tx.execute("DELETE FROM time_entries WHERE client_id = ?1", [id])?;
    let clients = tx.execute("DELETE FROM clients WHERE id = ?1", [id])?;

    if clients == 0 {
        // Nothing to commit: dropping `tx` rolls back.
        return Ok(None);
    }

    tx.commit()?;
    Ok(Some(entries))
}

/// All clients, newest first.
pub fn load_clients(conn: &Connection) -> AppResult<Vec<Client>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {CLIENT_COLUMNS} FROM clients ORDER BY created_at DESC, id DESC"
    ))?;

    let rows = stmt.query_map([], map_client)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn load_client(conn: &Connection, id: i64) -> AppResult<Option<Client>> {
    let client = conn
        .query_row(
            &format!("SELECT {CLIENT_COLUMNS} FROM clients WHERE id = ?1"),
            [id],
            map_client,
        )
        .optional()?;
    Ok(client)
}

pub fn require_client(conn: &Connection, id: i64) -> AppResult<Client> {
    load_client(conn, id)?.ok_or_else(|| AppError::NotFound(format!("client #{id}")))
}

// ---------------------------
// Time entries
// ---------------------------

pub fn insert_entry(conn: &Connection, client_id: i64, clock_in: &DateTime<Utc>) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO time_entries (client_id, clock_in, created_at) VALUES (?1, ?2, ?3)",
        params![
            client_id,
            to_db_timestamp(clock_in),
            to_db_timestamp(&Utc::now())
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn load_entry(conn: &Connection, id: i64) -> AppResult<Option<TimeEntry>> {
    let entry = conn
        .query_row(
            &format!("SELECT {ENTRY_COLUMNS} FROM time_entries WHERE id = ?1"),
            [id],
            map_entry,
        )
        .optional()?;
    Ok(entry)
}

/// The running session, if any (most recent first should several exist in a
/// legacy database).
pub fn load_open_entry(conn: &Connection) -> AppResult<Option<TimeEntry>> {
    let entry = conn
        .query_row(
            &format!(
                "SELECT {ENTRY_COLUMNS} FROM time_entries
                 WHERE clock_out IS NULL
                 ORDER BY clock_in DESC
                 LIMIT 1"
            ),
            [],
            map_entry,
        )
        .optional()?;
    Ok(entry)
}

/// Set clock-out, hours and earnings in a single statement. The
/// `clock_out IS NULL` guard makes a second close a no-op (returns 0).
pub fn close_entry(
    conn: &Connection,
    id: i64,
    clock_out: &DateTime<Utc>,
    hours: f64,
    earnings: f64,
) -> AppResult<usize> {
    let n = conn.execute(
        "UPDATE time_entries
            SET clock_out = ?1, hours_worked = ?2, earnings = ?3
          WHERE id = ?4 AND clock_out IS NULL",
        params![to_db_timestamp(clock_out), hours, earnings, id],
    )?;
    Ok(n)
}

/// Entries of one client, ascending by clock-in. `window` is a half-open
/// UTC interval `[from, to)`.
pub fn load_entries(
    conn: &Connection,
    client_id: i64,
    window: Option<(DateTime<Utc>, DateTime<Utc>)>,
) -> AppResult<Vec<TimeEntry>> {
    let mut out = Vec::new();

    match window {
        None => {
            let mut stmt = conn.prepare(&format!(
                "SELECT {ENTRY_COLUMNS} FROM time_entries
                 WHERE client_id = ?1
                 ORDER BY clock_in ASC, id ASC"
            ))?;
            let rows = stmt.query_map([client_id], map_entry)?;
            for r in rows {
                out.push(r?);
            }
        }
        Some((from, to)) => {
            let mut stmt = conn.prepare(&format!(
                "SELECT {ENTRY_COLUMNS} FROM time_entries
                 WHERE client_id = ?1 AND clock_in >= ?2 AND clock_in < ?3
                 ORDER BY clock_in ASC, id ASC"
            ))?;
            let rows = stmt.query_map(
                params![client_id, to_db_timestamp(&from), to_db_timestamp(&to)],
                map_entry,
            )?;
            for r in rows {
                out.push(r?);
            }
        }
    }

    Ok(out)
}

pub fn count_entries(conn: &Connection, client_id: i64) -> AppResult<i64> {
    let n = conn.query_row(
        "SELECT COUNT(*) FROM time_entries WHERE client_id = ?1",
        [client_id],
        |r| r.get(0),
    )?;
    Ok(n)
}
