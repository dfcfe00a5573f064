use crate::ui::messages::success;
use rusqlite::{Connection, OptionalExtension, Result};

/// Ensure that the `log` table exists. Migration markers live there too.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn table_exists(conn: &Connection, name: &str) -> Result<bool> {
    let mut stmt = conn.prepare("SELECT name FROM sqlite_master WHERE type='table' AND name=?1")?;
    let exists: Option<String> = stmt.query_row([name], |row| row.get(0)).optional()?;
    Ok(exists.is_some())
}

fn create_clients_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS clients (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            name         TEXT NOT NULL CHECK(length(trim(name)) > 0),
            hourly_rate  REAL NOT NULL CHECK(hourly_rate > 0),
            created_at   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn create_time_entries_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS time_entries (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            client_id     INTEGER NOT NULL REFERENCES clients(id),
            clock_in      TEXT NOT NULL,
            clock_out     TEXT,
            hours_worked  REAL,
            earnings      REAL,
            created_at    TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_entries_client_clock_in
            ON time_entries(client_id, clock_in);
        "#,
    )?;
    Ok(())
}

fn migration_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn mark_applied(conn: &Connection, version: &str, message: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'), 'migration_applied', ?1, ?2)",
        [version, message],
    )?;
    Ok(())
}

/// At most one running session: a partial unique index over the
/// `clock_out IS NULL` rows, all of which index to the same value.
fn migrate_single_open_session_index(conn: &Connection) -> Result<()> {
    let version = "20250301_0002_single_open_session";

    if migration_applied(conn, version)? {
        return Ok(());
    }

    conn.execute_batch(
        r#"
        CREATE UNIQUE INDEX IF NOT EXISTS idx_entries_single_open
            ON time_entries((clock_out IS NULL))
            WHERE clock_out IS NULL;
        "#,
    )?;

    mark_applied(conn, version, "Enforce a single open time entry")?;
    success(format!("Migration applied: {version}"));
    Ok(())
}

/// Public entry point: run all pending migrations.
///
/// Invoked by db::init_db().
pub fn run_pending_migrations(conn: &Connection) -> Result<()> {
    ensure_log_table(conn)?;

    if !table_exists(conn, "clients")? {
        create_clients_table(conn)?;
        success("Created clients table.");
    }

    if !table_exists(conn, "time_entries")? {
        create_time_entries_table(conn)?;
        success("Created time_entries table.");
    }

    migrate_single_open_session_index(conn)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_pending_migrations(&conn).unwrap();
        run_pending_migrations(&conn).unwrap();

        let markers: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM log WHERE operation = 'migration_applied'",
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(markers, 1);
        assert!(table_exists(&conn, "clients").unwrap());
        assert!(table_exists(&conn, "time_entries").unwrap());
    }

    #[test]
    fn second_open_row_violates_index() {
        let conn = Connection::open_in_memory().unwrap();
        run_pending_migrations(&conn).unwrap();
        conn.execute(
            "INSERT INTO clients (name, hourly_rate, created_at) VALUES ('A', 10, 'x')",
            [],
        )
        .unwrap();
        let insert = "INSERT INTO time_entries (client_id, clock_in, created_at)
                      VALUES (1, '2024-01-01T09:00:00Z', 'x')";
        conn.execute(insert, []).unwrap();
        assert!(conn.execute(insert, []).is_err());
    }
}
