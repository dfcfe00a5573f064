use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::queries::{load_entries, require_client};
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{header, info};
use crate::utils::date::{local_range_utc, require_date, today};
use crate::utils::formatting::money;
use crate::utils::table::Table;
use crate::utils::time::NO_TIME;
use chrono::Local;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Entries {
        client_id,
        from,
        to,
    } = cmd
    {
        let pool = crate::db::open(&cfg.database)?;
        let client = require_client(&pool.conn, *client_id)?;

        let window = match (from, to) {
            (None, None) => None,
            (from, to) => {
                let start = require_date("--from", from.as_deref())?;
                let end = match to {
                    Some(t) => require_date("--to", Some(t.as_str()))?,
                    None => today(),
                };
                if start > end {
                    return Err(AppError::Validation(format!(
                        "--from {start} is after --to {end}"
                    )));
                }
                Some(local_range_utc(start, end, &Local))
            }
        };

        let entries = load_entries(&pool.conn, client.id, window)?;

        if entries.is_empty() {
            info(format!("No time entries for '{}'.", client.name));
            return Ok(());
        }

        header(format!("Time entries for '{}'", client.name));

        let local = |t: &chrono::DateTime<chrono::Utc>| {
            t.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
        };

        let mut table = Table::new(["ID", "Clock in", "Clock out", "Hours", "Earnings"]);
        for e in entries {
            table.add_row(vec![
                e.id.to_string(),
                local(&e.clock_in),
                e.clock_out.as_ref().map_or_else(|| NO_TIME.to_string(), local),
                e.hours_worked.map_or_else(|| "-".into(), |h| format!("{h:.2}")),
                e.earnings
                    .map_or_else(|| "-".into(), |m| money(&cfg.currency_symbol, m)),
            ]);
        }
        print!("{}", table.render());
    }

    Ok(())
}
