use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::clock::ClockLogic;
use crate::db::queries::require_client;
use crate::errors::AppResult;
use crate::ui::messages::{detail, header, info, success};
use crate::utils::date::timestamp_or_now;
use crate::utils::formatting::{hours2readable, money};
use crate::utils::time::{clock_in_zone, format_elapsed};
use chrono::{Local, Utc};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let mut pool = crate::db::open(&cfg.database)?;

    match cmd {
        Commands::In { client_id, at } => {
            let at = timestamp_or_now(at.as_ref())?;
            let entry = ClockLogic::clock_in(&mut pool, *client_id, at)?;
            let client = require_client(&pool.conn, entry.client_id)?;

            success(format!(
                "Clocked in for '{}' at {} (entry #{}).",
                client.name,
                clock_in_zone(&entry.clock_in, &Local),
                entry.id
            ));
        }

        Commands::Out { at } => {
            let at = timestamp_or_now(at.as_ref())?;
            let (entry, client) = ClockLogic::clock_out(&mut pool, at)?;

            let hours = entry.hours_worked.unwrap_or_default();
            let earnings = entry.earnings.unwrap_or_default();

            success(format!("Clocked out of '{}'.", client.name));
            detail("Worked", format!("{} h", hours2readable(hours)));
            detail("Earned", money(&cfg.currency_symbol, earnings));
        }

        Commands::Status => match ClockLogic::current(&mut pool)? {
            Some(session) => {
                let now = Utc::now();
                header("Running session");
                detail("Client", format!("#{} {}", session.client.id, session.client.name));
                detail(
                    "Since",
                    session
                        .entry
                        .clock_in
                        .with_timezone(&Local)
                        .format("%Y-%m-%d %H:%M"),
                );
                detail("Elapsed", format_elapsed(session.elapsed_seconds(&now)));
                detail(
                    "Earnings",
                    money(&cfg.currency_symbol, session.running_earnings(&now)),
                );
            }
            None => info("Not clocked in."),
        },

        _ => {}
    }

    Ok(())
}
