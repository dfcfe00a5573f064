use crate::cli::parser::{ClientAction, Commands};
use crate::config::Config;
use crate::core::clients::ClientLogic;
use crate::errors::AppResult;
use crate::ui::messages::{header, info, success, warning};
use crate::utils::formatting::money;
use crate::utils::table::Table;

use std::io::{self, Write};

/// Ask a yes/no confirmation from the user
fn ask_confirmation(prompt: &str) -> bool {
    warning(prompt);
    print!("Confirm [y/N]: ");
    let _ = io::stdout().flush();

    let mut s = String::new();
    if io::stdin().read_line(&mut s).is_ok() {
        matches!(s.trim().to_lowercase().as_str(), "y" | "yes")
    } else {
        false
    }
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Client { action } = cmd else {
        return Ok(());
    };

    let mut pool = crate::db::open(&cfg.database)?;

    match action {
        ClientAction::Add { name, rate } => {
            let client = ClientLogic::add(&mut pool, name, *rate)?;
            success(format!(
                "Client #{} '{}' added ({}/h).",
                client.id,
                client.name,
                money(&cfg.currency_symbol, client.hourly_rate)
            ));
        }

        ClientAction::Edit { id, name, rate } => {
            let client = ClientLogic::update(&mut pool, *id, name.as_deref(), *rate)?;
            success(format!(
                "Client #{} is now '{}' ({}/h).",
                client.id,
                client.name,
                money(&cfg.currency_symbol, client.hourly_rate)
            ));
        }

        ClientAction::Del { id, yes } => {
            let prompt = format!(
                "Delete client #{} and ALL of its time entries? This action is irreversible.",
                id
            );

            if !*yes && !ask_confirmation(&prompt) {
                info("Operation cancelled.");
                return Ok(());
            }

            let removed = ClientLogic::delete(&mut pool, *id)?;
            success(format!(
                "Client #{} deleted together with {} time entries.",
                id, removed
            ));
        }

        ClientAction::List => {
            let clients = ClientLogic::list(&mut pool)?;

            if clients.is_empty() {
                info("No clients yet. Add one with `timely client add <NAME> --rate <RATE>`.");
                return Ok(());
            }

            header("Clients");

            let mut table = Table::new(["ID", "Name", "Rate/h", "Created"]);
            for c in clients {
                table.add_row(vec![
                    c.id.to_string(),
                    c.name,
                    money(&cfg.currency_symbol, c.hourly_rate),
                    c.created_at,
                ]);
            }
            print!("{}", table.render());
        }
    }

    Ok(())
}
