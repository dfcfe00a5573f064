use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::log::load_log;
use crate::errors::AppResult;
use crate::ui::messages::{header, info};
use crate::utils::table::Table;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if matches!(cmd, Commands::Log { print: true }) {
        let pool = crate::db::open(&cfg.database)?;
        let rows = load_log(&pool.conn)?;

        if rows.is_empty() {
            info("The internal log is empty.");
            return Ok(());
        }

        header("Internal log");

        let mut table = Table::new(["ID", "Date", "Operation", "Message"]);
        for r in rows {
            let op = if r.target.is_empty() {
                r.operation
            } else {
                format!("{} ({})", r.operation, r.target)
            };
            table.add_row(vec![r.id.to_string(), r.date, op, r.message]);
        }
        print!("{}", table.render());
    }

    Ok(())
}
