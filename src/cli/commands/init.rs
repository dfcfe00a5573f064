use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::log::ttlog_soft;
use crate::errors::AppResult;
use crate::ui::messages::{detail, info, success};

/// Handle the `init` command
///
/// This initializes:
///  - the config directory and file (skipped in test mode)
///  - the SQLite database file
///  - all pending DB migrations
pub fn handle(cli: &Cli) -> AppResult<()> {
    let cfg = Config::init_all(cli.db.as_deref(), cli.test)?;

    info("Initializing timely…");
    if !cli.test {
        detail("Config file", Config::config_file().display());
    }
    detail("Database", &cfg.database);

    let pool = crate::db::open(&cfg.database)?;

    ttlog_soft(
        &pool.conn,
        "init",
        "database",
        &format!("Database initialized at {}", &cfg.database),
    );

    success(format!("Database initialized at {}", &cfg.database));
    Ok(())
}
