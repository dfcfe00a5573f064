use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::initialize::init_db;
use crate::db::log::ttlog_soft;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::utils::colors::{CYAN, GREEN, RED, RESET};

fn step(title: &str) {
    println!("{CYAN}▶ {title}…{RESET}");
}

fn done(msg: &str) {
    println!("{GREEN}✔ {msg}{RESET}\n");
}

/// `PRAGMA integrity_check` returns a single "ok" row on a healthy file,
/// otherwise one row per problem found.
fn integrity_problems(pool: &DbPool) -> AppResult<Vec<String>> {
    let mut stmt = pool.conn.prepare("PRAGMA integrity_check;")?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

    let mut problems = Vec::new();
    for r in rows {
        let line = r?;
        if line != "ok" {
            problems.push(line);
        }
    }
    Ok(problems)
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Db {
        migrate,
        check,
        vacuum,
    } = cmd
    else {
        return Ok(());
    };

    let pool = DbPool::new(&cfg.database)?;

    if *migrate {
        step(&format!("Migrating {}", cfg.database));
        init_db(&pool.conn)?;
        ttlog_soft(&pool.conn, "db", "migrate", "Pending migrations applied");
        done("Schema is up to date.");
    }

    if *check {
        step("Checking database integrity");
        let problems = integrity_problems(&pool)?;
        if problems.is_empty() {
            done("Integrity check passed.");
        } else {
            println!("{RED}✘ Integrity check failed ({} issues):{RESET}", problems.len());
            for p in problems {
                println!("   {p}");
            }
            println!();
        }
    }

    if *vacuum {
        step("Compacting database");
        pool.conn.execute_batch("VACUUM;")?;
        done("Vacuum completed.");
    }

    Ok(())
}
