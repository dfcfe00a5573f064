use crate::export::ExportFormat;
use clap::{Parser, Subcommand};

/// Command-line interface definition for timely
/// Track billable hours per client and export timesheets
#[derive(Parser)]
#[command(
    name = "timely",
    version = env!("CARGO_PKG_VERSION"),
    about = "Track billable hours per client and export timesheets as PDF",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(long = "editor", help = "Editor to use (vim, nano, or custom path)")]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,
    },

    /// Print the internal audit log
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Manage clients
    Client {
        #[command(subcommand)]
        action: ClientAction,
    },

    /// Clock in for a client
    In {
        /// Client ID (see `timely client list`)
        client_id: i64,

        #[arg(long = "at", help = "Clock-in time, local (YYYY-MM-DD HH:MM); default now")]
        at: Option<String>,
    },

    /// Clock out of the running session
    Out {
        #[arg(long = "at", help = "Clock-out time, local (YYYY-MM-DD HH:MM); default now")]
        at: Option<String>,
    },

    /// Show the running session, if any
    Status,

    /// List time entries of a client
    Entries {
        client_id: i64,

        #[arg(long = "from", help = "First day (YYYY-MM-DD)")]
        from: Option<String>,

        #[arg(long = "to", help = "Last day, inclusive (YYYY-MM-DD)")]
        to: Option<String>,
    },

    /// Export a client's timesheet for a date range
    Export {
        /// Client ID
        client_id: Option<i64>,

        #[arg(long = "from", help = "First day (YYYY-MM-DD)")]
        from: Option<String>,

        #[arg(long = "to", help = "Last day, inclusive (YYYY-MM-DD)")]
        to: Option<String>,

        #[arg(long, value_enum, default_value = "pdf")]
        format: ExportFormat,

        #[arg(long = "out", value_name = "DIR", help = "Output directory")]
        out: Option<String>,

        #[arg(long, short = 'f', help = "Overwrite an existing file without asking")]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum ClientAction {
    /// Add a client
    Add {
        name: String,

        #[arg(long = "rate", allow_negative_numbers = true, help = "Hourly rate")]
        rate: f64,
    },

    /// Change a client's name and/or rate
    Edit {
        id: i64,

        #[arg(long = "name")]
        name: Option<String>,

        #[arg(long = "rate", allow_negative_numbers = true)]
        rate: Option<f64>,
    },

    /// Delete a client and all of its time entries
    Del {
        id: i64,

        #[arg(long = "yes", short = 'y', help = "Do not ask for confirmation")]
        yes: bool,
    },

    /// List clients
    List,
}
