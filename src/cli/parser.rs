use crate::export::ExportFormat;
use clap::{Parser, Subcommand};

/// Command-line interface definition for rtagclock
/// RFID time-attendance terminal with SQLite storage
#[derive(Parser)]
#[command(
    name = "rtagclock",
    version = env!("CARGO_PKG_VERSION"),
    about = "An RFID time-attendance terminal: log users in and out by tag and track weekly hours using SQLite",
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

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
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

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,

        #[arg(long = "limit", help = "Only the most recent N rows")]
        limit: Option<usize>,
    },

    /// Run the terminal: read tags from the reader until it closes
    Run {
        #[arg(
            long = "device",
            value_name = "PATH",
            help = "Reader device or FIFO ('-' for stdin)"
        )]
        device: Option<String>,

        #[arg(
            long = "timeout-ms",
            value_name = "MS",
            help = "Idle time before the screen is reset"
        )]
        timeout_ms: Option<u64>,
    },

    /// Process a single tag read, as if presented to the reader
    Tap {
        tag: String,

        #[arg(long = "ignore-hours", help = "Accept the tag outside opening hours")]
        ignore_hours: bool,
    },

    /// Log out everybody still logged in
    Sweep,

    /// Show a user's progress for the week
    Report {
        user_id: i64,

        #[arg(long, value_name = "YYYY-MM-DD", help = "Any day of the week to report")]
        date: Option<String>,
    },

    /// Manage users
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Manage RFID tags
    Tag {
        #[command(subcommand)]
        action: TagAction,
    },

    /// Manage holidays
    Holiday {
        #[command(subcommand)]
        action: HolidayAction,
    },

    /// Manual corrections by an administrator
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },

    /// Create a backup copy of the database
    Backup {
        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long)]
        compress: bool,
    },

    /// Export ledger events
    Export {
        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(
            long,
            value_name = "RANGE",
            help = "Filter export by year/month/day or a custom range"
        )]
        range: Option<String>,

        #[arg(long, short = 'f')]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum UserAction {
    /// Create a user
    Add {
        #[arg(long)]
        name: Option<String>,

        #[arg(long, default_value = "fi", help = "Country code: fi, se or no")]
        country: String,
    },
    /// List users and their current status
    List,
}

#[derive(Subcommand)]
pub enum TagAction {
    /// Bind a tag to a user
    Assign { tag: String, user_id: i64 },
    /// Release a tag
    Unassign { tag: String },
    /// List known tags
    List,
}

#[derive(Subcommand)]
pub enum HolidayAction {
    /// Add or replace a holiday
    Add {
        #[arg(value_name = "YYYY-MM-DD")]
        date: String,

        #[arg(long, default_value = "fi")]
        country: String,

        #[arg(
            long,
            value_name = "MIN",
            help = "Shorten the day by MIN minutes (omit for a whole day off)"
        )]
        minutes: Option<i64>,
    },
    /// List holidays
    List {
        #[arg(long)]
        country: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum AdminAction {
    /// Log a user in or out by hand
    Status {
        user_id: i64,

        #[arg(long = "in", conflicts_with = "logout", required_unless_present = "logout")]
        login: bool,

        #[arg(long = "out")]
        logout: bool,
    },
}
