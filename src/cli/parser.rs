use crate::export::{ExportDataset, ExportFormat};
use clap::{Parser, Subcommand};

/// Command-line interface definition for dmdhub
/// Front desk CLI for a co-working space, backed by SQLite
#[derive(Parser)]
#[command(
    name = "dmdhub",
    version = env!("CARGO_PKG_VERSION"),
    about = "Co-working front desk: hub bookings, exclusive rentals, Flexi memberships, pantry and reports",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    /// Pin the command clock (YYYY-MM-DDTHH:MM)
    #[arg(global = true, long = "now", hide = true, value_name = "DATETIME")]
    pub now: Option<String>,

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

        #[arg(long = "check", help = "Check configuration file for missing fields")]
        check: bool,

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

    /// Print the internal audit log
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,

        #[arg(long = "last", value_name = "N", help = "Only the N most recent rows")]
        last: Option<usize>,
    },

    /// Create a backup copy of the database
    Backup {
        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long)]
        compress: bool,

        #[arg(long, short = 'y', help = "Overwrite an existing file without asking")]
        yes: bool,
    },

    /// Sign in at the front desk
    Login {
        #[arg(long, help = "Operator name (default: `operator` from the config)")]
        operator: Option<String>,

        #[arg(long, help = "Session length in hours (default: `session_hours`)")]
        hours: Option<i64>,
    },

    /// Close the current session
    Logout,

    /// Show who is signed in
    Whoami,

    /// Manage hub packages
    Package {
        #[command(subcommand)]
        action: PackageCmd,
    },

    /// Single-seat hub bookings
    Booking {
        #[command(subcommand)]
        action: BookingCmd,
    },

    /// Whole-space exclusive reservations
    Exclusive {
        #[command(subcommand)]
        action: ExclusiveCmd,
    },

    /// Flexi memberships (Grind / Monthly Focus)
    Flexi {
        #[command(subcommand)]
        action: FlexiCmd,
    },

    /// Pantry inventory and sales
    Pantry {
        #[command(subcommand)]
        action: PantryCmd,
    },

    /// Loyalty ranking of visits of 3 hours or more
    Leaderboard {
        #[arg(long, help = "Filter by customer name (ranks are kept)")]
        search: Option<String>,

        #[arg(long, default_value_t = 1)]
        page: usize,
    },

    /// Revenue and traffic report
    Report {
        #[arg(
            long,
            value_name = "RANGE",
            help = "YYYY, YYYY-MM, YYYY-MM-DD or a:b (default: current month)"
        )]
        range: Option<String>,
    },

    /// Export records to CSV or JSON
    Export {
        #[arg(long, value_enum)]
        what: ExportDataset,

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
pub enum PackageCmd {
    /// Add a package
    Add {
        name: String,

        #[arg(long, help = "Price in pesos (per hour for hourly packages)")]
        price: i64,

        #[arg(long, default_value_t = 0.0, help = "Fixed duration in hours")]
        duration: f64,

        #[arg(long, help = "Bill per hour instead of a fixed price")]
        hourly: bool,
    },

    /// List packages
    List,

    /// Edit a package
    Edit {
        id: i64,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        price: Option<i64>,

        #[arg(long)]
        duration: Option<f64>,

        #[arg(long, value_name = "true|false")]
        hourly: Option<bool>,
    },

    /// Delete a package (bookings keep its name)
    Del {
        id: i64,

        #[arg(long, short = 'y')]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum BookingCmd {
    /// Check a customer in
    Checkin {
        name: String,

        #[arg(long, help = "Package id (see `package list`)")]
        package: i64,

        #[arg(long, default_value = "")]
        seat: String,

        #[arg(long, help = "Hours, required for hourly packages")]
        hours: Option<f64>,

        #[arg(long)]
        student: bool,

        #[arg(long)]
        examinee: bool,

        #[arg(long)]
        group: bool,

        #[arg(long, help = "Loyalty award: the visit is free")]
        loyalty: bool,

        #[arg(long, default_value = "")]
        rentals: String,

        #[arg(long, default_value = "")]
        notes: String,

        #[arg(long = "at", value_name = "DATETIME", help = "Check-in time (default: now)")]
        at: Option<String>,
    },

    /// List bookings, newest first
    List {
        #[arg(long)]
        search: Option<String>,

        #[arg(long, default_value_t = 1)]
        page: usize,
    },

    /// Edit a booking
    Edit {
        id: i64,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        seat: Option<String>,

        #[arg(long = "in", value_name = "DATETIME")]
        check_in: Option<String>,

        #[arg(long = "out", value_name = "DATETIME")]
        check_out: Option<String>,

        #[arg(long)]
        amount: Option<i64>,

        #[arg(long)]
        rentals: Option<String>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Extend an active booking
    Extend {
        id: i64,

        #[arg(long)]
        hours: f64,

        #[arg(long, help = "Fee override (default: hours × extension_rate)")]
        fee: Option<i64>,
    },

    /// Check a customer out
    Checkout { id: i64 },

    /// Delete a booking
    Del {
        id: i64,

        #[arg(long, short = 'y')]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum ExclusiveCmd {
    /// Reserve the whole space
    Add {
        client: String,

        #[arg(long, value_name = "YYYY-MM-DD")]
        date: String,

        #[arg(long, value_name = "HH:MM")]
        start: String,

        #[arg(long)]
        hours: f64,

        #[arg(long, default_value_t = 1)]
        pax: i64,

        #[arg(long = "guest", help = "Guest name (repeatable); overrides --pax")]
        guests: Vec<String>,

        #[arg(long, default_value = "")]
        notes: String,

        #[arg(long, help = "Agreed amount replacing the computed quote")]
        amount: Option<i64>,
    },

    /// Price preview
    Quote {
        #[arg(long, value_name = "HH:MM")]
        start: String,

        #[arg(long)]
        hours: f64,
    },

    /// List reservations
    List {
        #[arg(long)]
        search: Option<String>,

        #[arg(long, default_value_t = 1)]
        page: usize,
    },

    /// Edit a reservation
    Edit {
        id: i64,

        #[arg(long)]
        client: Option<String>,

        #[arg(long, value_name = "YYYY-MM-DD")]
        date: Option<String>,

        #[arg(long, value_name = "HH:MM")]
        start: Option<String>,

        #[arg(long)]
        hours: Option<f64>,

        #[arg(long)]
        pax: Option<i64>,

        #[arg(long = "guest")]
        guests: Vec<String>,

        #[arg(long)]
        notes: Option<String>,

        #[arg(long)]
        amount: Option<i64>,
    },

    /// Mark a reservation as completed
    Complete { id: i64 },

    /// Delete a reservation
    Del {
        id: i64,

        #[arg(long, short = 'y')]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum FlexiCmd {
    /// Sell a membership
    Register {
        client: String,

        #[arg(long, help = "grind | focus")]
        plan: String,

        #[arg(long, value_name = "YYYY-MM-DD", help = "First valid day (default: today)")]
        start: Option<String>,

        #[arg(long, default_value = "")]
        notes: String,
    },

    /// List members
    List {
        #[arg(long)]
        search: Option<String>,

        #[arg(long, default_value_t = 1)]
        page: usize,
    },

    /// Start a visit
    Checkin { id: i64 },

    /// End the open visit
    Checkout { id: i64 },

    /// Visit history of a member
    History { id: i64 },

    /// Delete a member and its history
    Del {
        id: i64,

        #[arg(long, short = 'y')]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum PantryCmd {
    /// Add an item to the inventory
    ItemAdd {
        name: String,

        #[arg(long)]
        price: i64,

        #[arg(long, default_value = "General")]
        category: String,

        #[arg(long, help = "Add as not available")]
        unavailable: bool,
    },

    /// List inventory
    ItemList {
        #[arg(long, help = "Only items currently for sale")]
        available: bool,
    },

    /// Edit an item
    ItemEdit {
        id: i64,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        price: Option<i64>,

        #[arg(long, value_name = "true|false")]
        available: Option<bool>,
    },

    /// Record a sale: items as ID or ID:QTY
    Sell {
        #[arg(required = true, value_name = "ID[:QTY]")]
        items: Vec<String>,
    },

    /// List sales
    List {
        #[arg(long, value_name = "RANGE")]
        range: Option<String>,
    },
}
