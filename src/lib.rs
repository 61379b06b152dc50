//! dmdhub library root.
//! Exposes the CLI parser, the high-level run() function and the internal
//! modules (pricing engine, ledger, reports, storage).

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod export;
pub mod models;
pub mod ui;
pub mod utils;

use chrono::NaiveDateTime;
use clap::Parser;
use cli::commands;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config, now: NaiveDateTime) -> AppResult<()> {
    match &cli.command {
        Commands::Init => commands::init::handle(cli),
        Commands::Config { .. } => commands::config::handle(&cli.command, cfg),
        Commands::Db { .. } => commands::db::handle(&cli.command, cfg),
        Commands::Log { .. } => commands::log::handle(&cli.command, cfg),
        Commands::Backup { .. } => commands::backup::handle(&cli.command, cfg),
        Commands::Login { .. } | Commands::Logout | Commands::Whoami => {
            commands::session::handle(&cli.command, cfg, now)
        }
        Commands::Package { action } => commands::package::handle(action, cfg, now),
        Commands::Booking { action } => commands::booking::handle(action, cfg, now),
        Commands::Exclusive { action } => commands::exclusive::handle(action, cfg, now),
        Commands::Flexi { action } => commands::flexi::handle(action, cfg, now),
        Commands::Pantry { action } => commands::pantry::handle(action, cfg, now),
        Commands::Leaderboard { .. } => commands::leaderboard::handle(&cli.command, cfg),
        Commands::Report { .. } => commands::report::handle(&cli.command, cfg, now),
        Commands::Export { .. } => commands::export::handle(&cli.command, cfg, now),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    // 1️⃣ parse CLI
    let cli = Cli::parse();

    // 2️⃣ load config once
    let mut cfg = Config::load()?;

    // 3️⃣ command-line DB override
    if let Some(custom_db) = &cli.db {
        cfg.database = custom_db.clone();
    }

    // 4️⃣ the clock every command runs at
    let now = utils::time::resolve_now(cli.now.as_deref())?;

    dispatch(&cli, &cfg, now)
}
