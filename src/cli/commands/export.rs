use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::initialize::open_db;
use crate::errors::AppResult;
use crate::export::ExportLogic;
use chrono::NaiveDateTime;

pub fn handle(cmd: &Commands, cfg: &Config, now: NaiveDateTime) -> AppResult<()> {
    if let Commands::Export {
        what,
        format,
        file,
        range,
        force,
    } = cmd
    {
        let pool = open_db(&cfg.database)?;
        ExportLogic::export(&pool, *what, *format, file, range.as_deref(), *force, now)?;
    }
    Ok(())
}
