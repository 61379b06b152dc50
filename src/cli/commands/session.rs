use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::session::SessionLogic;
use crate::db::initialize::open_db;
use crate::errors::AppResult;
use crate::ui::messages::{info, success, warning};
use crate::utils::formatting::display_datetime;
use chrono::NaiveDateTime;

/// `login`, `logout` and `whoami`.
pub fn handle(cmd: &Commands, cfg: &Config, now: NaiveDateTime) -> AppResult<()> {
    let mut pool = open_db(&cfg.database)?;

    match cmd {
        Commands::Login { operator, hours } => {
            let operator = operator.as_deref().unwrap_or(&cfg.operator);
            let hours = hours.unwrap_or(cfg.session_hours);

            let session = SessionLogic::login(&mut pool, operator, hours, now)?;
            success(format!(
                "Signed in as {} until {}",
                session.operator,
                display_datetime(&session.expires_at)
            ));
        }
        Commands::Logout => match SessionLogic::logout(&mut pool, now)? {
            Some(session) => success(format!("{} signed out.", session.operator)),
            None => info("Nobody is signed in."),
        },
        Commands::Whoami => match SessionLogic::peek(&pool)? {
            Some(session) if session.is_active(now) => info(format!(
                "{} (signed in {}, expires {})",
                session.operator,
                display_datetime(&session.started_at),
                display_datetime(&session.expires_at)
            )),
            Some(session) => warning(format!(
                "Session of {} expired at {}",
                session.operator,
                display_datetime(&session.expires_at)
            )),
            None => info("Nobody is signed in."),
        },
        _ => {}
    }

    Ok(())
}
