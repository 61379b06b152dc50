pub mod backup;
pub mod booking;
pub mod config;
pub mod db;
pub mod exclusive;
pub mod export;
pub mod flexi;
pub mod init;
pub mod leaderboard;
pub mod log;
pub mod package;
pub mod pantry;
pub mod report;
pub mod session;

use crate::config::Config;
use crate::core::session::SessionLogic;
use crate::db::initialize::open_db;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::session::Session;
use crate::utils::{date, time};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Open the database and make sure an operator is signed in.
/// Every command that writes business records goes through here.
pub(crate) fn open_signed_in(cfg: &Config, now: NaiveDateTime) -> AppResult<(DbPool, Session)> {
    let mut pool = open_db(&cfg.database)?;
    let session = SessionLogic::require(&mut pool, now)?;
    Ok((pool, session))
}

pub(crate) fn parse_date_arg(s: &str) -> AppResult<NaiveDate> {
    date::parse_date(s).ok_or_else(|| AppError::InvalidDate(s.to_string()))
}

pub(crate) fn parse_time_arg(s: &str) -> AppResult<NaiveTime> {
    time::parse_time(s).ok_or_else(|| AppError::InvalidTime(s.to_string()))
}

pub(crate) fn parse_datetime_arg(s: &str) -> AppResult<NaiveDateTime> {
    time::parse_datetime(s).ok_or_else(|| AppError::InvalidTime(s.to_string()))
}
