//! SQL access, one module per table. Row mappers turn stored text columns
//! into chrono values and fail with a conversion error on malformed data.
//! Range loaders count such rows as skipped; any other SQLite error aborts
//! the read.

pub mod bookings;
pub mod exclusive;
pub mod flexi;
pub mod leaderboard;
pub mod packages;
pub mod pantry;
pub mod sessions;

use crate::errors::{AppError, AppResult};
use crate::utils::{date, time};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rusqlite::types::Type;
use rusqlite::{Result, Row};

/// One page of a listing.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub rows: Vec<T>,
    /// 1-based, clamped to the available pages.
    pub page: usize,
    pub total_pages: usize,
    pub total_rows: usize,
}

impl<T> Page<T> {
    /// Clamp `requested` into range and compute the SQL offset.
    pub(crate) fn window(requested: usize, page_size: usize, total_rows: usize) -> (usize, usize, i64) {
        let total_pages = total_rows.div_ceil(page_size.max(1)).max(1);
        let page = requested.clamp(1, total_pages);
        let offset = ((page - 1) * page_size) as i64;
        (page, total_pages, offset)
    }
}

/// Rows read by a range query plus the number of stored rows that could not
/// be converted.
#[derive(Debug, Clone)]
pub struct Loaded<T> {
    pub rows: Vec<T>,
    pub skipped: usize,
}

impl<T> Loaded<T> {
    /// Hand over the rows, recording the skip count under `label`.
    pub fn into_rows(self, label: &'static str, skipped: &mut Skipped) -> Vec<T> {
        skipped.add(label, self.skipped);
        self.rows
    }
}

/// Unreadable rows per dataset, in load order. Datasets without losses are
/// not listed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Skipped(Vec<(&'static str, usize)>);

impl Skipped {
    pub fn add(&mut self, label: &'static str, n: usize) {
        if n == 0 {
            return;
        }
        match self.0.iter_mut().find(|(l, _)| *l == label) {
            Some((_, count)) => *count += n,
            None => self.0.push((label, n)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn total(&self) -> usize {
        self.0.iter().map(|(_, n)| n).sum()
    }

    pub fn counts(&self) -> &[(&'static str, usize)] {
        &self.0
    }
}

/// Drain a row iterator. Conversion failures are counted, anything else
/// is returned as an error.
pub(crate) fn collect_readable<T>(
    rows: impl Iterator<Item = Result<T>>,
) -> AppResult<Loaded<T>> {
    let mut loaded = Loaded {
        rows: Vec::new(),
        skipped: 0,
    };
    for r in rows {
        match r {
            Ok(v) => loaded.rows.push(v),
            Err(
                rusqlite::Error::FromSqlConversionFailure(..)
                | rusqlite::Error::InvalidColumnType(..)
                | rusqlite::Error::IntegralValueOutOfRange(..),
            ) => loaded.skipped += 1,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(loaded)
}

pub(crate) fn conversion_error(idx: usize, err: AppError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

pub(crate) fn get_datetime(row: &Row, col: &str) -> Result<NaiveDateTime> {
    let raw: String = row.get(col)?;
    time::parse_datetime(&raw).ok_or_else(|| conversion_error(0, AppError::InvalidDate(raw)))
}

pub(crate) fn get_opt_datetime(row: &Row, col: &str) -> Result<Option<NaiveDateTime>> {
    match row.get::<_, Option<String>>(col)? {
        Some(raw) if !raw.trim().is_empty() => time::parse_datetime(&raw)
            .map(Some)
            .ok_or_else(|| conversion_error(0, AppError::InvalidDate(raw))),
        _ => Ok(None),
    }
}

pub(crate) fn get_date(row: &Row, col: &str) -> Result<NaiveDate> {
    let raw: String = row.get(col)?;
    date::parse_date(&raw).ok_or_else(|| conversion_error(0, AppError::InvalidDate(raw)))
}

pub(crate) fn get_time(row: &Row, col: &str) -> Result<NaiveTime> {
    let raw: String = row.get(col)?;
    time::parse_time(&raw).ok_or_else(|| conversion_error(0, AppError::InvalidTime(raw)))
}

pub(crate) fn get_bool(row: &Row, col: &str) -> Result<bool> {
    Ok(row.get::<_, i64>(col)? != 0)
}

/// `%term%` for a case-insensitive LIKE, or `%` for "no filter".
pub(crate) fn like_pattern(search: Option<&str>) -> String {
    match search.map(str::trim) {
        Some(s) if !s.is_empty() => format!("%{}%", s.to_lowercase()),
        _ => "%".to_string(),
    }
}
