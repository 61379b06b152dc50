//! Time utilities: parsing HH:MM and ISO date-times, the command clock,
//! fractional-hour arithmetic.

use crate::errors::{AppError, AppResult};
use chrono::{Duration, Local, NaiveDateTime, NaiveTime, Timelike};

/// Storage format for every timestamp column (business-local, no offset).
pub const DB_DATETIME_FMT: &str = "%Y-%m-%dT%H:%M:%S";
pub const DB_TIME_FMT: &str = "%H:%M";

const DATETIME_INPUT_FMTS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

pub fn parse_time(t: &str) -> Option<NaiveTime> {
    let t = t.trim();
    NaiveTime::parse_from_str(t, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(t, "%H:%M:%S"))
        .ok()
}

pub fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    DATETIME_INPUT_FMTS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}

pub fn to_db(dt: &NaiveDateTime) -> String {
    dt.format(DB_DATETIME_FMT).to_string()
}

/// The instant a command runs at. `--now` pins it (tests, back-dated entries).
pub fn resolve_now(fixed: Option<&str>) -> AppResult<NaiveDateTime> {
    match fixed {
        Some(s) => parse_datetime(s).ok_or_else(|| AppError::InvalidTime(s.to_string())),
        None => {
            let now = Local::now().naive_local();
            Ok(now.with_nanosecond(0).unwrap_or(now))
        }
    }
}

/// Longest stay a single booking, extension or rental may cover.
pub const MAX_BOOKING_HOURS: f64 = 24.0;

/// Accept a duration in `(0, max]`. NaN and infinities are rejected.
pub fn ensure_hours(hours: f64, max: f64) -> AppResult<f64> {
    if !hours.is_finite() || hours <= 0.0 || hours > max {
        return Err(AppError::InvalidInput(format!(
            "duration must be more than 0 and at most {max} hours, got {hours}"
        )));
    }
    Ok(hours)
}

/// Fractional hours → chrono Duration, rounded to the second.
pub fn hours_to_duration(hours: f64) -> AppResult<Duration> {
    let secs = (hours * 3600.0).round();
    if !secs.is_finite() {
        return Err(AppError::InvalidInput(format!("{hours} hours is out of range")));
    }
    Duration::try_seconds(secs as i64)
        .ok_or_else(|| AppError::InvalidInput(format!("{hours} hours is out of range")))
}

pub fn add_hours(start: NaiveDateTime, hours: f64) -> AppResult<NaiveDateTime> {
    start
        .checked_add_signed(hours_to_duration(hours)?)
        .ok_or_else(|| AppError::InvalidInput(format!("{hours} hours is out of range")))
}

/// Whole minutes elapsed, never negative.
pub fn minutes_between(start: NaiveDateTime, end: NaiveDateTime) -> i64 {
    (end - start).num_minutes().max(0)
}

/// Round to two decimals (hours and balances are kept at this precision).
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn datetime_inputs_accept_t_and_space() {
        let a = parse_datetime("2025-04-01T09:30").unwrap();
        let b = parse_datetime("2025-04-01 09:30:00").unwrap();
        assert_eq!(a, b);
        assert!(parse_datetime("01/04/2025").is_none());
    }

    #[test]
    fn half_hours_are_added_exactly() {
        let start = NaiveDate::from_ymd_opt(2025, 4, 1)
            .unwrap()
            .and_hms_opt(23, 45, 0)
            .unwrap();
        let end = add_hours(start, 0.5).unwrap();
        assert_eq!(to_db(&end), "2025-04-02T00:15:00");
    }

    #[test]
    fn huge_or_non_finite_hours_are_errors() {
        let start = parse_datetime("2025-04-01T09:00").unwrap();
        assert!(matches!(add_hours(start, 1e10), Err(AppError::InvalidInput(_))));
        assert!(matches!(add_hours(start, f64::INFINITY), Err(AppError::InvalidInput(_))));
        assert!(matches!(add_hours(start, f64::NAN), Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn ensure_hours_bounds() {
        assert_eq!(ensure_hours(3.5, MAX_BOOKING_HOURS).unwrap(), 3.5);
        assert!(ensure_hours(24.0, MAX_BOOKING_HOURS).is_ok());
        for bad in [0.0, -1.0, 24.5, f64::NAN, f64::INFINITY, 1e10] {
            assert!(ensure_hours(bad, MAX_BOOKING_HOURS).is_err(), "{bad} accepted");
        }
    }

    #[test]
    fn minutes_between_clamps_backwards_intervals() {
        let a = parse_datetime("2025-04-01T10:00").unwrap();
        let b = parse_datetime("2025-04-01T09:00").unwrap();
        assert_eq!(minutes_between(a, b), 0);
        assert_eq!(minutes_between(b, a), 60);
    }
}
