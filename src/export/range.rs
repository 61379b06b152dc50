// src/export/range.rs

use crate::errors::{AppError, AppResult};
use crate::utils::date::month_bounds;
use chrono::NaiveDate;

/// Parse a `--range` value into inclusive date bounds.
///
/// Accepted:
/// - YYYY
/// - YYYY-MM
/// - YYYY-MM-DD
/// - YYYY:YYYY
/// - YYYY-MM:YYYY-MM
/// - YYYY-MM-DD:YYYY-MM-DD
pub fn parse_range(r: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    let r = r.trim();

    let (from, to) = if let Some((start_raw, end_raw)) = r.split_once(':') {
        let start = start_raw.trim();
        let end = end_raw.trim();

        if start.len() != end.len() {
            return Err(AppError::InvalidDate(format!(
                "'{r}': start and end must have the same format"
            )));
        }

        (period(start)?.0, period(end)?.1)
    } else {
        period(r)?
    };

    if from > to {
        return Err(AppError::InvalidDate(format!(
            "'{r}': the range ends before it starts"
        )));
    }
    Ok((from, to))
}

/// First and last day of a single year, month or day.
fn period(p: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    let invalid = || AppError::InvalidDate(p.to_string());

    match p.len() {
        // YYYY
        4 => {
            let y: i32 = p.parse().map_err(|_| invalid())?;
            let d1 = NaiveDate::from_ymd_opt(y, 1, 1).ok_or_else(invalid)?;
            let d2 = NaiveDate::from_ymd_opt(y, 12, 31).ok_or_else(invalid)?;
            Ok((d1, d2))
        }
        // YYYY-MM
        7 => {
            let first = NaiveDate::parse_from_str(&format!("{p}-01"), "%Y-%m-%d")
                .map_err(|_| invalid())?;
            Ok(month_bounds(first))
        }
        // YYYY-MM-DD
        10 => {
            let d = NaiveDate::parse_from_str(p, "%Y-%m-%d").map_err(|_| invalid())?;
            Ok((d, d))
        }
        _ => Err(AppError::InvalidDate(format!(
            "unsupported range format: '{p}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn single_periods() {
        assert_eq!(parse_range("2025").unwrap(), (d("2025-01-01"), d("2025-12-31")));
        assert_eq!(parse_range("2024-02").unwrap(), (d("2024-02-01"), d("2024-02-29")));
        assert_eq!(parse_range("2025-03-04").unwrap(), (d("2025-03-04"), d("2025-03-04")));
    }

    #[test]
    fn intervals() {
        assert_eq!(
            parse_range("2025-01:2025-03").unwrap(),
            (d("2025-01-01"), d("2025-03-31"))
        );
        assert_eq!(
            parse_range("2025-03-01:2025-03-15").unwrap(),
            (d("2025-03-01"), d("2025-03-15"))
        );
    }

    #[test]
    fn malformed_ranges_fail() {
        assert!(parse_range("2025-13").is_err());
        assert!(parse_range("2025:2025-03").is_err());
        assert!(parse_range("2025-03-10:2025-03-01").is_err());
        assert!(parse_range("last week").is_err());
    }
}
