use chrono::{Datelike, Duration, NaiveDate};

pub const DB_DATE_FMT: &str = "%Y-%m-%d";

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DB_DATE_FMT).ok()
}

pub fn to_db(d: &NaiveDate) -> String {
    d.format(DB_DATE_FMT).to_string()
}

pub fn add_days(d: NaiveDate, days: i64) -> NaiveDate {
    d + Duration::days(days)
}

/// First and last day of the month containing `d`.
pub fn month_bounds(d: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = d.with_day(1).unwrap_or(d);
    let next_month = if first.month() == 12 {
        NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
    };
    let last = next_month.and_then(|n| n.pred_opt()).unwrap_or(first);
    (first, last)
}

/// Inclusive date bounds as stored strings; `None` spans everything.
pub fn bounds_to_db(bounds: Option<(NaiveDate, NaiveDate)>) -> (String, String) {
    match bounds {
        Some((from, to)) => (to_db(&from), to_db(&to)),
        None => ("0000-01-01".to_string(), "9999-12-31".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_bounds_handles_december_and_leap_years() {
        let (a, b) = month_bounds(NaiveDate::from_ymd_opt(2024, 12, 15).unwrap());
        assert_eq!(to_db(&a), "2024-12-01");
        assert_eq!(to_db(&b), "2024-12-31");

        let (_, feb) = month_bounds(NaiveDate::from_ymd_opt(2024, 2, 3).unwrap());
        assert_eq!(to_db(&feb), "2024-02-29");
    }
}
