//! Formatting utilities used for CLI and export outputs.

use crate::utils::time::{parse_datetime, parse_time};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

pub fn pad_right(s: &str, width: usize) -> String {
    format!("{:<width$}", s, width = width)
}

/// Thousands-separated integer: 1234567 → "1,234,567".
pub fn thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    if value < 0 {
        format!("-{out}")
    } else {
        out
    }
}

/// Currency amount as shown on screen: "₱2,457".
pub fn money(amount: i64, symbol: &str) -> String {
    if amount < 0 {
        format!("-{}{}", symbol, thousands(-amount))
    } else {
        format!("{}{}", symbol, thousands(amount))
    }
}

/// Hours with two decimals, trailing zeros dropped: 1.5 → "1.5", 3.0 → "3".
pub fn hours(h: f64) -> String {
    let s = format!("{:.2}", h);
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// "Mar 05, 2025"
pub fn display_date(d: &NaiveDate) -> String {
    d.format("%b %d, %Y").to_string()
}

/// "9:05 AM"
pub fn display_time(t: &NaiveTime) -> String {
    t.format("%-I:%M %p").to_string()
}

pub fn display_datetime(dt: &NaiveDateTime) -> String {
    format!("{} {}", display_date(&dt.date()), display_time(&dt.time()))
}

/// Stored time-of-day → "h:mm AM"; malformed values are shown as stored.
pub fn display_stored_time(raw: &str) -> String {
    match parse_time(raw) {
        Some(t) => display_time(&t),
        None => raw.to_string(),
    }
}

/// Stored timestamp → "Mon dd, yyyy h:mm AM"; malformed values are shown as stored.
pub fn display_stored_datetime(raw: &str) -> String {
    match parse_datetime(raw) {
        Some(dt) => display_datetime(&dt),
        None => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_uses_thousands_separators() {
        assert_eq!(money(0, "₱"), "₱0");
        assert_eq!(money(999, "₱"), "₱999");
        assert_eq!(money(2457, "₱"), "₱2,457");
        assert_eq!(money(1_234_567, "₱"), "₱1,234,567");
        assert_eq!(money(-1500, "₱"), "-₱1,500");
    }

    #[test]
    fn hours_trim_trailing_zeros() {
        assert_eq!(hours(3.0), "3");
        assert_eq!(hours(1.5), "1.5");
        assert_eq!(hours(0.333), "0.33");
    }

    #[test]
    fn unparseable_stored_values_fall_back_to_raw() {
        assert_eq!(display_stored_time("09:00:00"), "9:00 AM");
        assert_eq!(display_stored_time("14:30"), "2:30 PM");
        assert_eq!(display_stored_time("nine-ish"), "nine-ish");
        assert_eq!(
            display_stored_datetime("2025-03-05T18:00:00"),
            "Mar 05, 2025 6:00 PM"
        );
        assert_eq!(display_stored_datetime("garbage"), "garbage");
    }
}
