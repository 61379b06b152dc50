//! Duration / expiry resolver.

use crate::errors::{AppError, AppResult};
use crate::models::booking::Booking;
use crate::models::flexi::FlexiPlan;
use crate::models::package::Package;
use crate::utils::date::add_days;
use crate::utils::time::add_hours;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

pub const GRIND_VALID_DAYS: i64 = 30;
pub const GRIND_HOURS: f64 = 60.0;
pub const FOCUS_VALID_DAYS: i64 = 40;
/// Monthly Focus visits longer than this raise a warning at check-out.
pub const FOCUS_SESSION_SOFT_CAP: f64 = 5.0;

/// Hours actually booked: user input for hourly packages, the package's
/// fixed duration otherwise.
pub fn effective_duration(pkg: &Package, input_hours: f64) -> f64 {
    if pkg.is_hourly {
        input_hours
    } else {
        pkg.duration
    }
}

pub fn hub_check_out(
    check_in: NaiveDateTime,
    pkg: &Package,
    input_hours: f64,
) -> AppResult<NaiveDateTime> {
    add_hours(check_in, effective_duration(pkg, input_hours))
}

/// End of an exclusive rental. A session running past midnight ends on the
/// next calendar day.
pub fn exclusive_end(
    date: NaiveDate,
    start: NaiveTime,
    duration_hours: f64,
) -> AppResult<NaiveDateTime> {
    add_hours(date.and_time(start), duration_hours)
}

/// Headcount from a newline-separated guest list; blank lines are ignored.
/// Without any names the given pax is used. Never below 1.
pub fn pax_from_guest_list(guest_list: &str, pax: i64) -> i64 {
    let names = guest_list.lines().filter(|l| !l.trim().is_empty()).count() as i64;
    if names > 0 { names } else { pax.max(1) }
}

/// Validity window and balance of a new Flexi membership.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MembershipTerms {
    pub expiry_date: NaiveDate,
    pub total_hours: Option<f64>,
    pub remaining_hours: Option<f64>,
    pub session_soft_cap: Option<f64>,
}

pub fn membership_terms(plan: FlexiPlan, start_date: NaiveDate) -> MembershipTerms {
    match plan {
        FlexiPlan::Grind => MembershipTerms {
            expiry_date: add_days(start_date, GRIND_VALID_DAYS),
            total_hours: Some(GRIND_HOURS),
            remaining_hours: Some(GRIND_HOURS),
            session_soft_cap: None,
        },
        FlexiPlan::MonthlyFocus => MembershipTerms {
            expiry_date: add_days(start_date, FOCUS_VALID_DAYS),
            total_hours: None,
            remaining_hours: None,
            session_soft_cap: Some(FOCUS_SESSION_SOFT_CAP),
        },
    }
}

/// Result of extending an active hub booking.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Extension {
    pub new_check_out: NaiveDateTime,
    pub new_duration: f64,
    pub new_amount: i64,
    pub fee: i64,
}

/// Push the scheduled check-out by `hours`. A booking without a check-out
/// is extended from `now`.
pub fn extend(booking: &Booking, hours: f64, fee: i64, now: NaiveDateTime) -> AppResult<Extension> {
    let base = booking.check_out.unwrap_or(now);
    let new_amount = booking
        .amount_paid
        .checked_add(fee)
        .ok_or_else(|| AppError::InvalidInput(format!("fee {fee} is out of range")))?;
    Ok(Extension {
        new_check_out: add_hours(base, hours)?,
        new_duration: booking.duration_hours + hours,
        new_amount,
        fee,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::booking::{BookingFlags, BookingStatus};
    use crate::utils::time::parse_datetime;

    fn d(s: &str) -> NaiveDate {
        crate::utils::date::parse_date(s).unwrap()
    }

    fn booking(check_out: Option<&str>) -> Booking {
        Booking {
            id: 1,
            customer_name: "Lia".into(),
            seat_number: "A1".into(),
            package_id: Some(1),
            package_name: "Hourly".into(),
            duration_hours: 2.0,
            check_in: parse_datetime("2025-06-01T09:00").unwrap(),
            check_out: check_out.and_then(parse_datetime),
            amount_paid: 98,
            status: BookingStatus::Active,
            flags: BookingFlags::default(),
            rentals: String::new(),
            notes: String::new(),
        }
    }

    #[test]
    fn fixed_packages_ignore_user_hours() {
        let daily = Package::new("Daily", 299, 8.0, false);
        let hourly = Package::new("Hourly", 49, 0.0, true);
        let at = parse_datetime("2025-06-01T09:00").unwrap();

        assert_eq!(effective_duration(&daily, 3.0), 8.0);
        assert_eq!(effective_duration(&hourly, 3.0), 3.0);
        assert_eq!(
            hub_check_out(at, &daily, 3.0).unwrap(),
            parse_datetime("2025-06-01T17:00").unwrap()
        );
    }

    #[test]
    fn exclusive_end_rolls_past_midnight() {
        let start = NaiveTime::from_hms_opt(23, 0, 0).unwrap();
        let end = exclusive_end(d("2025-06-01"), start, 4.0).unwrap();
        assert_eq!(end, parse_datetime("2025-06-02T03:00").unwrap());
    }

    #[test]
    fn pax_follows_guest_list_lines() {
        assert_eq!(pax_from_guest_list("Ana\n\nBen\n  \nCora\n", 10), 3);
        assert_eq!(pax_from_guest_list("", 10), 10);
        assert_eq!(pax_from_guest_list("  \n", 0), 1);
    }

    #[test]
    fn grind_terms() {
        let t = membership_terms(FlexiPlan::Grind, d("2025-01-15"));
        assert_eq!(t.expiry_date, d("2025-02-14"));
        assert_eq!(t.total_hours, Some(60.0));
        assert_eq!(t.remaining_hours, Some(60.0));
        assert_eq!(t.session_soft_cap, None);
    }

    #[test]
    fn monthly_focus_terms() {
        let t = membership_terms(FlexiPlan::MonthlyFocus, d("2025-01-15"));
        assert_eq!(t.expiry_date, d("2025-02-24"));
        assert_eq!(t.total_hours, None);
        assert_eq!(t.remaining_hours, None);
        assert_eq!(t.session_soft_cap, Some(5.0));
    }

    #[test]
    fn extension_moves_check_out_and_adds_fee() {
        let now = parse_datetime("2025-06-01T10:00").unwrap();
        let ext = extend(&booking(Some("2025-06-01T11:00")), 1.5, 74, now).unwrap();
        assert_eq!(ext.new_check_out, parse_datetime("2025-06-01T12:30").unwrap());
        assert_eq!(ext.new_duration, 3.5);
        assert_eq!(ext.new_amount, 172);
    }

    #[test]
    fn extension_with_absurd_fee_is_an_error() {
        let now = parse_datetime("2025-06-01T10:00").unwrap();
        assert!(matches!(
            extend(&booking(None), 1.0, i64::MAX, now),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn extension_without_check_out_starts_from_now() {
        let now = parse_datetime("2025-06-01T10:00").unwrap();
        let ext = extend(&booking(None), 1.0, 49, now).unwrap();
        assert_eq!(ext.new_check_out, parse_datetime("2025-06-01T11:00").unwrap());
    }
}
