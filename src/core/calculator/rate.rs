//! Rate calculator: hub packages, exclusive rentals, extensions.

use crate::models::booking::BookingFlags;
use crate::models::package::Package;
use chrono::{NaiveTime, Timelike};
use serde::Serialize;

/// Student / examinee discount (8%), never stacked.
pub const STUDENT_DISCOUNT: f64 = 0.08;

/// Exclusive rentals starting before noon get 18% off the hourly rate.
pub const MORNING_DISCOUNT: f64 = 0.18;
pub const MORNING_CUTOFF_HOUR: u32 = 12;

/// Price of a hub visit before loyalty awards.
///
/// Hourly packages multiply the base price by `input_hours`; fixed packages
/// ignore it. Rounding to whole pesos happens once, on the final amount.
pub fn compute_rate(
    base_price: i64,
    is_hourly: bool,
    input_hours: f64,
    is_student: bool,
    is_examinee: bool,
) -> i64 {
    let mut rate = if is_hourly {
        base_price as f64 * input_hours
    } else {
        base_price as f64
    };

    if is_student || is_examinee {
        rate -= rate * STUDENT_DISCOUNT;
    }

    rate.round() as i64
}

/// Final hub price. A loyalty award waives the visit entirely.
pub fn hub_price(pkg: &Package, input_hours: f64, flags: &BookingFlags) -> i64 {
    if flags.loyalty {
        return 0;
    }
    compute_rate(
        pkg.price,
        pkg.is_hourly,
        input_hours,
        flags.student,
        flags.examinee,
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExclusiveQuote {
    /// Effective hourly rate, rounded for display only.
    pub rate_per_hour: i64,
    pub discount_applied: bool,
    pub total: i64,
}

pub fn exclusive_quote(start: NaiveTime, duration_hours: f64, base_rate: i64) -> ExclusiveQuote {
    let morning = start.hour() < MORNING_CUTOFF_HOUR;

    let mut rate = base_rate as f64;
    if morning {
        rate -= rate * MORNING_DISCOUNT;
    }

    ExclusiveQuote {
        rate_per_hour: rate.round() as i64,
        discount_applied: morning,
        total: (rate * duration_hours).round() as i64,
    }
}

/// Default fee for extending a hub booking by `hours`.
pub fn extension_fee(hours: f64, hourly_rate: i64) -> i64 {
    (hours * hourly_rate as f64).round() as i64
}
