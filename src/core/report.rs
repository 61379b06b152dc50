//! Revenue report: folds the five record streams into per-day rows and
//! period totals for a closed date range.

use crate::db::pool::DbPool;
use crate::db::queries::Skipped;
use crate::db::queries::bookings::bookings_between;
use crate::db::queries::exclusive::exclusive_between;
use crate::db::queries::flexi::{accounts_sold_between, logs_between};
use crate::db::queries::pantry::transactions_between;
use crate::errors::AppResult;
use crate::models::booking::Booking;
use crate::models::exclusive::ExclusiveBooking;
use crate::models::flexi::{FlexiAccount, FlexiLog};
use crate::models::pantry::PantryTransaction;
use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

pub const TOP_PANTRY_ITEMS: usize = 5;

static SUMMARY_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)x\s(.+)$").expect("static regex"));

/// Record sets feeding a report. Each slice may contain rows outside the
/// range; they are skipped.
#[derive(Debug, Default)]
pub struct ReportInput<'a> {
    pub bookings: &'a [Booking],
    pub exclusive: &'a [ExclusiveBooking],
    pub flexi_sales: &'a [FlexiAccount],
    pub flexi_logs: &'a [FlexiLog],
    pub pantry: &'a [PantryTransaction],
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DayRow {
    pub date: NaiveDate,
    pub timesheet: i64,
    pub exclusive: i64,
    pub flexi: i64,
    pub pantry: i64,
    pub check_ins: i64,
    pub packages: i64,
}

impl DayRow {
    fn new(date: NaiveDate) -> Self {
        Self {
            date,
            ..Default::default()
        }
    }

    pub fn total(&self) -> i64 {
        self.timesheet + self.exclusive + self.flexi + self.pantry
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CustomerMix {
    pub student: i64,
    pub examinee: i64,
    pub regular: i64,
    pub exclusive: i64,
    pub flexi_member: i64,
}

impl CustomerMix {
    pub fn rows(&self) -> [(&'static str, i64); 5] {
        [
            ("Student", self.student),
            ("Examinee", self.examinee),
            ("Regular", self.regular),
            ("Exclusive", self.exclusive),
            ("Flexi Member", self.flexi_member),
        ]
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Report {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub days: Vec<DayRow>,
    pub timesheet_total: i64,
    pub exclusive_total: i64,
    pub flexi_total: i64,
    pub pantry_total: i64,
    pub grand_total: i64,
    pub check_ins: i64,
    pub packages_sold: i64,
    pub customer_mix: CustomerMix,
    pub package_popularity: Vec<(String, i64)>,
    pub top_pantry_items: Vec<(String, i64)>,
}

/// Split "2x Oreo, 1x Coke" into (name, quantity) pairs. Segments that do
/// not look like `<n>x <name>` are dropped.
pub fn parse_items_summary(summary: &str) -> Vec<(String, i64)> {
    summary
        .split(',')
        .filter_map(|segment| {
            let caps = SUMMARY_SEGMENT.captures(segment.trim())?;
            let qty = caps[1].parse::<i64>().ok()?;
            Some((caps[2].trim().to_string(), qty))
        })
        .collect()
}

fn sorted_desc(counts: HashMap<String, i64>) -> Vec<(String, i64)> {
    let mut v: Vec<(String, i64)> = counts.into_iter().collect();
    v.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    v
}

pub fn build_report(from: NaiveDate, to: NaiveDate, input: &ReportInput) -> Report {
    let in_range = |d: NaiveDate| d >= from && d <= to;

    let mut days: BTreeMap<NaiveDate, DayRow> = BTreeMap::new();
    let mut mix = CustomerMix::default();
    let mut packages: HashMap<String, i64> = HashMap::new();
    let mut pantry_units: HashMap<String, i64> = HashMap::new();

    // 1️⃣ Hub bookings: revenue, one check-in, customer type, package
    for b in input.bookings {
        let day = b.check_in.date();
        if !in_range(day) {
            continue;
        }
        let row = days.entry(day).or_insert_with(|| DayRow::new(day));
        row.timesheet += b.amount_paid;
        row.check_ins += 1;
        row.packages += 1;

        if b.flags.student {
            mix.student += 1;
        } else if b.flags.examinee {
            mix.examinee += 1;
        } else {
            mix.regular += 1;
        }

        *packages.entry(b.package_name.clone()).or_insert(0) += 1;
    }

    // 2️⃣ Exclusive bookings: every guest counts as a check-in
    for e in input.exclusive {
        let day = e.booking_date;
        if !in_range(day) {
            continue;
        }
        let pax = e.pax.max(1);
        let row = days.entry(day).or_insert_with(|| DayRow::new(day));
        row.exclusive += e.amount_paid;
        row.check_ins += pax;
        mix.exclusive += pax;
    }

    // 3️⃣ Flexi sales: revenue only
    for f in input.flexi_sales {
        let day = f.created_at.date();
        if !in_range(day) {
            continue;
        }
        let row = days.entry(day).or_insert_with(|| DayRow::new(day));
        row.flexi += f.amount_paid;
        mix.flexi_member += 1;
    }

    // 4️⃣ Flexi visits: traffic only
    for l in input.flexi_logs {
        let day = l.check_in.date();
        if !in_range(day) {
            continue;
        }
        days.entry(day).or_insert_with(|| DayRow::new(day)).check_ins += 1;
    }

    // 5️⃣ Pantry sales
    for p in input.pantry {
        let day = p.created_at.date();
        if !in_range(day) {
            continue;
        }
        days.entry(day).or_insert_with(|| DayRow::new(day)).pantry += p.total_amount;

        for (name, qty) in parse_items_summary(&p.items_summary) {
            *pantry_units.entry(name).or_insert(0) += qty;
        }
    }

    let days: Vec<DayRow> = days.into_values().collect();

    let timesheet_total = days.iter().map(|d| d.timesheet).sum();
    let exclusive_total = days.iter().map(|d| d.exclusive).sum();
    let flexi_total = days.iter().map(|d| d.flexi).sum();
    let pantry_total = days.iter().map(|d| d.pantry).sum();

    let mut top_pantry_items = sorted_desc(pantry_units);
    top_pantry_items.truncate(TOP_PANTRY_ITEMS);

    Report {
        from: Some(from),
        to: Some(to),
        check_ins: days.iter().map(|d| d.check_ins).sum(),
        packages_sold: days.iter().map(|d| d.packages).sum(),
        grand_total: timesheet_total + exclusive_total + flexi_total + pantry_total,
        timesheet_total,
        exclusive_total,
        flexi_total,
        pantry_total,
        days,
        customer_mix: mix,
        package_popularity: sorted_desc(packages),
        top_pantry_items,
    }
}

/// Load every record set for the range and aggregate it. Stored rows that
/// could not be read are left out of the totals and reported in `Skipped`.
pub fn load_report(pool: &DbPool, from: NaiveDate, to: NaiveDate) -> AppResult<(Report, Skipped)> {
    let bounds = Some((from, to));
    let mut skipped = Skipped::default();

    let bookings = bookings_between(&pool.conn, bounds)?.into_rows("booking", &mut skipped);
    let exclusive =
        exclusive_between(&pool.conn, bounds)?.into_rows("exclusive booking", &mut skipped);
    let flexi_sales =
        accounts_sold_between(&pool.conn, bounds)?.into_rows("flexi membership", &mut skipped);
    let flexi_logs = logs_between(&pool.conn, bounds)?.into_rows("flexi visit", &mut skipped);
    let pantry = transactions_between(&pool.conn, bounds)?.into_rows("pantry sale", &mut skipped);

    let input = ReportInput {
        bookings: &bookings,
        exclusive: &exclusive,
        flexi_sales: &flexi_sales,
        flexi_logs: &flexi_logs,
        pantry: &pantry,
    };
    Ok((build_report(from, to, &input), skipped))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::booking::{BookingFlags, BookingStatus};
    use crate::models::exclusive::ExclusiveStatus;
    use crate::utils::time::parse_datetime;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn booking(at: &str, package: &str, amount: i64, flags: BookingFlags) -> Booking {
        Booking {
            id: 0,
            customer_name: "Guest".into(),
            seat_number: "A1".into(),
            package_id: Some(1),
            package_name: package.into(),
            duration_hours: 3.0,
            check_in: parse_datetime(at).unwrap(),
            check_out: None,
            amount_paid: amount,
            status: BookingStatus::Active,
            flags,
            rentals: String::new(),
            notes: String::new(),
        }
    }

    fn exclusive(date: &str, pax: i64, amount: i64) -> ExclusiveBooking {
        let start = parse_datetime(&format!("{date}T14:00")).unwrap();
        ExclusiveBooking {
            id: 0,
            client_name: "Study Group".into(),
            booking_date: start.date(),
            start_time: start.time(),
            end: start + chrono::Duration::hours(3),
            duration_hours: 3.0,
            pax,
            guest_list: String::new(),
            amount_paid: amount,
            status: ExclusiveStatus::Confirmed,
            notes: String::new(),
        }
    }

    fn sale(at: &str, summary: &str, amount: i64) -> PantryTransaction {
        PantryTransaction {
            id: 0,
            created_at: parse_datetime(at).unwrap(),
            items_summary: summary.into(),
            total_quantity: 0,
            total_amount: amount,
        }
    }

    #[test]
    fn bookings_and_exclusive_guests_count_as_check_ins() {
        let student = BookingFlags {
            student: true,
            ..Default::default()
        };
        let bookings = vec![
            booking("2025-03-03T09:00", "Daily Pass", 299, BookingFlags::default()),
            booking("2025-03-03T13:00", "Hourly", 138, student),
        ];
        let exclusive = vec![exclusive("2025-03-03", 5, 2997)];
        let input = ReportInput {
            bookings: &bookings,
            exclusive: &exclusive,
            ..Default::default()
        };

        let r = build_report(d("2025-03-01"), d("2025-03-31"), &input);

        assert_eq!(r.days.len(), 1);
        assert_eq!(r.days[0].check_ins, 7);
        assert_eq!(r.check_ins, 7);
        assert_eq!(r.packages_sold, 2);
        assert_eq!(r.days[0].total(), 299 + 138 + 2997);
        assert_eq!(r.grand_total, 3434);
        assert_eq!(r.customer_mix.student, 1);
        assert_eq!(r.customer_mix.regular, 1);
        assert_eq!(r.customer_mix.exclusive, 5);
    }

    #[test]
    fn zero_pax_counts_as_one_guest() {
        let exclusive = vec![exclusive("2025-03-04", 0, 999)];
        let input = ReportInput {
            exclusive: &exclusive,
            ..Default::default()
        };
        let r = build_report(d("2025-03-04"), d("2025-03-04"), &input);
        assert_eq!(r.check_ins, 1);
    }

    #[test]
    fn rows_outside_range_are_ignored_and_days_sorted() {
        let bookings = vec![
            booking("2025-03-05T09:00", "Daily Pass", 299, BookingFlags::default()),
            booking("2025-02-28T09:00", "Daily Pass", 299, BookingFlags::default()),
            booking("2025-03-02T09:00", "Hourly", 49, BookingFlags::default()),
        ];
        let input = ReportInput {
            bookings: &bookings,
            ..Default::default()
        };
        let r = build_report(d("2025-03-01"), d("2025-03-31"), &input);

        let dates: Vec<NaiveDate> = r.days.iter().map(|x| x.date).collect();
        assert_eq!(dates, [d("2025-03-02"), d("2025-03-05")]);
        assert_eq!(r.timesheet_total, 348);
    }

    #[test]
    fn parses_summary_and_skips_garbage() {
        let parsed = parse_items_summary(" 2x Oreo ,1x Coke, Free water, x Chips, 3x Cup Noodles");
        assert_eq!(
            parsed,
            vec![
                ("Oreo".to_string(), 2),
                ("Coke".to_string(), 1),
                ("Cup Noodles".to_string(), 3)
            ]
        );
    }

    #[test]
    fn top_pantry_items_are_truncated_to_five() {
        let pantry = vec![
            sale("2025-03-01T10:00", "5x Coke, 1x Oreo, 2x Chips", 0),
            sale("2025-03-02T10:00", "3x Oreo, 1x Water, 1x Bread, 4x Coffee", 0),
            sale("2025-03-02T11:00", "1x Candy", 0),
        ];
        let input = ReportInput {
            pantry: &pantry,
            ..Default::default()
        };
        let r = build_report(d("2025-03-01"), d("2025-03-31"), &input);

        assert_eq!(r.top_pantry_items.len(), 5);
        assert_eq!(r.top_pantry_items[0], ("Coke".to_string(), 5));
        assert_eq!(r.top_pantry_items[1], ("Coffee".to_string(), 4));
        assert_eq!(r.top_pantry_items[2], ("Oreo".to_string(), 4));
        assert_eq!(r.top_pantry_items[3], ("Chips".to_string(), 2));
        // ties at 1 unit resolved by name
        assert_eq!(r.top_pantry_items[4], ("Bread".to_string(), 1));
    }

    #[test]
    fn flexi_sales_add_revenue_and_logs_add_traffic() {
        let at = parse_datetime("2025-03-10T09:00").unwrap();
        let sales = vec![FlexiAccount {
            id: 1,
            client_name: "Mika".into(),
            plan: crate::models::flexi::FlexiPlan::Grind,
            start_date: at.date(),
            expiry_date: at.date(),
            total_hours_limit: Some(60.0),
            remaining_hours: Some(60.0),
            amount_paid: 2609,
            status: crate::models::flexi::FlexiStatus::Inactive,
            last_check_in: None,
            notes: String::new(),
            created_at: at,
        }];
        let logs = vec![FlexiLog {
            id: 1,
            account_id: 1,
            check_in: at,
            check_out: parse_datetime("2025-03-10T12:00").unwrap(),
            duration_hours: 3.0,
        }];
        let input = ReportInput {
            flexi_sales: &sales,
            flexi_logs: &logs,
            ..Default::default()
        };
        let r = build_report(d("2025-03-01"), d("2025-03-31"), &input);

        assert_eq!(r.flexi_total, 2609);
        assert_eq!(r.check_ins, 1);
        assert_eq!(r.customer_mix.flexi_member, 1);
    }

    #[test]
    fn unreadable_stored_rows_are_reported_not_hidden() {
        use crate::db::queries::bookings::insert_booking;
        use crate::db::queries::test_support::memory_pool;

        let pool = memory_pool();
        let loose = |amount| Booking {
            package_id: None,
            ..booking("2025-03-01T09:00", "Hourly", amount, BookingFlags::default())
        };
        insert_booking(&pool.conn, &loose(147)).unwrap();
        let bad = insert_booking(&pool.conn, &loose(98)).unwrap();
        pool.conn
            .execute("UPDATE bookings SET check_out = 'garbage' WHERE id = ?1", [bad])
            .unwrap();

        let (r, skipped) = load_report(&pool, d("2025-03-01"), d("2025-03-31")).unwrap();
        assert_eq!(r.timesheet_total, 147);
        assert_eq!(r.check_ins, 1);
        assert_eq!(skipped.counts(), &[("booking", 1)]);
    }
}
