use crate::core::calculator::duration::{self, Extension, effective_duration, hub_check_out};
use crate::core::calculator::rate::{extension_fee, hub_price};
use crate::db::log::ttlog_as;
use crate::db::pool::DbPool;
use crate::db::queries::{Loaded, Page};
use crate::db::queries::bookings::{
    BookingRow, delete_booking, insert_booking, list_bookings, load_booking, overdue_bookings,
    update_booking,
};
use crate::db::queries::packages::load_package;
use crate::errors::{AppError, AppResult};
use crate::models::booking::{Booking, BookingFlags, BookingStatus};
use crate::models::session::Session;
use crate::utils::formatting;
use crate::utils::time;
use chrono::NaiveDateTime;

/// Input of `booking checkin`.
#[derive(Debug, Clone, Default)]
pub struct NewBooking {
    pub customer_name: String,
    pub seat_number: String,
    pub package_id: i64,
    /// Required for hourly packages, ignored otherwise.
    pub hours: Option<f64>,
    pub flags: BookingFlags,
    pub rentals: String,
    pub notes: String,
    /// Defaults to the command clock.
    pub check_in: Option<NaiveDateTime>,
}

/// Changes requested by `booking edit`; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct BookingEdit {
    pub customer_name: Option<String>,
    pub seat_number: Option<String>,
    pub check_in: Option<NaiveDateTime>,
    pub check_out: Option<NaiveDateTime>,
    pub amount_paid: Option<i64>,
    pub rentals: Option<String>,
    pub notes: Option<String>,
}

pub struct BookingLogic;

fn ensure_order(b: &Booking) -> AppResult<()> {
    if let Some(out) = b.check_out
        && out < b.check_in
    {
        return Err(AppError::InvalidTime(format!(
            "check-out {} is before check-in {}",
            time::to_db(&out),
            time::to_db(&b.check_in)
        )));
    }
    Ok(())
}

impl BookingLogic {
    pub fn check_in(
        pool: &mut DbPool,
        session: &Session,
        req: NewBooking,
        now: NaiveDateTime,
    ) -> AppResult<Booking> {
        // 1️⃣ Validate input
        let name = req.customer_name.trim();
        if name.is_empty() {
            return Err(AppError::InvalidInput("customer name cannot be empty".into()));
        }

        let pkg = load_package(&pool.conn, req.package_id)?;

        let hours = match (pkg.is_hourly, req.hours) {
            (true, Some(h)) => time::ensure_hours(h, time::MAX_BOOKING_HOURS)?,
            (true, None) => {
                return Err(AppError::InvalidInput(format!(
                    "'{}' is billed per hour: pass --hours with a positive value",
                    pkg.name
                )));
            }
            (false, _) => 0.0,
        };

        // 2️⃣ Resolve duration, schedule and price
        let check_in = req.check_in.unwrap_or(now);
        let duration_hours = effective_duration(&pkg, hours);
        let check_out = if duration_hours > 0.0 {
            Some(hub_check_out(check_in, &pkg, hours)?)
        } else {
            None
        };
        let amount_paid = hub_price(&pkg, hours, &req.flags);

        let notes = if req.flags.loyalty {
            Booking::loyalty_notes(&req.notes)
        } else {
            req.notes.trim().to_string()
        };

        let mut booking = Booking {
            id: 0,
            customer_name: name.to_string(),
            seat_number: req.seat_number.trim().to_string(),
            package_id: Some(pkg.id),
            package_name: pkg.name.clone(),
            duration_hours,
            check_in,
            check_out,
            amount_paid,
            status: BookingStatus::Active,
            flags: req.flags,
            rentals: req.rentals.trim().to_string(),
            notes,
        };

        // 3️⃣ Persist + audit
        booking.id = insert_booking(&pool.conn, &booking)?;

        ttlog_as(
            &pool.conn,
            session,
            "add",
            &format!("booking #{}", booking.id),
            &format!(
                "Checked in {} on seat '{}' with '{}' for {} pesos",
                booking.customer_name, booking.seat_number, booking.package_name, amount_paid
            ),
        )?;

        Ok(booking)
    }

    pub fn edit(
        pool: &mut DbPool,
        session: &Session,
        id: i64,
        changes: BookingEdit,
    ) -> AppResult<Booking> {
        let mut b = load_booking(&pool.conn, id)?;

        if let Some(name) = changes.customer_name {
            if name.trim().is_empty() {
                return Err(AppError::InvalidInput("customer name cannot be empty".into()));
            }
            b.customer_name = name.trim().to_string();
        }
        if let Some(seat) = changes.seat_number {
            b.seat_number = seat.trim().to_string();
        }
        if let Some(ci) = changes.check_in {
            b.check_in = ci;
        }
        if let Some(co) = changes.check_out {
            b.check_out = Some(co);
        }
        if let Some(amount) = changes.amount_paid {
            if amount < 0 {
                return Err(AppError::InvalidInput("amount cannot be negative".into()));
            }
            b.amount_paid = amount;
        }
        if let Some(r) = changes.rentals {
            b.rentals = r.trim().to_string();
        }
        if let Some(n) = changes.notes {
            b.notes = n.trim().to_string();
        }

        ensure_order(&b)?;
        update_booking(&pool.conn, &b)?;

        ttlog_as(
            &pool.conn,
            session,
            "edit",
            &format!("booking #{id}"),
            &format!("Updated booking of {}", b.customer_name),
        )?;
        Ok(b)
    }

    /// Add hours to an active booking. `fee` overrides the default
    /// `hours × rate` charge.
    #[allow(clippy::too_many_arguments)]
    pub fn extend(
        pool: &mut DbPool,
        session: &Session,
        id: i64,
        hours: f64,
        fee: Option<i64>,
        rate: i64,
        symbol: &str,
        now: NaiveDateTime,
    ) -> AppResult<(Booking, Extension)> {
        time::ensure_hours(hours, time::MAX_BOOKING_HOURS)?;

        let mut b = load_booking(&pool.conn, id)?;
        if !b.is_active() {
            return Err(AppError::BookingCompleted(id));
        }

        let fee = match fee {
            Some(f) if f < 0 => {
                return Err(AppError::InvalidInput("fee cannot be negative".into()));
            }
            Some(f) => f,
            None => extension_fee(hours, rate),
        };

        let ext = duration::extend(&b, hours, fee, now)?;
        b.check_out = Some(ext.new_check_out);
        b.duration_hours = ext.new_duration;
        b.amount_paid = ext.new_amount;
        b.append_note(&format!(
            "Extended +{}h ({})",
            formatting::hours(hours),
            formatting::money(fee, symbol)
        ));

        update_booking(&pool.conn, &b)?;

        ttlog_as(
            &pool.conn,
            session,
            "extend",
            &format!("booking #{id}"),
            &format!("Extended by {hours}h, fee {fee} pesos"),
        )?;
        Ok((b, ext))
    }

    /// Close an active booking at `now` (never earlier than its check-in).
    pub fn check_out(
        pool: &mut DbPool,
        session: &Session,
        id: i64,
        now: NaiveDateTime,
    ) -> AppResult<Booking> {
        let mut b = load_booking(&pool.conn, id)?;
        if !b.is_active() {
            return Err(AppError::BookingCompleted(id));
        }

        b.check_out = Some(now.max(b.check_in));
        b.status = BookingStatus::Completed;
        update_booking(&pool.conn, &b)?;

        ttlog_as(
            &pool.conn,
            session,
            "checkout",
            &format!("booking #{id}"),
            &format!("Checked out {}", b.customer_name),
        )?;
        Ok(b)
    }

    pub fn delete(pool: &mut DbPool, session: &Session, id: i64) -> AppResult<Booking> {
        let b = load_booking(&pool.conn, id)?;
        delete_booking(&pool.conn, id)?;

        ttlog_as(
            &pool.conn,
            session,
            "del",
            &format!("booking #{id}"),
            &format!("Deleted booking of {}", b.customer_name),
        )?;
        Ok(b)
    }

    pub fn list(
        pool: &DbPool,
        search: Option<&str>,
        page: usize,
        page_size: usize,
    ) -> AppResult<Page<BookingRow>> {
        list_bookings(&pool.conn, search, page, page_size)
    }

    /// Active bookings whose scheduled check-out is already past.
    pub fn overdue(pool: &DbPool, now: NaiveDateTime) -> AppResult<Loaded<Booking>> {
        overdue_bookings(&pool.conn, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::session::SessionLogic;
    use crate::db::queries::packages::insert_package;
    use crate::db::queries::test_support::memory_pool;
    use crate::models::package::Package;

    fn at(s: &str) -> NaiveDateTime {
        time::parse_datetime(s).unwrap()
    }

    fn setup() -> (DbPool, Session, i64, i64) {
        let mut pool = memory_pool();
        let session = SessionLogic::login(&mut pool, "Kim", 12, at("2025-03-01T08:00")).unwrap();
        let hourly = insert_package(&pool.conn, &Package::new("Hourly", 49, 0.0, true)).unwrap();
        let daily = insert_package(&pool.conn, &Package::new("Daily Pass", 299, 8.0, false)).unwrap();
        (pool, session, hourly, daily)
    }

    #[test]
    fn hourly_student_check_in_is_priced_and_scheduled() {
        let (mut pool, session, hourly, _) = setup();
        let req = NewBooking {
            customer_name: "Ana Reyes".into(),
            seat_number: "B2".into(),
            package_id: hourly,
            hours: Some(3.0),
            flags: BookingFlags {
                student: true,
                ..Default::default()
            },
            ..Default::default()
        };

        let b = BookingLogic::check_in(&mut pool, &session, req, at("2025-03-01T09:00")).unwrap();
        // 49 × 3 = 147, minus 8% = 135.24
        assert_eq!(b.amount_paid, 135);
        assert_eq!(b.check_out, Some(at("2025-03-01T12:00")));
    }

    #[test]
    fn hourly_package_requires_hours() {
        let (mut pool, session, hourly, _) = setup();
        let req = NewBooking {
            customer_name: "Ana".into(),
            package_id: hourly,
            ..Default::default()
        };
        assert!(matches!(
            BookingLogic::check_in(&mut pool, &session, req, at("2025-03-01T09:00")),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn loyalty_award_is_free_and_marked() {
        let (mut pool, session, _, daily) = setup();
        let req = NewBooking {
            customer_name: "Ben".into(),
            package_id: daily,
            flags: BookingFlags {
                loyalty: true,
                ..Default::default()
            },
            notes: "10th visit".into(),
            ..Default::default()
        };
        let b = BookingLogic::check_in(&mut pool, &session, req, at("2025-03-01T09:00")).unwrap();
        assert_eq!(b.amount_paid, 0);
        assert_eq!(b.notes, "[Loyalty Award] 10th visit");
    }

    #[test]
    fn extend_then_checkout() {
        let (mut pool, session, _, daily) = setup();
        let req = NewBooking {
            customer_name: "Ben".into(),
            package_id: daily,
            ..Default::default()
        };
        let b = BookingLogic::check_in(&mut pool, &session, req, at("2025-03-01T09:00")).unwrap();

        let (ext_b, ext) = BookingLogic::extend(
            &mut pool,
            &session,
            b.id,
            2.0,
            None,
            49,
            "₱",
            at("2025-03-01T16:00"),
        )
        .unwrap();
        assert_eq!(ext.fee, 98);
        assert_eq!(ext_b.amount_paid, 397);
        assert_eq!(ext_b.duration_hours, 10.0);
        assert_eq!(ext_b.check_out, Some(at("2025-03-01T19:00")));
        assert!(ext_b.notes.contains("Extended +2h"));

        let done = BookingLogic::check_out(&mut pool, &session, b.id, at("2025-03-01T18:30")).unwrap();
        assert_eq!(done.status, BookingStatus::Completed);

        assert!(matches!(
            BookingLogic::extend(&mut pool, &session, b.id, 1.0, None, 49, "₱", at("2025-03-01T19:00")),
            Err(AppError::BookingCompleted(_))
        ));
    }

    #[test]
    fn out_of_range_hours_are_rejected_without_saving() {
        let (mut pool, session, hourly, daily) = setup();
        for bad in [1e10, f64::INFINITY, f64::NAN, 0.0, 30.0] {
            let req = NewBooking {
                customer_name: "Ana".into(),
                package_id: hourly,
                hours: Some(bad),
                ..Default::default()
            };
            assert!(matches!(
                BookingLogic::check_in(&mut pool, &session, req, at("2025-03-01T09:00")),
                Err(AppError::InvalidInput(_))
            ));
        }
        assert_eq!(BookingLogic::list(&pool, None, 1, 10).unwrap().total_rows, 0);

        let req = NewBooking {
            customer_name: "Ben".into(),
            package_id: daily,
            ..Default::default()
        };
        let b = BookingLogic::check_in(&mut pool, &session, req, at("2025-03-01T09:00")).unwrap();
        for bad in [f64::INFINITY, f64::NAN, 1e10] {
            assert!(matches!(
                BookingLogic::extend(&mut pool, &session, b.id, bad, None, 49, "₱", at("2025-03-01T12:00")),
                Err(AppError::InvalidInput(_))
            ));
        }
        let stored = load_booking(&pool.conn, b.id).unwrap();
        assert_eq!(stored.amount_paid, 299);
        assert_eq!(stored.check_out, Some(at("2025-03-01T17:00")));
    }

    #[test]
    fn edit_rejects_check_out_before_check_in() {
        let (mut pool, session, _, daily) = setup();
        let req = NewBooking {
            customer_name: "Ben".into(),
            package_id: daily,
            ..Default::default()
        };
        let b = BookingLogic::check_in(&mut pool, &session, req, at("2025-03-01T09:00")).unwrap();

        let changes = BookingEdit {
            check_out: Some(at("2025-03-01T08:00")),
            ..Default::default()
        };
        assert!(matches!(
            BookingLogic::edit(&mut pool, &session, b.id, changes),
            Err(AppError::InvalidTime(_))
        ));
    }

    #[test]
    fn overdue_lists_only_open_bookings_past_their_time() {
        let (mut pool, session, hourly, daily) = setup();
        let short = NewBooking {
            customer_name: "Ana".into(),
            package_id: hourly,
            hours: Some(1.0),
            ..Default::default()
        };
        let long = NewBooking {
            customer_name: "Ben".into(),
            package_id: daily,
            ..Default::default()
        };
        let a = BookingLogic::check_in(&mut pool, &session, short, at("2025-03-01T09:00")).unwrap();
        BookingLogic::check_in(&mut pool, &session, long, at("2025-03-01T09:00")).unwrap();

        let late = BookingLogic::overdue(&pool, at("2025-03-01T10:30")).unwrap().rows;
        assert_eq!(late.len(), 1);
        assert_eq!(late[0].customer_name, "Ana");

        BookingLogic::check_out(&mut pool, &session, a.id, at("2025-03-01T10:35")).unwrap();
        assert!(BookingLogic::overdue(&pool, at("2025-03-01T10:40")).unwrap().rows.is_empty());
    }
}
