use crate::core::calculator::duration::{exclusive_end, pax_from_guest_list};
use crate::core::calculator::rate::{ExclusiveQuote, exclusive_quote};
use crate::db::log::ttlog_as;
use crate::db::pool::DbPool;
use crate::db::queries::Page;
use crate::db::queries::exclusive::{
    ExclusiveRow, delete_exclusive, insert_exclusive, list_exclusive, load_exclusive,
    update_exclusive,
};
use crate::errors::{AppError, AppResult};
use crate::models::exclusive::{ExclusiveBooking, ExclusiveStatus};
use crate::models::session::Session;
use crate::utils::time::{MAX_BOOKING_HOURS, ensure_hours};
use chrono::{NaiveDate, NaiveTime};

/// Input of `exclusive add`.
#[derive(Debug, Clone)]
pub struct NewExclusive {
    pub client_name: String,
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub hours: f64,
    pub pax: i64,
    pub guest_list: String,
    pub notes: String,
    /// Negotiated total replacing the computed quote.
    pub amount_override: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct ExclusiveEdit {
    pub client_name: Option<String>,
    pub date: Option<NaiveDate>,
    pub start: Option<NaiveTime>,
    pub hours: Option<f64>,
    pub pax: Option<i64>,
    pub guest_list: Option<String>,
    pub notes: Option<String>,
    pub amount_paid: Option<i64>,
}

pub struct ExclusiveLogic;

impl ExclusiveLogic {
    /// Price preview without saving anything.
    pub fn quote(start: NaiveTime, hours: f64, base_rate: i64) -> AppResult<ExclusiveQuote> {
        ensure_hours(hours, MAX_BOOKING_HOURS)?;
        Ok(exclusive_quote(start, hours, base_rate))
    }

    pub fn add(
        pool: &mut DbPool,
        session: &Session,
        req: NewExclusive,
        base_rate: i64,
    ) -> AppResult<(ExclusiveBooking, ExclusiveQuote)> {
        let name = req.client_name.trim();
        if name.is_empty() {
            return Err(AppError::InvalidInput("client name cannot be empty".into()));
        }
        ensure_hours(req.hours, MAX_BOOKING_HOURS)?;

        let quote = exclusive_quote(req.start, req.hours, base_rate);

        let mut booking = ExclusiveBooking {
            id: 0,
            client_name: name.to_string(),
            booking_date: req.date,
            start_time: req.start,
            end: exclusive_end(req.date, req.start, req.hours)?,
            duration_hours: req.hours,
            pax: pax_from_guest_list(&req.guest_list, req.pax),
            guest_list: req.guest_list.trim().to_string(),
            amount_paid: req.amount_override.unwrap_or(quote.total),
            status: ExclusiveStatus::Confirmed,
            notes: req.notes.trim().to_string(),
        };

        booking.id = insert_exclusive(&pool.conn, &booking)?;

        ttlog_as(
            &pool.conn,
            session,
            "add",
            &format!("exclusive #{}", booking.id),
            &format!(
                "Reserved space for {} on {} ({} pax, {} pesos)",
                booking.client_name, booking.booking_date, booking.pax, booking.amount_paid
            ),
        )?;

        Ok((booking, quote))
    }

    /// Apply changes. A new date, start or duration moves the end time; the
    /// amount is only re-quoted when the schedule changed and no explicit
    /// amount was given.
    pub fn edit(
        pool: &mut DbPool,
        session: &Session,
        id: i64,
        changes: ExclusiveEdit,
        base_rate: i64,
    ) -> AppResult<ExclusiveBooking> {
        let mut e = load_exclusive(&pool.conn, id)?;

        if let Some(name) = changes.client_name {
            if name.trim().is_empty() {
                return Err(AppError::InvalidInput("client name cannot be empty".into()));
            }
            e.client_name = name.trim().to_string();
        }

        let rescheduled =
            changes.date.is_some() || changes.start.is_some() || changes.hours.is_some();

        if let Some(d) = changes.date {
            e.booking_date = d;
        }
        if let Some(s) = changes.start {
            e.start_time = s;
        }
        if let Some(h) = changes.hours {
            ensure_hours(h, MAX_BOOKING_HOURS)?;
            e.duration_hours = h;
        }
        if rescheduled {
            e.end = exclusive_end(e.booking_date, e.start_time, e.duration_hours)?;
        }

        if let Some(list) = changes.guest_list {
            e.guest_list = list.trim().to_string();
        }
        if changes.pax.is_some() || !e.guest_list.is_empty() {
            e.pax = pax_from_guest_list(&e.guest_list, changes.pax.unwrap_or(e.pax));
        }
        if let Some(n) = changes.notes {
            e.notes = n.trim().to_string();
        }

        match changes.amount_paid {
            Some(a) if a < 0 => {
                return Err(AppError::InvalidInput("amount cannot be negative".into()));
            }
            Some(a) => e.amount_paid = a,
            None if rescheduled => {
                e.amount_paid = exclusive_quote(e.start_time, e.duration_hours, base_rate).total;
            }
            None => {}
        }

        update_exclusive(&pool.conn, &e)?;

        ttlog_as(
            &pool.conn,
            session,
            "edit",
            &format!("exclusive #{id}"),
            &format!("Updated reservation of {}", e.client_name),
        )?;
        Ok(e)
    }

    pub fn complete(pool: &mut DbPool, session: &Session, id: i64) -> AppResult<ExclusiveBooking> {
        let mut e = load_exclusive(&pool.conn, id)?;
        if e.status == ExclusiveStatus::Completed {
            return Err(AppError::BookingCompleted(id));
        }

        e.status = ExclusiveStatus::Completed;
        update_exclusive(&pool.conn, &e)?;

        ttlog_as(
            &pool.conn,
            session,
            "complete",
            &format!("exclusive #{id}"),
            &format!("Completed reservation of {}", e.client_name),
        )?;
        Ok(e)
    }

    pub fn delete(pool: &mut DbPool, session: &Session, id: i64) -> AppResult<ExclusiveBooking> {
        let e = load_exclusive(&pool.conn, id)?;
        delete_exclusive(&pool.conn, id)?;

        ttlog_as(
            &pool.conn,
            session,
            "del",
            &format!("exclusive #{id}"),
            &format!("Deleted reservation of {}", e.client_name),
        )?;
        Ok(e)
    }

    pub fn list(
        pool: &DbPool,
        search: Option<&str>,
        page: usize,
        page_size: usize,
    ) -> AppResult<Page<ExclusiveRow>> {
        list_exclusive(&pool.conn, search, page, page_size)
    }
}
