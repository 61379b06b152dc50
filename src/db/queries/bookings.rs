use crate::db::queries::{
    Loaded, Page, collect_readable, conversion_error, get_bool, get_datetime, get_opt_datetime, like_pattern,
};
use crate::errors::{AppError, AppResult};
use crate::models::booking::{Booking, BookingFlags, BookingStatus};
use crate::utils::time;
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

/// Columns shared by every booking SELECT. The package name shown is the
/// current one when the package still exists, the stored snapshot otherwise.
const SELECT_BOOKING: &str = "
    SELECT b.id, b.customer_name, b.seat_number, b.package_id,
           COALESCE(p.name, b.package_name) AS package_name,
           b.duration_hours, b.check_in, b.check_out, b.amount_paid, b.status,
           b.is_student, b.is_examinee, b.is_group, b.is_loyalty,
           b.rentals, b.notes
    FROM bookings b
    LEFT JOIN packages p ON p.id = b.package_id";

pub fn map_row(row: &Row) -> Result<Booking> {
    let status_str: String = row.get("status")?;
    let status = BookingStatus::from_db_str(&status_str).ok_or_else(|| {
        conversion_error(0, AppError::InvalidInput(format!("Invalid status: {status_str}")))
    })?;

    Ok(Booking {
        id: row.get("id")?,
        customer_name: row.get("customer_name")?,
        seat_number: row.get("seat_number")?,
        package_id: row.get("package_id")?,
        package_name: row.get("package_name")?,
        duration_hours: row.get("duration_hours")?,
        check_in: get_datetime(row, "check_in")?,
        check_out: get_opt_datetime(row, "check_out")?,
        amount_paid: row.get("amount_paid")?,
        status,
        flags: BookingFlags {
            student: get_bool(row, "is_student")?,
            examinee: get_bool(row, "is_examinee")?,
            group: get_bool(row, "is_group")?,
            loyalty: get_bool(row, "is_loyalty")?,
        },
        rentals: row.get("rentals")?,
        notes: row.get("notes")?,
    })
}

/// Listing row: timestamps stay as stored so bad values can still be shown.
#[derive(Debug, Clone)]
pub struct BookingRow {
    pub id: i64,
    pub customer_name: String,
    pub seat_number: String,
    pub package_name: String,
    pub duration_hours: f64,
    pub check_in: String,
    pub check_out: Option<String>,
    pub amount_paid: i64,
    pub status: String,
    pub is_student: bool,
    pub is_examinee: bool,
    pub is_loyalty: bool,
}

fn map_list_row(row: &Row) -> Result<BookingRow> {
    Ok(BookingRow {
        id: row.get("id")?,
        customer_name: row.get("customer_name")?,
        seat_number: row.get("seat_number")?,
        package_name: row.get("package_name")?,
        duration_hours: row.get("duration_hours")?,
        check_in: row.get("check_in")?,
        check_out: row.get("check_out")?,
        amount_paid: row.get("amount_paid")?,
        status: row.get("status")?,
        is_student: get_bool(row, "is_student")?,
        is_examinee: get_bool(row, "is_examinee")?,
        is_loyalty: get_bool(row, "is_loyalty")?,
    })
}

pub fn insert_booking(conn: &Connection, b: &Booking) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO bookings (customer_name, seat_number, package_id, package_name,
                               duration_hours, check_in, check_out, amount_paid, status,
                               is_student, is_examinee, is_group, is_loyalty, rentals, notes)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
        params![
            b.customer_name,
            b.seat_number,
            b.package_id,
            b.package_name,
            b.duration_hours,
            time::to_db(&b.check_in),
            b.check_out.as_ref().map(time::to_db),
            b.amount_paid,
            b.status.to_db_str(),
            b.flags.student as i64,
            b.flags.examinee as i64,
            b.flags.group as i64,
            b.flags.loyalty as i64,
            b.rentals,
            b.notes,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Update all fields except id.
pub fn update_booking(conn: &Connection, b: &Booking) -> AppResult<()> {
    let changed = conn.execute(
        "UPDATE bookings
         SET customer_name = ?1, seat_number = ?2, package_id = ?3, package_name = ?4,
             duration_hours = ?5, check_in = ?6, check_out = ?7, amount_paid = ?8,
             status = ?9, is_student = ?10, is_examinee = ?11, is_group = ?12,
             is_loyalty = ?13, rentals = ?14, notes = ?15
         WHERE id = ?16",
        params![
            b.customer_name,
            b.seat_number,
            b.package_id,
            b.package_name,
            b.duration_hours,
            time::to_db(&b.check_in),
            b.check_out.as_ref().map(time::to_db),
            b.amount_paid,
            b.status.to_db_str(),
            b.flags.student as i64,
            b.flags.examinee as i64,
            b.flags.group as i64,
            b.flags.loyalty as i64,
            b.rentals,
            b.notes,
            b.id,
        ],
    )?;
    if changed == 0 {
        return Err(AppError::NotFound {
            entity: "Booking",
            id: b.id,
        });
    }
    Ok(())
}

pub fn load_booking(conn: &Connection, id: i64) -> AppResult<Booking> {
    conn.query_row(&format!("{SELECT_BOOKING} WHERE b.id = ?1"), [id], map_row)
        .optional()?
        .ok_or(AppError::NotFound {
            entity: "Booking",
            id,
        })
}

pub fn delete_booking(conn: &Connection, id: i64) -> AppResult<()> {
    let removed = conn.execute("DELETE FROM bookings WHERE id = ?1", [id])?;
    if removed == 0 {
        return Err(AppError::NotFound {
            entity: "Booking",
            id,
        });
    }
    Ok(())
}

/// Newest first, filtered by customer name or seat.
pub fn list_bookings(
    conn: &Connection,
    search: Option<&str>,
    page: usize,
    page_size: usize,
) -> AppResult<Page<BookingRow>> {
    let pattern = like_pattern(search);

    let total_rows: i64 = conn.query_row(
        "SELECT COUNT(*) FROM bookings
         WHERE lower(customer_name) LIKE ?1 OR lower(seat_number) LIKE ?1",
        [&pattern],
        |r| r.get(0),
    )?;

    let (page, total_pages, offset) = Page::<BookingRow>::window(page, page_size, total_rows as usize);

    let mut stmt = conn.prepare(&format!(
        "{SELECT_BOOKING}
         WHERE lower(b.customer_name) LIKE ?1 OR lower(b.seat_number) LIKE ?1
         ORDER BY b.check_in DESC, b.id DESC
         LIMIT ?2 OFFSET ?3"
    ))?;
    let rows = stmt.query_map(params![pattern, page_size as i64, offset], map_list_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }

    Ok(Page {
        rows: out,
        page,
        total_pages,
        total_rows: total_rows as usize,
    })
}

/// Bookings whose check-in falls on a date within the bounds (all when
/// `None`). Rows with unreadable timestamps are counted, not returned.
pub fn bookings_between(
    conn: &Connection,
    bounds: Option<(NaiveDate, NaiveDate)>,
) -> AppResult<Loaded<Booking>> {
    let (from, to) = crate::utils::date::bounds_to_db(bounds);
    let mut stmt = conn.prepare(&format!(
        "{SELECT_BOOKING}
         WHERE substr(b.check_in, 1, 10) BETWEEN ?1 AND ?2
         ORDER BY b.check_in ASC"
    ))?;

    let rows = stmt.query_map(params![from, to], map_row)?;
    collect_readable(rows)
}

/// Active bookings that should already have ended.
pub fn overdue_bookings(conn: &Connection, now: NaiveDateTime) -> AppResult<Loaded<Booking>> {
    let mut stmt = conn.prepare(&format!(
        "{SELECT_BOOKING}
         WHERE b.status = 'Active' AND b.check_out IS NOT NULL AND b.check_out < ?1
         ORDER BY b.check_out ASC"
    ))?;
    let rows = stmt.query_map([time::to_db(&now)], map_row)?;
    collect_readable(rows)
}
