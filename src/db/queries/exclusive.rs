use crate::db::queries::{Loaded, Page, collect_readable, conversion_error, get_date, get_time, like_pattern};
use crate::errors::{AppError, AppResult};
use crate::models::exclusive::{ExclusiveBooking, ExclusiveStatus};
use crate::utils::{date, time};
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

pub fn map_row(row: &Row) -> Result<ExclusiveBooking> {
    let status_str: String = row.get("status")?;
    let status = ExclusiveStatus::from_db_str(&status_str).ok_or_else(|| {
        conversion_error(0, AppError::InvalidInput(format!("Invalid status: {status_str}")))
    })?;

    let end_date = get_date(row, "end_date")?;
    let end_time = get_time(row, "end_time")?;

    Ok(ExclusiveBooking {
        id: row.get("id")?,
        client_name: row.get("client_name")?,
        booking_date: get_date(row, "booking_date")?,
        start_time: get_time(row, "start_time")?,
        end: end_date.and_time(end_time),
        duration_hours: row.get("duration_hours")?,
        pax: row.get("pax")?,
        guest_list: row.get("guest_list")?,
        amount_paid: row.get("amount_paid")?,
        status,
        notes: row.get("notes")?,
    })
}

/// Listing row with date/time columns exactly as stored.
#[derive(Debug, Clone)]
pub struct ExclusiveRow {
    pub id: i64,
    pub client_name: String,
    pub booking_date: String,
    pub start_time: String,
    pub end_date: String,
    pub end_time: String,
    pub duration_hours: f64,
    pub pax: i64,
    pub amount_paid: i64,
    pub status: String,
}

fn map_list_row(row: &Row) -> Result<ExclusiveRow> {
    Ok(ExclusiveRow {
        id: row.get("id")?,
        client_name: row.get("client_name")?,
        booking_date: row.get("booking_date")?,
        start_time: row.get("start_time")?,
        end_date: row.get("end_date")?,
        end_time: row.get("end_time")?,
        duration_hours: row.get("duration_hours")?,
        pax: row.get("pax")?,
        amount_paid: row.get("amount_paid")?,
        status: row.get("status")?,
    })
}

pub fn insert_exclusive(conn: &Connection, e: &ExclusiveBooking) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO exclusive_bookings (client_name, booking_date, start_time, end_date, end_time,
                                         duration_hours, pax, guest_list, amount_paid, status, notes)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            e.client_name,
            date::to_db(&e.booking_date),
            e.start_time.format(time::DB_TIME_FMT).to_string(),
            date::to_db(&e.end.date()),
            e.end.time().format(time::DB_TIME_FMT).to_string(),
            e.duration_hours,
            e.pax,
            e.guest_list,
            e.amount_paid,
            e.status.to_db_str(),
            e.notes,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn update_exclusive(conn: &Connection, e: &ExclusiveBooking) -> AppResult<()> {
    let changed = conn.execute(
        "UPDATE exclusive_bookings
         SET client_name = ?1, booking_date = ?2, start_time = ?3, end_date = ?4, end_time = ?5,
             duration_hours = ?6, pax = ?7, guest_list = ?8, amount_paid = ?9, status = ?10,
             notes = ?11
         WHERE id = ?12",
        params![
            e.client_name,
            date::to_db(&e.booking_date),
            e.start_time.format(time::DB_TIME_FMT).to_string(),
            date::to_db(&e.end.date()),
            e.end.time().format(time::DB_TIME_FMT).to_string(),
            e.duration_hours,
            e.pax,
            e.guest_list,
            e.amount_paid,
            e.status.to_db_str(),
            e.notes,
            e.id,
        ],
    )?;
    if changed == 0 {
        return Err(AppError::NotFound {
            entity: "Exclusive booking",
            id: e.id,
        });
    }
    Ok(())
}

pub fn load_exclusive(conn: &Connection, id: i64) -> AppResult<ExclusiveBooking> {
    conn.query_row(
        "SELECT * FROM exclusive_bookings WHERE id = ?1",
        [id],
        map_row,
    )
    .optional()?
    .ok_or(AppError::NotFound {
        entity: "Exclusive booking",
        id,
    })
}

pub fn delete_exclusive(conn: &Connection, id: i64) -> AppResult<()> {
    let removed = conn.execute("DELETE FROM exclusive_bookings WHERE id = ?1", [id])?;
    if removed == 0 {
        return Err(AppError::NotFound {
            entity: "Exclusive booking",
            id,
        });
    }
    Ok(())
}

/// Upcoming-first listing (latest date on top).
pub fn list_exclusive(
    conn: &Connection,
    search: Option<&str>,
    page: usize,
    page_size: usize,
) -> AppResult<Page<ExclusiveRow>> {
    let pattern = like_pattern(search);

    let total_rows: i64 = conn.query_row(
        "SELECT COUNT(*) FROM exclusive_bookings WHERE lower(client_name) LIKE ?1",
        [&pattern],
        |r| r.get(0),
    )?;

    let (page, total_pages, offset) =
        Page::<ExclusiveRow>::window(page, page_size, total_rows as usize);

    let mut stmt = conn.prepare(
        "SELECT * FROM exclusive_bookings
         WHERE lower(client_name) LIKE ?1
         ORDER BY booking_date DESC, start_time DESC, id DESC
         LIMIT ?2 OFFSET ?3",
    )?;
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

/// Reservations by booking date. Rows with unreadable dates are counted, not returned.
pub fn exclusive_between(
    conn: &Connection,
    bounds: Option<(NaiveDate, NaiveDate)>,
) -> AppResult<Loaded<ExclusiveBooking>> {
    let (from, to) = date::bounds_to_db(bounds);
    let mut stmt = conn.prepare(
        "SELECT * FROM exclusive_bookings
         WHERE booking_date BETWEEN ?1 AND ?2
         ORDER BY booking_date ASC, start_time ASC",
    )?;
    let rows = stmt.query_map(params![from, to], map_row)?;
    collect_readable(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::calculator::duration::exclusive_end;
    use crate::db::queries::test_support::memory_pool;

    #[test]
    fn overnight_end_round_trips_through_two_columns() {
        let pool = memory_pool();
        let day = date::parse_date("2025-03-01").unwrap();
        let start = time::parse_time("22:00").unwrap();
        let e = ExclusiveBooking {
            id: 0,
            client_name: "Thesis Team".into(),
            booking_date: day,
            start_time: start,
            end: exclusive_end(day, start, 4.0).unwrap(),
            duration_hours: 4.0,
            pax: 6,
            guest_list: String::new(),
            amount_paid: 3996,
            status: ExclusiveStatus::Confirmed,
            notes: String::new(),
        };
        let id = insert_exclusive(&pool.conn, &e).unwrap();

        let loaded = load_exclusive(&pool.conn, id).unwrap();
        assert!(loaded.crosses_midnight());
        assert_eq!(date::to_db(&loaded.end.date()), "2025-03-02");
    }

    #[test]
    fn malformed_time_is_listed_raw() {
        let pool = memory_pool();
        pool.conn
            .execute(
                "INSERT INTO exclusive_bookings (client_name, booking_date, start_time, end_date, end_time)
                 VALUES ('Legacy', '2025-01-01', 'noonish', '2025-01-01', '??')",
                [],
            )
            .unwrap();

        let page = list_exclusive(&pool.conn, None, 1, 10).unwrap();
        assert_eq!(page.rows[0].start_time, "noonish");
        let loaded = exclusive_between(&pool.conn, None).unwrap();
        assert!(loaded.rows.is_empty());
        assert_eq!(loaded.skipped, 1);
    }
}
