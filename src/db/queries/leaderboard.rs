use crate::core::leaderboard::{LOYALTY_MIN_HOURS, Visit};
use crate::db::queries::{Loaded, collect_readable, get_datetime};
use crate::errors::AppResult;
use rusqlite::{Connection, Result, Row};

fn map_visit(row: &Row) -> Result<Visit> {
    Ok(Visit {
        name: row.get("name")?,
        date: get_datetime(row, "date")?,
        hours: row.get("hours")?,
    })
}

/// Qualifying visits: hub bookings and Flexi sessions of at least
/// `LOYALTY_MIN_HOURS`. Unreadable rows are counted, not returned.
pub fn loyalty_visits(conn: &Connection) -> AppResult<Loaded<Visit>> {
    let mut stmt = conn.prepare(
        "SELECT customer_name AS name, check_in AS date, duration_hours AS hours
         FROM bookings
         WHERE duration_hours >= ?1
         UNION ALL
         SELECT a.client_name AS name, l.check_in AS date, l.duration_hours AS hours
         FROM flexi_logs l
         JOIN flexi_accounts a ON a.id = l.account_id
         WHERE l.duration_hours >= ?1",
    )?;

    let rows = stmt.query_map([LOYALTY_MIN_HOURS], map_visit)?;
    collect_readable(rows)
}
