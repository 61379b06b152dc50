use crate::errors::AppResult;
use crate::models::session::Session;
use chrono::Local;
use rusqlite::Connection;
use rusqlite::params;

/// Write an internal log line into the `log` table.
pub fn ttlog(conn: &Connection, operation: &str, target: &str, message: &str) -> AppResult<()> {
    // wall clock, ISO 8601 with offset
    let now = Local::now().to_rfc3339();

    let mut stmt = conn.prepare_cached(
        "INSERT INTO log (date, operation, target, message)
         VALUES (?1, ?2, ?3, ?4)",
    )?;

    stmt.execute(params![now, operation, target, message])?;

    Ok(())
}

/// Same as [`ttlog`], with the signed-in operator prefixed to the message.
pub fn ttlog_as(
    conn: &Connection,
    session: &Session,
    operation: &str,
    target: &str,
    message: &str,
) -> AppResult<()> {
    ttlog(
        conn,
        operation,
        target,
        &format!("[{}] {}", session.operator, message),
    )
}
