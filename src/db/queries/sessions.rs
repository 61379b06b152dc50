use crate::db::queries::{get_datetime, get_opt_datetime};
use crate::errors::AppResult;
use crate::models::session::Session;
use crate::utils::time;
use chrono::NaiveDateTime;
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

fn map_row(row: &Row) -> Result<Session> {
    Ok(Session {
        id: row.get("id")?,
        operator: row.get("operator")?,
        started_at: get_datetime(row, "started_at")?,
        expires_at: get_datetime(row, "expires_at")?,
        ended_at: get_opt_datetime(row, "ended_at")?,
    })
}

pub fn insert_session(conn: &Connection, s: &Session) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO sessions (operator, started_at, expires_at, ended_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            s.operator,
            time::to_db(&s.started_at),
            time::to_db(&s.expires_at),
            s.ended_at.as_ref().map(time::to_db),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Most recent session that has not been closed.
pub fn open_session(conn: &Connection) -> AppResult<Option<Session>> {
    Ok(conn
        .query_row(
            "SELECT * FROM sessions WHERE ended_at IS NULL ORDER BY id DESC LIMIT 1",
            [],
            map_row,
        )
        .optional()?)
}

pub fn close_session(conn: &Connection, id: i64, at: NaiveDateTime) -> AppResult<()> {
    conn.execute(
        "UPDATE sessions SET ended_at = ?1 WHERE id = ?2",
        params![time::to_db(&at), id],
    )?;
    Ok(())
}

/// Close every session still open (a new sign-in replaces them).
pub fn close_all_open(conn: &Connection, at: NaiveDateTime) -> AppResult<usize> {
    Ok(conn.execute(
        "UPDATE sessions SET ended_at = ?1 WHERE ended_at IS NULL",
        [time::to_db(&at)],
    )?)
}
