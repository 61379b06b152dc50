use crate::db::queries::{
    Loaded, Page, collect_readable, conversion_error, get_date, get_datetime, get_opt_datetime, like_pattern,
};
use crate::errors::{AppError, AppResult};
use crate::models::flexi::{FlexiAccount, FlexiLog, FlexiPlan, FlexiStatus};
use crate::utils::{date, time};
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

pub fn map_account(row: &Row) -> Result<FlexiAccount> {
    let plan_str: String = row.get("plan")?;
    let plan = FlexiPlan::from_db_str(&plan_str)
        .ok_or_else(|| conversion_error(0, AppError::InvalidPlan(plan_str.clone())))?;

    let status_str: String = row.get("status")?;
    let status = FlexiStatus::from_db_str(&status_str).ok_or_else(|| {
        conversion_error(0, AppError::InvalidInput(format!("Invalid status: {status_str}")))
    })?;

    Ok(FlexiAccount {
        id: row.get("id")?,
        client_name: row.get("client_name")?,
        plan,
        start_date: get_date(row, "start_date")?,
        expiry_date: get_date(row, "expiry_date")?,
        total_hours_limit: row.get("total_hours_limit")?,
        remaining_hours: row.get("remaining_hours")?,
        amount_paid: row.get("amount_paid")?,
        status,
        last_check_in: get_opt_datetime(row, "last_check_in")?,
        notes: row.get("notes")?,
        created_at: get_datetime(row, "created_at")?,
    })
}

pub fn map_log(row: &Row) -> Result<FlexiLog> {
    Ok(FlexiLog {
        id: row.get("id")?,
        account_id: row.get("account_id")?,
        check_in: get_datetime(row, "check_in")?,
        check_out: get_datetime(row, "check_out")?,
        duration_hours: row.get("duration_hours")?,
    })
}

pub fn insert_account(conn: &Connection, a: &FlexiAccount) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO flexi_accounts (client_name, plan, start_date, expiry_date, total_hours_limit,
                                     remaining_hours, amount_paid, status, last_check_in, notes,
                                     created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            a.client_name,
            a.plan.to_db_str(),
            date::to_db(&a.start_date),
            date::to_db(&a.expiry_date),
            a.total_hours_limit,
            a.remaining_hours,
            a.amount_paid,
            a.status.to_db_str(),
            a.last_check_in.as_ref().map(time::to_db),
            a.notes,
            time::to_db(&a.created_at),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Persist the mutable state of an account (balance, status, check-in).
pub fn update_account_state(conn: &Connection, a: &FlexiAccount) -> AppResult<()> {
    let changed = conn.execute(
        "UPDATE flexi_accounts
         SET remaining_hours = ?1, status = ?2, last_check_in = ?3, notes = ?4
         WHERE id = ?5",
        params![
            a.remaining_hours,
            a.status.to_db_str(),
            a.last_check_in.as_ref().map(time::to_db),
            a.notes,
            a.id,
        ],
    )?;
    if changed == 0 {
        return Err(AppError::NotFound {
            entity: "Flexi account",
            id: a.id,
        });
    }
    Ok(())
}

pub fn load_account(conn: &Connection, id: i64) -> AppResult<FlexiAccount> {
    conn.query_row("SELECT * FROM flexi_accounts WHERE id = ?1", [id], map_account)
        .optional()?
        .ok_or(AppError::NotFound {
            entity: "Flexi account",
            id,
        })
}

pub fn list_accounts(
    conn: &Connection,
    search: Option<&str>,
    page: usize,
    page_size: usize,
) -> AppResult<Page<FlexiAccount>> {
    let pattern = like_pattern(search);

    let total_rows: i64 = conn.query_row(
        "SELECT COUNT(*) FROM flexi_accounts WHERE lower(client_name) LIKE ?1",
        [&pattern],
        |r| r.get(0),
    )?;

    let (page, total_pages, offset) =
        Page::<FlexiAccount>::window(page, page_size, total_rows as usize);

    let mut stmt = conn.prepare(
        "SELECT * FROM flexi_accounts
         WHERE lower(client_name) LIKE ?1
         ORDER BY created_at DESC, id DESC
         LIMIT ?2 OFFSET ?3",
    )?;
    let rows = stmt.query_map(params![pattern, page_size as i64, offset], map_account)?;

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

/// Accounts sold within the bounds (by `created_at` date).
pub fn accounts_sold_between(
    conn: &Connection,
    bounds: Option<(NaiveDate, NaiveDate)>,
) -> AppResult<Loaded<FlexiAccount>> {
    let (from, to) = date::bounds_to_db(bounds);
    let mut stmt = conn.prepare(
        "SELECT * FROM flexi_accounts
         WHERE substr(created_at, 1, 10) BETWEEN ?1 AND ?2
         ORDER BY created_at ASC",
    )?;
    let rows = stmt.query_map(params![from, to], map_account)?;
    collect_readable(rows)
}

pub fn insert_log(conn: &Connection, log: &FlexiLog) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO flexi_logs (account_id, check_in, check_out, duration_hours)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            log.account_id,
            time::to_db(&log.check_in),
            time::to_db(&log.check_out),
            log.duration_hours,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Visit history of one account, newest first.
pub fn logs_for_account(conn: &Connection, account_id: i64) -> AppResult<Vec<FlexiLog>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM flexi_logs WHERE account_id = ?1 ORDER BY check_in DESC, id DESC",
    )?;
    let rows = stmt.query_map([account_id], map_log)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Visits by check-in date.
pub fn logs_between(
    conn: &Connection,
    bounds: Option<(NaiveDate, NaiveDate)>,
) -> AppResult<Loaded<FlexiLog>> {
    let (from, to) = date::bounds_to_db(bounds);
    let mut stmt = conn.prepare(
        "SELECT * FROM flexi_logs
         WHERE substr(check_in, 1, 10) BETWEEN ?1 AND ?2
         ORDER BY check_in ASC",
    )?;
    let rows = stmt.query_map(params![from, to], map_log)?;
    collect_readable(rows)
}

/// Delete an account and its visit history. Returns the number of logs removed.
pub fn delete_account(conn: &mut Connection, id: i64) -> AppResult<usize> {
    let tx = conn.transaction()?;
    let logs = tx.execute("DELETE FROM flexi_logs WHERE account_id = ?1", [id])?;
    let removed = tx.execute("DELETE FROM flexi_accounts WHERE id = ?1", [id])?;
    if removed == 0 {
        return Err(AppError::NotFound {
            entity: "Flexi account",
            id,
        });
    }
    tx.commit()?;
    Ok(logs)
}
