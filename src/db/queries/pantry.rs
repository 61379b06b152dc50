use crate::db::queries::{Loaded, collect_readable, get_bool, get_datetime};
use crate::errors::{AppError, AppResult};
use crate::models::pantry::{PantryItem, PantryTransaction};
use crate::utils::{date, time};
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

pub fn map_item(row: &Row) -> Result<PantryItem> {
    Ok(PantryItem {
        id: row.get("id")?,
        name: row.get("name")?,
        category: row.get("category")?,
        price: row.get("price")?,
        is_available: get_bool(row, "is_available")?,
    })
}

pub fn map_transaction(row: &Row) -> Result<PantryTransaction> {
    Ok(PantryTransaction {
        id: row.get("id")?,
        created_at: get_datetime(row, "created_at")?,
        items_summary: row.get("items_summary")?,
        total_quantity: row.get("total_quantity")?,
        total_amount: row.get("total_amount")?,
    })
}

pub fn insert_item(conn: &Connection, item: &PantryItem) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO pantry_items (name, category, price, is_available)
         VALUES (?1, ?2, ?3, ?4)",
        params![item.name, item.category, item.price, item.is_available as i64],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn update_item(conn: &Connection, item: &PantryItem) -> AppResult<()> {
    let changed = conn.execute(
        "UPDATE pantry_items SET name = ?1, category = ?2, price = ?3, is_available = ?4
         WHERE id = ?5",
        params![
            item.name,
            item.category,
            item.price,
            item.is_available as i64,
            item.id
        ],
    )?;
    if changed == 0 {
        return Err(AppError::NotFound {
            entity: "Pantry item",
            id: item.id,
        });
    }
    Ok(())
}

pub fn load_item(conn: &Connection, id: i64) -> AppResult<PantryItem> {
    conn.query_row("SELECT * FROM pantry_items WHERE id = ?1", [id], map_item)
        .optional()?
        .ok_or(AppError::NotFound {
            entity: "Pantry item",
            id,
        })
}

pub fn list_items(conn: &Connection, available_only: bool) -> AppResult<Vec<PantryItem>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM pantry_items
         WHERE ?1 = 0 OR is_available = 1
         ORDER BY category COLLATE NOCASE, name COLLATE NOCASE",
    )?;
    let rows = stmt.query_map([available_only as i64], map_item)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn insert_transaction(conn: &Connection, tx: &PantryTransaction) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO pantry_transactions (created_at, items_summary, total_quantity, total_amount)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            time::to_db(&tx.created_at),
            tx.items_summary,
            tx.total_quantity,
            tx.total_amount
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Sales by business date, oldest first.
pub fn transactions_between(
    conn: &Connection,
    bounds: Option<(NaiveDate, NaiveDate)>,
) -> AppResult<Loaded<PantryTransaction>> {
    let (from, to) = date::bounds_to_db(bounds);
    let mut stmt = conn.prepare(
        "SELECT * FROM pantry_transactions
         WHERE substr(created_at, 1, 10) BETWEEN ?1 AND ?2
         ORDER BY created_at ASC, id ASC",
    )?;
    let rows = stmt.query_map(params![from, to], map_transaction)?;
    collect_readable(rows)
}
