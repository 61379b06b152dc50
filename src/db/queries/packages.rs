use crate::db::queries::get_bool;
use crate::errors::{AppError, AppResult};
use crate::models::package::Package;
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

pub fn map_row(row: &Row) -> Result<Package> {
    Ok(Package {
        id: row.get("id")?,
        name: row.get("name")?,
        price: row.get("price")?,
        duration: row.get("duration")?,
        is_hourly: get_bool(row, "is_hourly")?,
    })
}

pub fn insert_package(conn: &Connection, p: &Package) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO packages (name, price, duration, is_hourly)
         VALUES (?1, ?2, ?3, ?4)",
        params![p.name, p.price, p.duration, p.is_hourly as i64],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn update_package(conn: &Connection, p: &Package) -> AppResult<()> {
    conn.execute(
        "UPDATE packages
         SET name = ?1, price = ?2, duration = ?3, is_hourly = ?4
         WHERE id = ?5",
        params![p.name, p.price, p.duration, p.is_hourly as i64, p.id],
    )?;
    Ok(())
}

pub fn load_package(conn: &Connection, id: i64) -> AppResult<Package> {
    conn.query_row("SELECT * FROM packages WHERE id = ?1", [id], map_row)
        .optional()?
        .ok_or(AppError::NotFound {
            entity: "Package",
            id,
        })
}

pub fn list_packages(conn: &Connection) -> AppResult<Vec<Package>> {
    let mut stmt = conn.prepare("SELECT * FROM packages ORDER BY name COLLATE NOCASE ASC")?;
    let rows = stmt.query_map([], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Delete a package. Bookings keep their name snapshot and lose the link.
pub fn delete_package(conn: &mut Connection, id: i64) -> AppResult<usize> {
    let tx = conn.transaction()?;
    let detached = tx.execute(
        "UPDATE bookings SET package_id = NULL WHERE package_id = ?1",
        [id],
    )?;
    let removed = tx.execute("DELETE FROM packages WHERE id = ?1", [id])?;
    if removed == 0 {
        return Err(AppError::NotFound {
            entity: "Package",
            id,
        });
    }
    tx.commit()?;
    Ok(detached)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::queries::test_support::memory_pool;

    #[test]
    fn insert_load_and_delete() {
        let mut pool = memory_pool();
        let id = insert_package(&pool.conn, &Package::new("Daily Pass", 299, 8.0, false)).unwrap();

        let p = load_package(&pool.conn, id).unwrap();
        assert_eq!(p.name, "Daily Pass");
        assert!(!p.is_hourly);

        delete_package(&mut pool.conn, id).unwrap();
        assert!(matches!(
            load_package(&pool.conn, id),
            Err(AppError::NotFound { .. })
        ));
    }
}
