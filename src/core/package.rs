use crate::db::log::ttlog_as;
use crate::db::pool::DbPool;
use crate::db::queries::packages::{
    delete_package, insert_package, list_packages, load_package, update_package,
};
use crate::errors::{AppError, AppResult};
use crate::models::package::Package;
use crate::models::session::Session;

/// Changes requested by `package edit`; `None` keeps the stored value.
#[derive(Debug, Default, Clone)]
pub struct PackageEdit {
    pub name: Option<String>,
    pub price: Option<i64>,
    pub duration: Option<f64>,
    pub is_hourly: Option<bool>,
}

pub struct PackageLogic;

fn validate(p: &Package) -> AppResult<()> {
    if p.name.trim().is_empty() {
        return Err(AppError::InvalidInput("package name cannot be empty".into()));
    }
    if p.price < 0 {
        return Err(AppError::InvalidInput("price cannot be negative".into()));
    }
    if !p.duration.is_finite() || p.duration < 0.0 {
        return Err(AppError::InvalidInput(format!(
            "duration must be a non-negative number of hours, got {}",
            p.duration
        )));
    }
    Ok(())
}

impl PackageLogic {
    pub fn add(pool: &mut DbPool, session: &Session, pkg: Package) -> AppResult<Package> {
        validate(&pkg)?;

        let mut pkg = pkg;
        pkg.id = insert_package(&pool.conn, &pkg)?;

        ttlog_as(
            &pool.conn,
            session,
            "add",
            &format!("package #{}", pkg.id),
            &format!("Added package '{}' ({} pesos)", pkg.name, pkg.price),
        )?;
        Ok(pkg)
    }

    pub fn edit(
        pool: &mut DbPool,
        session: &Session,
        id: i64,
        changes: PackageEdit,
    ) -> AppResult<Package> {
        let mut pkg = load_package(&pool.conn, id)?;

        if let Some(name) = changes.name {
            pkg.name = name.trim().to_string();
        }
        if let Some(price) = changes.price {
            pkg.price = price;
        }
        if let Some(duration) = changes.duration {
            pkg.duration = duration;
        }
        if let Some(hourly) = changes.is_hourly {
            pkg.is_hourly = hourly;
        }

        validate(&pkg)?;
        update_package(&pool.conn, &pkg)?;

        ttlog_as(
            &pool.conn,
            session,
            "edit",
            &format!("package #{id}"),
            &format!("Updated package '{}'", pkg.name),
        )?;
        Ok(pkg)
    }

    /// Returns how many bookings lost their link to the package.
    pub fn delete(pool: &mut DbPool, session: &Session, id: i64) -> AppResult<usize> {
        let pkg = load_package(&pool.conn, id)?;
        let detached = delete_package(&mut pool.conn, id)?;

        ttlog_as(
            &pool.conn,
            session,
            "del",
            &format!("package #{id}"),
            &format!("Deleted package '{}' ({detached} bookings detached)", pkg.name),
        )?;
        Ok(detached)
    }

    pub fn list(pool: &DbPool) -> AppResult<Vec<Package>> {
        list_packages(&pool.conn)
    }
}
