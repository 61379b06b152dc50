use crate::cli::commands::open_signed_in;
use crate::cli::parser::PackageCmd;
use crate::config::Config;
use crate::core::package::{PackageEdit, PackageLogic};
use crate::db::initialize::open_db;
use crate::errors::AppResult;
use crate::models::package::Package;
use crate::ui::messages::{header, info, success};
use crate::utils::formatting::hours;
use crate::utils::prompt::ask_confirmation;
use crate::utils::table::Table;
use chrono::NaiveDateTime;

pub fn handle(action: &PackageCmd, cfg: &Config, now: NaiveDateTime) -> AppResult<()> {
    match action {
        PackageCmd::Add {
            name,
            price,
            duration,
            hourly,
        } => {
            let (mut pool, session) = open_signed_in(cfg, now)?;
            let pkg = Package::new(name, *price, *duration, *hourly);
            let pkg = PackageLogic::add(&mut pool, &session, pkg)?;
            success(format!(
                "Package #{} '{}' added ({}).",
                pkg.id,
                pkg.name,
                pkg.price_label(&cfg.currency_symbol)
            ));
        }

        PackageCmd::List => {
            let pool = open_db(&cfg.database)?;
            let packages = PackageLogic::list(&pool)?;

            if packages.is_empty() {
                info("No packages defined yet.");
                return Ok(());
            }

            header("Packages");
            let mut table = Table::new(&["ID", "Name", "Price", "Duration", "Type"]);
            for p in &packages {
                table.add_row(vec![
                    p.id.to_string(),
                    p.name.clone(),
                    p.price_label(&cfg.currency_symbol),
                    if p.duration > 0.0 {
                        format!("{}h", hours(p.duration))
                    } else {
                        "-".to_string()
                    },
                    if p.is_hourly { "Hourly" } else { "Fixed" }.to_string(),
                ]);
            }
            print!("{}", table.render());
        }

        PackageCmd::Edit {
            id,
            name,
            price,
            duration,
            hourly,
        } => {
            let (mut pool, session) = open_signed_in(cfg, now)?;
            let changes = PackageEdit {
                name: name.clone(),
                price: *price,
                duration: *duration,
                is_hourly: *hourly,
            };
            let pkg = PackageLogic::edit(&mut pool, &session, *id, changes)?;
            success(format!("Package #{} updated: {}.", pkg.id, pkg.name));
        }

        PackageCmd::Del { id, yes } => {
            let (mut pool, session) = open_signed_in(cfg, now)?;
            if !ask_confirmation(&format!("Delete package #{id}?"), *yes) {
                info("Deletion cancelled.");
                return Ok(());
            }
            let detached = PackageLogic::delete(&mut pool, &session, *id)?;
            success(format!(
                "Package #{id} deleted ({detached} booking(s) keep its name)."
            ));
        }
    }

    Ok(())
}
