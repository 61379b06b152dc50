use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::report::load_report;
use crate::db::initialize::open_db;
use crate::errors::AppResult;
use crate::export::parse_range;
use crate::ui::messages::{header, info, skipped_rows};
use crate::utils::date::month_bounds;
use crate::utils::formatting::{display_date, money, pad_right};
use crate::utils::table::Table;
use chrono::NaiveDateTime;

pub fn handle(cmd: &Commands, cfg: &Config, now: NaiveDateTime) -> AppResult<()> {
    if let Commands::Report { range } = cmd {
        let (from, to) = match range {
            Some(r) => parse_range(r)?,
            None => month_bounds(now.date()),
        };

        let pool = open_db(&cfg.database)?;
        let (report, skipped) = load_report(&pool, from, to)?;
        let symbol = cfg.currency_symbol.as_str();

        header(format!(
            "Report {} → {}",
            display_date(&from),
            display_date(&to)
        ));
        skipped_rows(skipped.counts());

        // 1️⃣ Totals
        let totals = [
            ("Timesheet", report.timesheet_total),
            ("Exclusive", report.exclusive_total),
            ("Flexi", report.flexi_total),
            ("Pantry", report.pantry_total),
            ("Total income", report.grand_total),
        ];
        for (label, amount) in totals {
            println!("{} {}", pad_right(&format!("{label}:"), 14), money(amount, symbol));
        }
        println!("{} {}", pad_right("Check-ins:", 14), report.check_ins);
        println!("{} {}", pad_right("Packages:", 14), report.packages_sold);

        if report.days.is_empty() {
            info("No activity in this period.");
            return Ok(());
        }

        // 2️⃣ Daily breakdown, newest first
        header("Daily breakdown");
        let mut table = Table::new(&[
            "Date", "Check-ins", "Timesheet", "Exclusive", "Flexi", "Pantry", "Total",
        ]);
        for d in report.days.iter().rev() {
            table.add_row(vec![
                display_date(&d.date),
                d.check_ins.to_string(),
                money(d.timesheet, symbol),
                money(d.exclusive, symbol),
                money(d.flexi, symbol),
                money(d.pantry, symbol),
                money(d.total(), symbol),
            ]);
        }
        print!("{}", table.render());

        // 3️⃣ Customer mix
        header("Customer mix");
        for (label, count) in report.customer_mix.rows() {
            println!("{} {}", pad_right(&format!("{label}:"), 14), count);
        }

        // 4️⃣ Package popularity
        if !report.package_popularity.is_empty() {
            header("Package popularity");
            for (name, count) in &report.package_popularity {
                println!("{} {}", pad_right(&format!("{name}:"), 24), count);
            }
        }

        // 5️⃣ Pantry best sellers
        if !report.top_pantry_items.is_empty() {
            header("Top pantry items");
            for (i, (name, units)) in report.top_pantry_items.iter().enumerate() {
                println!("{}. {} ({} sold)", i + 1, name, units);
            }
        }
    }

    Ok(())
}
