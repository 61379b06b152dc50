use crate::cli::commands::{open_signed_in, parse_date_arg};
use crate::cli::parser::FlexiCmd;
use crate::config::Config;
use crate::core::calculator::duration::FOCUS_SESSION_SOFT_CAP;
use crate::core::flexi::{FlexiLogic, PlanPrices};
use crate::db::initialize::open_db;
use crate::errors::{AppError, AppResult};
use crate::models::flexi::{FlexiAccount, FlexiPlan};
use crate::ui::messages::{header, info, page_footer, success, warning};
use crate::utils::colors::{RED, color_for_balance, color_for_status, paint};
use crate::utils::formatting::{display_date, display_datetime, hours, money};
use crate::utils::prompt::ask_confirmation;
use crate::utils::table::Table;
use chrono::NaiveDateTime;

pub fn handle(action: &FlexiCmd, cfg: &Config, now: NaiveDateTime) -> AppResult<()> {
    let symbol = cfg.currency_symbol.as_str();

    match action {
        FlexiCmd::Register {
            client,
            plan,
            start,
            notes,
        } => {
            let plan = FlexiPlan::from_code(plan).ok_or_else(|| AppError::InvalidPlan(plan.clone()))?;
            let start = start.as_deref().map(parse_date_arg).transpose()?;
            let prices = PlanPrices {
                grind: cfg.grind_price,
                focus: cfg.focus_price,
            };

            let (mut pool, session) = open_signed_in(cfg, now)?;
            let account =
                FlexiLogic::register(&mut pool, &session, client, plan, start, prices, notes, now)?;

            success(format!(
                "Flexi #{} · {} registered on {} ({}).",
                account.id,
                account.client_name,
                account.plan.to_db_str(),
                money(account.amount_paid, symbol)
            ));
            println!(
                "   Valid: {} → {}",
                display_date(&account.start_date),
                display_date(&account.expiry_date)
            );
            println!("   Balance: {}", balance_label(&account));
        }

        FlexiCmd::List { search, page } => {
            let pool = open_db(&cfg.database)?;
            let result = FlexiLogic::list(&pool, search.as_deref(), *page, cfg.page_size)?;

            if result.rows.is_empty() {
                info("No Flexi members found.");
                return Ok(());
            }

            header("Flexi members");
            let mut table = Table::new(&[
                "ID", "Client", "Plan", "Start", "Expiry", "Balance", "Status", "Last visit",
            ]);
            for a in &result.rows {
                let expiry = if now.date() > a.expiry_date {
                    paint(&display_date(&a.expiry_date), RED)
                } else {
                    display_date(&a.expiry_date)
                };
                let status = a.status.to_db_str();
                table.add_row(vec![
                    a.id.to_string(),
                    a.client_name.clone(),
                    a.plan.to_db_str().to_string(),
                    display_date(&a.start_date),
                    expiry,
                    balance_label(a),
                    paint(status, color_for_status(status)),
                    a.last_check_in
                        .as_ref()
                        .map(display_datetime)
                        .unwrap_or_else(|| "-".to_string()),
                ]);
            }
            print!("{}", table.render());
            page_footer(result.page, result.total_pages, result.total_rows);
        }

        FlexiCmd::Checkin { id } => {
            let (mut pool, session) = open_signed_in(cfg, now)?;
            let account = FlexiLogic::check_in(&mut pool, &session, *id, now)?;
            success(format!(
                "{} checked in at {}.",
                account.client_name,
                display_datetime(&now)
            ));
            println!("   Balance: {}", balance_label(&account));
        }

        FlexiCmd::Checkout { id } => {
            let (mut pool, session) = open_signed_in(cfg, now)?;
            match FlexiLogic::check_out(&mut pool, &session, *id, now)? {
                Some((account, checkout)) => {
                    success(format!(
                        "{} checked out after {} h.",
                        account.client_name,
                        hours(checkout.hours_spent)
                    ));
                    println!("   Balance: {}", balance_label(&account));
                    if checkout.over_soft_cap {
                        warning(format!(
                            "Visit exceeded the {} h Monthly Focus session limit.",
                            hours(FOCUS_SESSION_SOFT_CAP)
                        ));
                    }
                }
                None => info(format!("Flexi #{id} is not checked in.")),
            }
        }

        FlexiCmd::History { id } => {
            let pool = open_db(&cfg.database)?;
            let (account, logs) = FlexiLogic::history(&pool, *id)?;

            header(format!(
                "{} · {} · {}",
                account.client_name,
                account.plan.to_db_str(),
                balance_label(&account)
            ));
            if logs.is_empty() {
                info("No visits yet.");
                return Ok(());
            }

            let mut table = Table::new(&["#", "Check-in", "Check-out", "Hours"]);
            for log in &logs {
                table.add_row(vec![
                    log.id.to_string(),
                    display_datetime(&log.check_in),
                    display_datetime(&log.check_out),
                    hours(log.duration_hours),
                ]);
            }
            print!("{}", table.render());
            let total: f64 = logs.iter().map(|l| l.duration_hours).sum();
            println!("Total: {} h over {} visit(s)", hours(total), logs.len());
        }

        FlexiCmd::Del { id, yes } => {
            let (mut pool, session) = open_signed_in(cfg, now)?;
            if !ask_confirmation(
                &format!("Delete Flexi member #{id} and all of its visits?"),
                *yes,
            ) {
                info("Deletion cancelled.");
                return Ok(());
            }
            let account = FlexiLogic::delete(&mut pool, &session, *id)?;
            success(format!(
                "Flexi #{} of {} deleted.",
                account.id, account.client_name
            ));
        }
    }

    Ok(())
}

/// "42.5 h left" for Grind, "Unlimited" for Monthly Focus.
fn balance_label(a: &FlexiAccount) -> String {
    match a.remaining_hours {
        Some(h) if a.plan.is_hour_capped() => paint(
            &format!("{} h left", hours(h)),
            color_for_balance(h),
        ),
        _ => "Unlimited".to_string(),
    }
}
