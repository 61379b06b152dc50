use crate::cli::commands::{open_signed_in, parse_date_arg, parse_time_arg};
use crate::cli::parser::ExclusiveCmd;
use crate::config::Config;
use crate::core::calculator::rate::ExclusiveQuote;
use crate::core::exclusive::{ExclusiveEdit, ExclusiveLogic, NewExclusive};
use crate::db::initialize::open_db;
use crate::db::queries::exclusive::ExclusiveRow;
use crate::errors::AppResult;
use crate::models::exclusive::ExclusiveBooking;
use crate::ui::messages::{header, info, page_footer, success};
use crate::utils::colors::{color_for_status, paint};
use crate::utils::formatting::{
    display_date, display_datetime, display_stored_time, hours, money,
};
use crate::utils::prompt::ask_confirmation;
use crate::utils::table::Table;
use chrono::NaiveDateTime;

pub fn handle(action: &ExclusiveCmd, cfg: &Config, now: NaiveDateTime) -> AppResult<()> {
    let symbol = cfg.currency_symbol.as_str();

    match action {
        ExclusiveCmd::Add {
            client,
            date,
            start,
            hours: duration,
            pax,
            guests,
            notes,
            amount,
        } => {
            let (mut pool, session) = open_signed_in(cfg, now)?;
            let req = NewExclusive {
                client_name: client.clone(),
                date: parse_date_arg(date)?,
                start: parse_time_arg(start)?,
                hours: *duration,
                pax: *pax,
                guest_list: guests.join("\n"),
                notes: notes.clone(),
                amount_override: *amount,
            };

            let (booking, quote) = ExclusiveLogic::add(&mut pool, &session, req, cfg.exclusive_rate)?;
            success(format!(
                "Exclusive #{} reserved for {} ({} pax).",
                booking.id, booking.client_name, booking.pax
            ));
            print_schedule(&booking);
            print_quote(&quote, symbol);
            if booking.amount_paid != quote.total {
                println!("   Agreed amount: {}", money(booking.amount_paid, symbol));
            }
        }

        ExclusiveCmd::Quote {
            start,
            hours: duration,
        } => {
            let quote = ExclusiveLogic::quote(parse_time_arg(start)?, *duration, cfg.exclusive_rate)?;
            header("Exclusive quote");
            print_quote(&quote, symbol);
        }

        ExclusiveCmd::List { search, page } => {
            let pool = open_db(&cfg.database)?;
            let result = ExclusiveLogic::list(&pool, search.as_deref(), *page, cfg.page_size)?;

            if result.rows.is_empty() {
                info("No exclusive reservations found.");
                return Ok(());
            }

            header("Exclusive reservations");
            let mut table = Table::new(&[
                "ID", "Client", "Date", "Start", "End", "Hours", "Pax", "Amount", "Status",
            ]);
            for e in &result.rows {
                table.add_row(list_row(e, symbol));
            }
            print!("{}", table.render());
            page_footer(result.page, result.total_pages, result.total_rows);
        }

        ExclusiveCmd::Edit {
            id,
            client,
            date,
            start,
            hours: duration,
            pax,
            guests,
            notes,
            amount,
        } => {
            let (mut pool, session) = open_signed_in(cfg, now)?;
            let changes = ExclusiveEdit {
                client_name: client.clone(),
                date: date.as_deref().map(parse_date_arg).transpose()?,
                start: start.as_deref().map(parse_time_arg).transpose()?,
                hours: *duration,
                pax: *pax,
                guest_list: if guests.is_empty() {
                    None
                } else {
                    Some(guests.join("\n"))
                },
                notes: notes.clone(),
                amount_paid: *amount,
            };

            let booking = ExclusiveLogic::edit(&mut pool, &session, *id, changes, cfg.exclusive_rate)?;
            success(format!(
                "Exclusive #{} updated ({}).",
                booking.id,
                money(booking.amount_paid, symbol)
            ));
            print_schedule(&booking);
        }

        ExclusiveCmd::Complete { id } => {
            let (mut pool, session) = open_signed_in(cfg, now)?;
            let booking = ExclusiveLogic::complete(&mut pool, &session, *id)?;
            success(format!(
                "Exclusive #{} of {} completed.",
                booking.id, booking.client_name
            ));
        }

        ExclusiveCmd::Del { id, yes } => {
            let (mut pool, session) = open_signed_in(cfg, now)?;
            if !ask_confirmation(&format!("Delete exclusive reservation #{id}?"), *yes) {
                info("Deletion cancelled.");
                return Ok(());
            }
            let booking = ExclusiveLogic::delete(&mut pool, &session, *id)?;
            success(format!(
                "Exclusive #{} of {} deleted.",
                booking.id, booking.client_name
            ));
        }
    }

    Ok(())
}

fn print_schedule(b: &ExclusiveBooking) {
    let next_day = if b.crosses_midnight() { " (next day)" } else { "" };
    println!("   Date : {}", display_date(&b.booking_date));
    println!(
        "   Time : {} → {}{}",
        display_datetime(&b.start()),
        display_datetime(&b.end),
        next_day
    );
}

fn print_quote(q: &ExclusiveQuote, symbol: &str) {
    let note = if q.discount_applied {
        " (morning discount)"
    } else {
        ""
    };
    println!("   Rate : {}/hr{}", money(q.rate_per_hour, symbol), note);
    println!("   Total: {}", money(q.total, symbol));
}

fn list_row(e: &ExclusiveRow, symbol: &str) -> Vec<String> {
    let end = if e.end_date != e.booking_date {
        format!("{} (+1)", display_stored_time(&e.end_time))
    } else {
        display_stored_time(&e.end_time)
    };

    vec![
        e.id.to_string(),
        e.client_name.clone(),
        e.booking_date.clone(),
        display_stored_time(&e.start_time),
        end,
        hours(e.duration_hours),
        e.pax.to_string(),
        money(e.amount_paid, symbol),
        paint(&e.status, color_for_status(&e.status)),
    ]
}
