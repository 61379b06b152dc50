use crate::cli::commands::{open_signed_in, parse_datetime_arg};
use crate::cli::parser::BookingCmd;
use crate::config::Config;
use crate::core::booking::{BookingEdit, BookingLogic, NewBooking};
use crate::db::initialize::open_db;
use crate::db::queries::Skipped;
use crate::db::queries::bookings::BookingRow;
use crate::errors::AppResult;
use crate::models::booking::{Booking, BookingFlags};
use crate::ui::messages::{header, info, page_footer, skipped_rows, success, warning};
use crate::utils::colors::{color_for_status, paint};
use crate::utils::formatting::{display_datetime, display_stored_datetime, hours, money};
use crate::utils::prompt::ask_confirmation;
use crate::utils::table::Table;
use chrono::NaiveDateTime;

pub fn handle(action: &BookingCmd, cfg: &Config, now: NaiveDateTime) -> AppResult<()> {
    let symbol = cfg.currency_symbol.as_str();

    match action {
        BookingCmd::Checkin {
            name,
            package,
            seat,
            hours: input_hours,
            student,
            examinee,
            group,
            loyalty,
            rentals,
            notes,
            at,
        } => {
            let (mut pool, session) = open_signed_in(cfg, now)?;

            let check_in = at.as_deref().map(parse_datetime_arg).transpose()?;
            let req = NewBooking {
                customer_name: name.clone(),
                seat_number: seat.clone(),
                package_id: *package,
                hours: *input_hours,
                flags: BookingFlags {
                    student: *student,
                    examinee: *examinee,
                    group: *group,
                    loyalty: *loyalty,
                },
                rentals: rentals.clone(),
                notes: notes.clone(),
                check_in,
            };

            let booking = BookingLogic::check_in(&mut pool, &session, req, now)?;
            success(format!(
                "Booking #{} · {} checked in ({}, {})",
                booking.id,
                booking.customer_name,
                booking.package_name,
                money(booking.amount_paid, symbol)
            ));
            print_times(&booking);
        }

        BookingCmd::List { search, page } => {
            let pool = open_db(&cfg.database)?;
            let result = BookingLogic::list(&pool, search.as_deref(), *page, cfg.page_size)?;

            if result.rows.is_empty() {
                info("No bookings found.");
                return Ok(());
            }

            header("Hub bookings");
            let mut table = Table::new(&[
                "ID", "Customer", "Seat", "Package", "Check-in", "Check-out", "Hours", "Amount",
                "Status", "Tags",
            ]);
            for b in &result.rows {
                table.add_row(list_row(b, symbol));
            }
            print!("{}", table.render());
            page_footer(result.page, result.total_pages, result.total_rows);

            let mut skipped = Skipped::default();
            let overdue = BookingLogic::overdue(&pool, now)?.into_rows("booking", &mut skipped);
            skipped_rows(skipped.counts());
            for b in overdue {
                if let Some(out) = b.check_out {
                    warning(format!(
                        "#{} {} was due out at {}",
                        b.id,
                        b.customer_name,
                        display_datetime(&out)
                    ));
                }
            }
        }

        BookingCmd::Edit {
            id,
            name,
            seat,
            check_in,
            check_out,
            amount,
            rentals,
            notes,
        } => {
            let (mut pool, session) = open_signed_in(cfg, now)?;
            let changes = BookingEdit {
                customer_name: name.clone(),
                seat_number: seat.clone(),
                check_in: check_in.as_deref().map(parse_datetime_arg).transpose()?,
                check_out: check_out.as_deref().map(parse_datetime_arg).transpose()?,
                amount_paid: *amount,
                rentals: rentals.clone(),
                notes: notes.clone(),
            };

            let booking = BookingLogic::edit(&mut pool, &session, *id, changes)?;
            success(format!(
                "Booking #{} updated ({} h, {}).",
                booking.id,
                hours(booking.duration_hours),
                money(booking.amount_paid, symbol)
            ));
        }

        BookingCmd::Extend { id, hours: extra, fee } => {
            let (mut pool, session) = open_signed_in(cfg, now)?;
            let (booking, ext) = BookingLogic::extend(
                &mut pool,
                &session,
                *id,
                *extra,
                *fee,
                cfg.extension_rate,
                symbol,
                now,
            )?;
            success(format!(
                "Booking #{} extended by {} h for {} (total {}).",
                booking.id,
                hours(*extra),
                money(ext.fee, symbol),
                money(ext.new_amount, symbol)
            ));
            print_times(&booking);
        }

        BookingCmd::Checkout { id } => {
            let (mut pool, session) = open_signed_in(cfg, now)?;
            let booking = BookingLogic::check_out(&mut pool, &session, *id, now)?;
            success(format!(
                "{} checked out. Total {}.",
                booking.customer_name,
                money(booking.amount_paid, symbol)
            ));
            print_times(&booking);
        }

        BookingCmd::Del { id, yes } => {
            let (mut pool, session) = open_signed_in(cfg, now)?;
            if !ask_confirmation(&format!("Delete booking #{id}?"), *yes) {
                info("Deletion cancelled.");
                return Ok(());
            }
            let booking = BookingLogic::delete(&mut pool, &session, *id)?;
            success(format!(
                "Booking #{} of {} deleted.",
                booking.id, booking.customer_name
            ));
        }
    }

    Ok(())
}

fn print_times(b: &Booking) {
    let out = b
        .check_out
        .as_ref()
        .map(display_datetime)
        .unwrap_or_else(|| "open".to_string());
    println!("   In : {}", display_datetime(&b.check_in));
    println!("   Out: {}", out);
}

fn list_row(b: &BookingRow, symbol: &str) -> Vec<String> {
    let mut tags = Vec::new();
    if b.is_student {
        tags.push("student");
    }
    if b.is_examinee {
        tags.push("examinee");
    }
    if b.is_loyalty {
        tags.push("loyalty");
    }

    vec![
        b.id.to_string(),
        b.customer_name.clone(),
        b.seat_number.clone(),
        b.package_name.clone(),
        display_stored_datetime(&b.check_in),
        b.check_out
            .as_deref()
            .map(display_stored_datetime)
            .unwrap_or_else(|| "-".to_string()),
        hours(b.duration_hours),
        money(b.amount_paid, symbol),
        paint(&b.status, color_for_status(&b.status)),
        tags.join(","),
    ]
}
