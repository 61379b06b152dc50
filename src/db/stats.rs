use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use rusqlite::OptionalExtension;
use std::fs;

const COUNTED_TABLES: [(&str, &str); 7] = [
    ("packages", "Packages"),
    ("bookings", "Hub bookings"),
    ("exclusive_bookings", "Exclusive bookings"),
    ("flexi_accounts", "Flexi accounts"),
    ("flexi_logs", "Flexi visits"),
    ("pantry_items", "Pantry items"),
    ("pantry_transactions", "Pantry sales"),
];

pub fn print_db_info(pool: &mut DbPool, db_path: &str) -> AppResult<()> {
    println!();

    //
    // 1) FILE SIZE
    //
    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_mb = (file_size as f64) / (1024.0 * 1024.0);

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.2} MB", CYAN, RESET, file_mb);

    //
    // 2) ROWS PER TABLE
    //
    for (table, label) in COUNTED_TABLES {
        let count: i64 = pool
            .conn
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))?;
        println!("{}• {}:{} {}{}{}", CYAN, label, RESET, GREEN, count, RESET);
    }

    //
    // 3) BOOKING DATE RANGE
    //
    let first: Option<String> = pool
        .conn
        .query_row(
            "SELECT substr(check_in, 1, 10) FROM bookings ORDER BY check_in ASC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;

    let last: Option<String> = pool
        .conn
        .query_row(
            "SELECT substr(check_in, 1, 10) FROM bookings ORDER BY check_in DESC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;

    let none = format!("{GREY}--{RESET}");
    println!("{}• Booking range:{}", CYAN, RESET);
    println!("    from: {}", first.unwrap_or_else(|| none.clone()));
    println!("    to:   {}", last.unwrap_or(none));

    println!();
    Ok(())
}
