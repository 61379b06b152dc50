//! Operator-facing messages. Errors go to stderr, everything else to stdout.

use std::fmt;

/// ANSI colors
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";

const FG_BLUE: &str = "\x1b[34m";
const FG_GREEN: &str = "\x1b[32m";
const FG_YELLOW: &str = "\x1b[33m";
const FG_RED: &str = "\x1b[31m";

/// Icons
const ICON_INFO: &str = "ℹ️";
const ICON_OK: &str = "✅";
const ICON_WARN: &str = "⚠️";
const ICON_ERR: &str = "❌";

pub fn info<T: fmt::Display>(msg: T) {
    println!("{}{}{} {}{}", FG_BLUE, BOLD, ICON_INFO, RESET, msg);
}

pub fn success<T: fmt::Display>(msg: T) {
    println!("{}{}{} {}{}", FG_GREEN, BOLD, ICON_OK, RESET, msg);
}

pub fn warning<T: fmt::Display>(msg: T) {
    println!("{}{}{} {}{}", FG_YELLOW, BOLD, ICON_WARN, RESET, msg);
}

pub fn error<T: fmt::Display>(msg: T) {
    eprintln!("{}{}{} {}{}", FG_RED, BOLD, ICON_ERR, RESET, msg);
}

/// Section header above tables and reports
pub fn header<T: fmt::Display>(msg: T) {
    println!("\n{}{}=== {} ==={}", FG_BLUE, BOLD, msg, RESET);
}

/// "Page 2/5 (43 rows)" footer under paginated lists. `page` is 1-based.
pub fn page_footer(page: usize, total_pages: usize, total_rows: usize) {
    println!(
        "Page {}/{} ({} rows)",
        page.max(1),
        total_pages.max(1),
        total_rows
    );
}

/// One warning per dataset that lost rows to unreadable stored values.
pub fn skipped_rows(counts: &[(&str, usize)]) {
    for (label, n) in counts {
        warning(format!(
            "{n} {label} row(s) skipped: unreadable stored values"
        ));
    }
}
