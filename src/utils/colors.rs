/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";
pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

/// Booking / membership status colors:
/// active states → green, closed states → grey
pub fn color_for_status(status: &str) -> &'static str {
    match status {
        "Active" | "Checked In" | "Confirmed" => GREEN,
        "Completed" | "Inactive" => GREY,
        _ => RESET,
    }
}

/// Remaining Flexi balance: empty → red, under 5h → yellow.
pub fn color_for_balance(hours: f64) -> &'static str {
    if hours <= 0.0 {
        RED
    } else if hours < 5.0 {
        YELLOW
    } else {
        RESET
    }
}

pub fn paint(value: &str, color: &str) -> String {
    format!("{color}{value}{RESET}")
}
