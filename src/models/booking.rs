use chrono::NaiveDateTime;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum BookingStatus {
    Active,
    Completed,
}

impl BookingStatus {
    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            BookingStatus::Active => "Active",
            BookingStatus::Completed => "Completed",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "Active" => Some(BookingStatus::Active),
            "Completed" => Some(BookingStatus::Completed),
            _ => None,
        }
    }
}

/// Customer-type flags carried by a hub booking.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct BookingFlags {
    pub student: bool,
    pub examinee: bool,
    pub group: bool,
    pub loyalty: bool,
}

/// Single-seat hub booking.
#[derive(Debug, Clone, Serialize)]
pub struct Booking {
    pub id: i64,
    pub customer_name: String,
    pub seat_number: String,
    pub package_id: Option<i64>, // ⇔ bookings.package_id (NULL once the package is deleted)
    pub package_name: String,    // ⇔ bookings.package_name (snapshot, display fallback)
    pub duration_hours: f64,
    pub check_in: NaiveDateTime,
    pub check_out: Option<NaiveDateTime>,
    pub amount_paid: i64,
    pub status: BookingStatus,
    pub flags: BookingFlags,
    pub rentals: String,
    pub notes: String,
}

pub const LOYALTY_NOTE: &str = "[Loyalty Award]";

impl Booking {
    pub fn is_active(&self) -> bool {
        self.status == BookingStatus::Active
    }

    /// Prefix the loyalty marker so the free visit stays explained.
    pub fn loyalty_notes(notes: &str) -> String {
        if notes.trim().is_empty() {
            LOYALTY_NOTE.to_string()
        } else {
            format!("{} {}", LOYALTY_NOTE, notes.trim())
        }
    }

    /// Append a line to the free-text notes.
    pub fn append_note(&mut self, line: &str) {
        if self.notes.trim().is_empty() {
            self.notes = line.to_string();
        } else {
            self.notes = format!("{} | {}", self.notes.trim(), line);
        }
    }
}
