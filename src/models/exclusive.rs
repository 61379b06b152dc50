use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum ExclusiveStatus {
    Confirmed,
    Completed,
}

impl ExclusiveStatus {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            ExclusiveStatus::Confirmed => "Confirmed",
            ExclusiveStatus::Completed => "Completed",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "Confirmed" => Some(ExclusiveStatus::Confirmed),
            "Completed" => Some(ExclusiveStatus::Completed),
            _ => None,
        }
    }
}

/// Whole-space reservation for a group.
#[derive(Debug, Clone, Serialize)]
pub struct ExclusiveBooking {
    pub id: i64,
    pub client_name: String,
    pub booking_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end: NaiveDateTime, // ⇔ end_date + end_time, may fall on the next day
    pub duration_hours: f64,
    pub pax: i64,
    pub guest_list: String,
    pub amount_paid: i64,
    pub status: ExclusiveStatus,
    pub notes: String,
}

impl ExclusiveBooking {
    pub fn start(&self) -> NaiveDateTime {
        self.booking_date.and_time(self.start_time)
    }

    pub fn crosses_midnight(&self) -> bool {
        self.end.date() > self.booking_date
    }
}
