use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

/// Flexi membership plans.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum FlexiPlan {
    /// Hour-capped: 60 hours within 30 days.
    Grind,
    /// Calendar-capped: 40 days, soft 5 hour limit per visit.
    MonthlyFocus,
}

impl FlexiPlan {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            FlexiPlan::Grind => "DMD Flexi Grind",
            FlexiPlan::MonthlyFocus => "Monthly Focus",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "DMD Flexi Grind" => Some(FlexiPlan::Grind),
            "Monthly Focus" => Some(FlexiPlan::MonthlyFocus),
            _ => None,
        }
    }

    /// Helper: convert CLI input ("grind", "focus", or the full plan name)
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "grind" | "dmd flexi grind" => Some(FlexiPlan::Grind),
            "focus" | "monthly" | "monthly focus" => Some(FlexiPlan::MonthlyFocus),
            _ => None,
        }
    }

    pub fn is_hour_capped(&self) -> bool {
        matches!(self, FlexiPlan::Grind)
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum FlexiStatus {
    Inactive,
    CheckedIn,
}

impl FlexiStatus {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            FlexiStatus::Inactive => "Inactive",
            FlexiStatus::CheckedIn => "Checked In",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "Inactive" => Some(FlexiStatus::Inactive),
            "Checked In" => Some(FlexiStatus::CheckedIn),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FlexiAccount {
    pub id: i64,
    pub client_name: String,
    pub plan: FlexiPlan,
    pub start_date: NaiveDate,
    pub expiry_date: NaiveDate,
    pub total_hours_limit: Option<f64>,
    pub remaining_hours: Option<f64>, // only meaningful for Grind
    pub amount_paid: i64,
    pub status: FlexiStatus,
    pub last_check_in: Option<NaiveDateTime>,
    pub notes: String,
    pub created_at: NaiveDateTime, // sale timestamp, used by reports
}

impl FlexiAccount {
    pub fn is_checked_in(&self) -> bool {
        self.status == FlexiStatus::CheckedIn
    }
}

/// One completed Flexi visit.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FlexiLog {
    pub id: i64,
    pub account_id: i64,
    pub check_in: NaiveDateTime,
    pub check_out: NaiveDateTime,
    pub duration_hours: f64,
}
