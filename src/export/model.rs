// src/export/model.rs

use crate::core::report::DayRow;
use crate::models::booking::Booking;
use crate::models::exclusive::ExclusiveBooking;
use crate::models::flexi::{FlexiAccount, FlexiLog};
use crate::models::pantry::PantryTransaction;
use crate::utils::{date, time};
use serde::Serialize;

/// Flat booking record for CSV / JSON.
#[derive(Serialize, Clone, Debug)]
pub struct BookingExport {
    pub id: i64,
    pub customer_name: String,
    pub seat_number: String,
    pub package: String,
    pub duration_hours: f64,
    pub check_in: String,
    pub check_out: String,
    pub amount_paid: i64,
    pub status: String,
    pub student: bool,
    pub examinee: bool,
    pub group: bool,
    pub loyalty: bool,
    pub rentals: String,
    pub notes: String,
}

impl From<&Booking> for BookingExport {
    fn from(b: &Booking) -> Self {
        Self {
            id: b.id,
            customer_name: b.customer_name.clone(),
            seat_number: b.seat_number.clone(),
            package: b.package_name.clone(),
            duration_hours: b.duration_hours,
            check_in: time::to_db(&b.check_in),
            check_out: b.check_out.as_ref().map(time::to_db).unwrap_or_default(),
            amount_paid: b.amount_paid,
            status: b.status.to_db_str().to_string(),
            student: b.flags.student,
            examinee: b.flags.examinee,
            group: b.flags.group,
            loyalty: b.flags.loyalty,
            rentals: b.rentals.clone(),
            notes: b.notes.clone(),
        }
    }
}

#[derive(Serialize, Clone, Debug)]
pub struct ExclusiveExport {
    pub id: i64,
    pub client_name: String,
    pub booking_date: String,
    pub start_time: String,
    pub end_date: String,
    pub end_time: String,
    pub duration_hours: f64,
    pub pax: i64,
    pub amount_paid: i64,
    pub status: String,
    pub notes: String,
}

impl From<&ExclusiveBooking> for ExclusiveExport {
    fn from(e: &ExclusiveBooking) -> Self {
        Self {
            id: e.id,
            client_name: e.client_name.clone(),
            booking_date: date::to_db(&e.booking_date),
            start_time: e.start_time.format(time::DB_TIME_FMT).to_string(),
            end_date: date::to_db(&e.end.date()),
            end_time: e.end.time().format(time::DB_TIME_FMT).to_string(),
            duration_hours: e.duration_hours,
            pax: e.pax,
            amount_paid: e.amount_paid,
            status: e.status.to_db_str().to_string(),
            notes: e.notes.clone(),
        }
    }
}

#[derive(Serialize, Clone, Debug)]
pub struct FlexiExport {
    pub id: i64,
    pub client_name: String,
    pub plan: String,
    pub start_date: String,
    pub expiry_date: String,
    pub total_hours_limit: Option<f64>,
    pub remaining_hours: Option<f64>,
    pub amount_paid: i64,
    pub status: String,
    pub created_at: String,
}

impl From<&FlexiAccount> for FlexiExport {
    fn from(a: &FlexiAccount) -> Self {
        Self {
            id: a.id,
            client_name: a.client_name.clone(),
            plan: a.plan.to_db_str().to_string(),
            start_date: date::to_db(&a.start_date),
            expiry_date: date::to_db(&a.expiry_date),
            total_hours_limit: a.total_hours_limit,
            remaining_hours: a.remaining_hours,
            amount_paid: a.amount_paid,
            status: a.status.to_db_str().to_string(),
            created_at: time::to_db(&a.created_at),
        }
    }
}

#[derive(Serialize, Clone, Debug)]
pub struct FlexiLogExport {
    pub id: i64,
    pub account_id: i64,
    pub check_in: String,
    pub check_out: String,
    pub duration_hours: f64,
}

impl From<&FlexiLog> for FlexiLogExport {
    fn from(l: &FlexiLog) -> Self {
        Self {
            id: l.id,
            account_id: l.account_id,
            check_in: time::to_db(&l.check_in),
            check_out: time::to_db(&l.check_out),
            duration_hours: l.duration_hours,
        }
    }
}

#[derive(Serialize, Clone, Debug)]
pub struct PantryExport {
    pub id: i64,
    pub created_at: String,
    pub items_summary: String,
    pub total_quantity: i64,
    pub total_amount: i64,
}

impl From<&PantryTransaction> for PantryExport {
    fn from(p: &PantryTransaction) -> Self {
        Self {
            id: p.id,
            created_at: time::to_db(&p.created_at),
            items_summary: p.items_summary.clone(),
            total_quantity: p.total_quantity,
            total_amount: p.total_amount,
        }
    }
}

/// One report day, with the column names used by the front desk sheet.
#[derive(Serialize, Clone, Debug)]
pub struct ReportRowExport {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Check-ins")]
    pub check_ins: i64,
    #[serde(rename = "Packages")]
    pub packages: i64,
    #[serde(rename = "Exclusive Income")]
    pub exclusive: i64,
    #[serde(rename = "Flexi Income")]
    pub flexi: i64,
    #[serde(rename = "Pantry Income")]
    pub pantry: i64,
    #[serde(rename = "Total Income")]
    pub total: i64,
}

impl From<&DayRow> for ReportRowExport {
    fn from(d: &DayRow) -> Self {
        Self {
            date: date::to_db(&d.date),
            check_ins: d.check_ins,
            packages: d.timesheet,
            exclusive: d.exclusive,
            flexi: d.flexi,
            pantry: d.pantry,
            total: d.total(),
        }
    }
}
