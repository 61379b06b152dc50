//! Membership balance ledger: the Flexi check-in / check-out state machine.
//!
//! The functions here only mutate the in-memory account. Persisting the
//! resulting log row and account update together is `core::flexi`'s job.

use crate::core::calculator::duration::FOCUS_SESSION_SOFT_CAP;
use crate::errors::{AppError, AppResult};
use crate::models::flexi::{FlexiAccount, FlexiLog, FlexiPlan, FlexiStatus};
use crate::utils::date;
use crate::utils::time::{minutes_between, round2};
use chrono::NaiveDateTime;

/// Outcome of a completed Flexi visit.
#[derive(Debug, Clone, PartialEq)]
pub struct Checkout {
    pub log: FlexiLog,
    pub hours_spent: f64,
    /// Set when a Monthly Focus visit ran past its soft cap. The visit is
    /// still logged in full.
    pub over_soft_cap: bool,
}

/// Open a visit. Expired memberships and empty Grind balances are refused.
pub fn check_in(account: &mut FlexiAccount, now: NaiveDateTime) -> AppResult<()> {
    if account.is_checked_in() {
        return Err(AppError::AlreadyCheckedIn(account.client_name.clone()));
    }

    let expiry_start = account.expiry_date.and_hms_opt(0, 0, 0).unwrap_or_default();
    if now > expiry_start {
        return Err(AppError::ExpiredMembership {
            name: account.client_name.clone(),
            expiry: date::to_db(&account.expiry_date),
        });
    }

    if account.plan.is_hour_capped() && account.remaining_hours.unwrap_or(0.0) <= 0.0 {
        return Err(AppError::InsufficientBalance {
            name: account.client_name.clone(),
        });
    }

    account.status = FlexiStatus::CheckedIn;
    account.last_check_in = Some(now);
    Ok(())
}

/// Close the open visit. Returns `None` when there is nothing to close, so a
/// repeated check-out leaves balance and history untouched.
pub fn check_out(account: &mut FlexiAccount, now: NaiveDateTime) -> Option<Checkout> {
    let started = account.last_check_in?;

    let minutes = minutes_between(started, now);
    let hours_spent = round2(minutes as f64 / 60.0);

    if account.plan == FlexiPlan::Grind {
        let remaining = account.remaining_hours.unwrap_or(0.0);
        // Overage is absorbed, never carried as debt.
        account.remaining_hours = Some(round2((remaining - hours_spent).max(0.0)));
    }

    account.status = FlexiStatus::Inactive;
    account.last_check_in = None;

    Some(Checkout {
        log: FlexiLog {
            id: 0,
            account_id: account.id,
            check_in: started,
            check_out: now,
            duration_hours: hours_spent,
        },
        hours_spent,
        over_soft_cap: account.plan == FlexiPlan::MonthlyFocus
            && hours_spent > FOCUS_SESSION_SOFT_CAP,
    })
}
