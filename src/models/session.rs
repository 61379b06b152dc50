use chrono::{Duration, NaiveDateTime};
use serde::Serialize;

use crate::errors::{AppError, AppResult};

/// Operator session. Created by `login`, closed by `logout` or by reaching
/// `expires_at`. Every mutating operation receives it explicitly.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Session {
    pub id: i64,
    pub operator: String,
    pub started_at: NaiveDateTime,
    pub expires_at: NaiveDateTime,
    pub ended_at: Option<NaiveDateTime>,
}

/// Longest sign-in a single `login` may grant (one leap year).
pub const MAX_SESSION_HOURS: i64 = 24 * 366;

impl Session {
    pub fn sign_in(operator: &str, now: NaiveDateTime, hours: i64) -> AppResult<Self> {
        let expires_at = Duration::try_hours(hours)
            .and_then(|d| now.checked_add_signed(d))
            .ok_or_else(|| AppError::InvalidInput(format!("{hours} hours is out of range")))?;

        Ok(Self {
            id: 0,
            operator: operator.trim().to_string(),
            started_at: now,
            expires_at,
            ended_at: None,
        })
    }

    pub fn is_active(&self, now: NaiveDateTime) -> bool {
        self.ended_at.is_none() && now < self.expires_at
    }

    /// Fails when the session was closed or has run past its expiry.
    pub fn ensure_active(&self, now: NaiveDateTime) -> AppResult<()> {
        if self.is_active(now) {
            Ok(())
        } else {
            Err(AppError::SessionExpired(self.operator.clone()))
        }
    }

    pub fn sign_out(&mut self, now: NaiveDateTime) {
        if self.ended_at.is_none() {
            self.ended_at = Some(now);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 1)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn session_expires_after_its_window() {
        let s = Session::sign_in("mara", at(8), 4).unwrap();
        assert!(s.ensure_active(at(11)).is_ok());
        assert!(matches!(
            s.ensure_active(at(12)),
            Err(AppError::SessionExpired(_))
        ));
    }

    #[test]
    fn sign_out_invalidates_and_keeps_first_timestamp() {
        let mut s = Session::sign_in("mara", at(8), 12).unwrap();
        s.sign_out(at(9));
        s.sign_out(at(10));
        assert_eq!(s.ended_at, Some(at(9)));
        assert!(!s.is_active(at(9)));
    }

    #[test]
    fn absurd_session_length_is_an_error() {
        assert!(matches!(
            Session::sign_in("mara", at(8), i64::MAX),
            Err(AppError::InvalidInput(_))
        ));
    }
}
