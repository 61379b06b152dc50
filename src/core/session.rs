use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries::sessions::{close_all_open, close_session, insert_session, open_session};
use crate::errors::{AppError, AppResult};
use crate::models::session::{MAX_SESSION_HOURS, Session};
use crate::utils::time;
use chrono::NaiveDateTime;

/// Operator sign-in / sign-out.
pub struct SessionLogic;

impl SessionLogic {
    /// Start a new session, closing any that were left open.
    pub fn login(
        pool: &mut DbPool,
        operator: &str,
        hours: i64,
        now: NaiveDateTime,
    ) -> AppResult<Session> {
        if operator.trim().is_empty() {
            return Err(AppError::InvalidInput("operator name cannot be empty".into()));
        }
        if hours <= 0 || hours > MAX_SESSION_HOURS {
            return Err(AppError::InvalidInput(format!(
                "session length must be between 1 and {MAX_SESSION_HOURS} hours, got {hours}"
            )));
        }

        close_all_open(&pool.conn, now)?;

        let mut session = Session::sign_in(operator, now, hours)?;
        session.id = insert_session(&pool.conn, &session)?;

        ttlog(
            &pool.conn,
            "login",
            &session.operator,
            &format!("Signed in until {}", time::to_db(&session.expires_at)),
        )?;

        Ok(session)
    }

    /// Close the current session. `None` when nobody was signed in.
    pub fn logout(pool: &mut DbPool, now: NaiveDateTime) -> AppResult<Option<Session>> {
        let Some(mut session) = open_session(&pool.conn)? else {
            return Ok(None);
        };

        session.sign_out(now);
        close_session(&pool.conn, session.id, now)?;
        ttlog(&pool.conn, "logout", &session.operator, "Signed out")?;

        Ok(Some(session))
    }

    /// The signed-in session, if any, without enforcing expiry.
    pub fn peek(pool: &DbPool) -> AppResult<Option<Session>> {
        open_session(&pool.conn)
    }

    /// Session required by every mutating command. An expired session is
    /// closed on the spot.
    pub fn require(pool: &mut DbPool, now: NaiveDateTime) -> AppResult<Session> {
        let session = open_session(&pool.conn)?.ok_or(AppError::NotSignedIn)?;

        if let Err(e) = session.ensure_active(now) {
            close_session(&pool.conn, session.id, session.expires_at)?;
            ttlog(
                &pool.conn,
                "session_expired",
                &session.operator,
                &format!("Session expired at {}", time::to_db(&session.expires_at)),
            )?;
            return Err(e);
        }

        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::queries::test_support::memory_pool;

    fn at(s: &str) -> NaiveDateTime {
        time::parse_datetime(s).unwrap()
    }

    #[test]
    fn require_needs_a_sign_in() {
        let mut pool = memory_pool();
        assert!(matches!(
            SessionLogic::require(&mut pool, at("2025-03-01T09:00")),
            Err(AppError::NotSignedIn)
        ));
    }

    #[test]
    fn expired_session_is_closed() {
        let mut pool = memory_pool();
        SessionLogic::login(&mut pool, "Kim", 8, at("2025-03-01T08:00")).unwrap();

        assert!(SessionLogic::require(&mut pool, at("2025-03-01T15:59")).is_ok());
        assert!(matches!(
            SessionLogic::require(&mut pool, at("2025-03-01T16:00")),
            Err(AppError::SessionExpired(_))
        ));
        // the second attempt finds nobody signed in
        assert!(matches!(
            SessionLogic::require(&mut pool, at("2025-03-01T16:01")),
            Err(AppError::NotSignedIn)
        ));
    }

    #[test]
    fn login_replaces_previous_session() {
        let mut pool = memory_pool();
        SessionLogic::login(&mut pool, "Kim", 8, at("2025-03-01T08:00")).unwrap();
        SessionLogic::login(&mut pool, "Lee", 8, at("2025-03-01T09:00")).unwrap();

        let s = SessionLogic::require(&mut pool, at("2025-03-01T10:00")).unwrap();
        assert_eq!(s.operator, "Lee");

        let out = SessionLogic::logout(&mut pool, at("2025-03-01T11:00")).unwrap();
        assert!(out.is_some());
        assert!(SessionLogic::logout(&mut pool, at("2025-03-01T11:05")).unwrap().is_none());
    }

    #[test]
    fn oversized_session_length_is_rejected() {
        let mut pool = memory_pool();
        SessionLogic::login(&mut pool, "Kim", 8, at("2025-03-01T08:00")).unwrap();

        assert!(matches!(
            SessionLogic::login(&mut pool, "Lee", 9_999_999_999_999, at("2025-03-01T09:00")),
            Err(AppError::InvalidInput(_))
        ));
        // the rejected attempt leaves the current operator signed in
        let s = SessionLogic::require(&mut pool, at("2025-03-01T10:00")).unwrap();
        assert_eq!(s.operator, "Kim");
    }
}
