use crate::core::calculator::duration::membership_terms;
use crate::core::ledger::{self, Checkout};
use crate::db::log::ttlog_as;
use crate::db::pool::DbPool;
use crate::db::queries::Page;
use crate::db::queries::flexi::{
    delete_account, insert_account, insert_log, list_accounts, load_account, logs_for_account,
    update_account_state,
};
use crate::errors::{AppError, AppResult};
use crate::models::flexi::{FlexiAccount, FlexiLog, FlexiPlan, FlexiStatus};
use crate::models::session::Session;
use crate::utils::time;
use chrono::{NaiveDate, NaiveDateTime};

/// Membership prices, taken from the configuration.
#[derive(Debug, Clone, Copy)]
pub struct PlanPrices {
    pub grind: i64,
    pub focus: i64,
}

impl PlanPrices {
    pub fn price_of(&self, plan: FlexiPlan) -> i64 {
        match plan {
            FlexiPlan::Grind => self.grind,
            FlexiPlan::MonthlyFocus => self.focus,
        }
    }
}

pub struct FlexiLogic;

impl FlexiLogic {
    /// Sell a membership. The validity window starts on `start_date`
    /// (today when omitted).
    #[allow(clippy::too_many_arguments)]
    pub fn register(
        pool: &mut DbPool,
        session: &Session,
        client_name: &str,
        plan: FlexiPlan,
        start_date: Option<NaiveDate>,
        prices: PlanPrices,
        notes: &str,
        now: NaiveDateTime,
    ) -> AppResult<FlexiAccount> {
        let name = client_name.trim();
        if name.is_empty() {
            return Err(AppError::InvalidInput("client name cannot be empty".into()));
        }

        let start = start_date.unwrap_or(now.date());
        let terms = membership_terms(plan, start);

        let mut account = FlexiAccount {
            id: 0,
            client_name: name.to_string(),
            plan,
            start_date: start,
            expiry_date: terms.expiry_date,
            total_hours_limit: terms.total_hours,
            remaining_hours: terms.remaining_hours,
            amount_paid: prices.price_of(plan),
            status: FlexiStatus::Inactive,
            last_check_in: None,
            notes: notes.trim().to_string(),
            created_at: now,
        };

        account.id = insert_account(&pool.conn, &account)?;

        ttlog_as(
            &pool.conn,
            session,
            "add",
            &format!("flexi #{}", account.id),
            &format!(
                "Registered {} on {} until {}",
                account.client_name,
                plan.to_db_str(),
                account.expiry_date
            ),
        )?;
        Ok(account)
    }

    pub fn check_in(
        pool: &mut DbPool,
        session: &Session,
        id: i64,
        now: NaiveDateTime,
    ) -> AppResult<FlexiAccount> {
        let mut account = load_account(&pool.conn, id)?;
        ledger::check_in(&mut account, now)?;
        update_account_state(&pool.conn, &account)?;

        ttlog_as(
            &pool.conn,
            session,
            "checkin",
            &format!("flexi #{id}"),
            &format!("{} checked in at {}", account.client_name, time::to_db(&now)),
        )?;
        Ok(account)
    }

    /// Close the open visit. The log row and the account update are written
    /// in one transaction. `None` when the account was not checked in.
    pub fn check_out(
        pool: &mut DbPool,
        session: &Session,
        id: i64,
        now: NaiveDateTime,
    ) -> AppResult<Option<(FlexiAccount, Checkout)>> {
        let mut account = load_account(&pool.conn, id)?;

        let Some(mut checkout) = ledger::check_out(&mut account, now) else {
            return Ok(None);
        };

        let tx = pool.conn.transaction()?;
        checkout.log.id = insert_log(&tx, &checkout.log)?;
        update_account_state(&tx, &account)?;
        tx.commit()?;

        ttlog_as(
            &pool.conn,
            session,
            "checkout",
            &format!("flexi #{id}"),
            &format!(
                "{} checked out after {}h",
                account.client_name, checkout.hours_spent
            ),
        )?;
        Ok(Some((account, checkout)))
    }

    pub fn history(pool: &DbPool, id: i64) -> AppResult<(FlexiAccount, Vec<FlexiLog>)> {
        let account = load_account(&pool.conn, id)?;
        let logs = logs_for_account(&pool.conn, id)?;
        Ok((account, logs))
    }

    pub fn delete(pool: &mut DbPool, session: &Session, id: i64) -> AppResult<FlexiAccount> {
        let account = load_account(&pool.conn, id)?;
        let logs = delete_account(&mut pool.conn, id)?;

        ttlog_as(
            &pool.conn,
            session,
            "del",
            &format!("flexi #{id}"),
            &format!("Deleted {} and {logs} visit logs", account.client_name),
        )?;
        Ok(account)
    }

    pub fn list(
        pool: &DbPool,
        search: Option<&str>,
        page: usize,
        page_size: usize,
    ) -> AppResult<Page<FlexiAccount>> {
        list_accounts(&pool.conn, search, page, page_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::session::SessionLogic;
    use crate::db::queries::test_support::memory_pool;

    const PRICES: PlanPrices = PlanPrices {
        grind: 2609,
        focus: 5099,
    };

    fn at(s: &str) -> NaiveDateTime {
        time::parse_datetime(s).unwrap()
    }

    #[test]
    fn grind_visit_is_logged_and_debited() {
        let mut pool = memory_pool();
        let s = SessionLogic::login(&mut pool, "Kim", 12, at("2025-03-01T08:00")).unwrap();
        let acc = FlexiLogic::register(
            &mut pool,
            &s,
            "Mika Santos",
            FlexiPlan::Grind,
            None,
            PRICES,
            "",
            at("2025-03-01T08:30"),
        )
        .unwrap();
        assert_eq!(acc.amount_paid, 2609);
        assert_eq!(acc.expiry_date.to_string(), "2025-03-31");

        FlexiLogic::check_in(&mut pool, &s, acc.id, at("2025-03-01T09:00")).unwrap();
        let (after, co) = FlexiLogic::check_out(&mut pool, &s, acc.id, at("2025-03-01T13:30"))
            .unwrap()
            .unwrap();

        assert_eq!(co.hours_spent, 4.5);
        assert_eq!(after.remaining_hours, Some(55.5));

        let (stored, logs) = FlexiLogic::history(&pool, acc.id).unwrap();
        assert_eq!(stored.remaining_hours, Some(55.5));
        assert_eq!(stored.status, FlexiStatus::Inactive);
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].duration_hours, 4.5);

        // nothing open any more
        assert!(
            FlexiLogic::check_out(&mut pool, &s, acc.id, at("2025-03-01T14:00"))
                .unwrap()
                .is_none()
        );
        assert_eq!(FlexiLogic::history(&pool, acc.id).unwrap().1.len(), 1);
    }

    #[test]
    fn failed_log_insert_leaves_account_checked_in() {
        let mut pool = memory_pool();
        let s = SessionLogic::login(&mut pool, "Kim", 12, at("2025-03-01T08:00")).unwrap();
        let acc = FlexiLogic::register(
            &mut pool,
            &s,
            "Mika",
            FlexiPlan::MonthlyFocus,
            None,
            PRICES,
            "",
            at("2025-03-01T08:30"),
        )
        .unwrap();
        FlexiLogic::check_in(&mut pool, &s, acc.id, at("2025-03-01T09:00")).unwrap();

        pool.conn.execute_batch("DROP TABLE flexi_logs;").unwrap();
        assert!(FlexiLogic::check_out(&mut pool, &s, acc.id, at("2025-03-01T10:00")).is_err());

        let stored = load_account(&pool.conn, acc.id).unwrap();
        assert_eq!(stored.status, FlexiStatus::CheckedIn);
        assert_eq!(stored.last_check_in, Some(at("2025-03-01T09:00")));
    }
}
