use crate::db::log::ttlog_as;
use crate::db::pool::DbPool;
use crate::db::queries::Loaded;
use crate::db::queries::pantry::{
    insert_item, insert_transaction, list_items, load_item, transactions_between, update_item,
};
use crate::errors::{AppError, AppResult};
use crate::models::pantry::{CartLine, PantryItem, PantryTransaction};
use crate::models::session::Session;
use chrono::{NaiveDate, NaiveDateTime};

#[derive(Debug, Clone, Default)]
pub struct ItemEdit {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<i64>,
    pub is_available: Option<bool>,
}

pub struct PantryLogic;

/// Largest quantity of one item in a single sale.
pub const MAX_CART_QUANTITY: i64 = 999;

fn validate(item: &PantryItem) -> AppResult<()> {
    if item.name.trim().is_empty() {
        return Err(AppError::InvalidInput("item name cannot be empty".into()));
    }
    // sale summaries are "2x Oreo, 1x Coke"
    if item.name.contains(',') {
        return Err(AppError::InvalidInput(format!(
            "item name cannot contain a comma: '{}'",
            item.name.trim()
        )));
    }
    if item.price < 0 {
        return Err(AppError::InvalidInput("price cannot be negative".into()));
    }
    Ok(())
}

/// Parse a cart argument: "ID" or "ID:QTY".
pub fn parse_cart_entry(raw: &str) -> AppResult<(i64, i64)> {
    let (id, qty) = match raw.split_once(':') {
        Some((id, qty)) => (id.trim(), qty.trim()),
        None => (raw.trim(), "1"),
    };

    let id: i64 = id
        .parse()
        .map_err(|_| AppError::InvalidInput(format!("invalid item id in '{raw}'")))?;
    let qty: i64 = qty
        .parse()
        .map_err(|_| AppError::InvalidInput(format!("invalid quantity in '{raw}'")))?;

    if qty <= 0 || qty > MAX_CART_QUANTITY {
        return Err(AppError::InvalidInput(format!(
            "quantity must be between 1 and {MAX_CART_QUANTITY} in '{raw}'"
        )));
    }
    Ok((id, qty))
}

impl PantryLogic {
    pub fn add_item(pool: &mut DbPool, session: &Session, item: PantryItem) -> AppResult<PantryItem> {
        validate(&item)?;

        let mut item = item;
        item.id = insert_item(&pool.conn, &item)?;

        ttlog_as(
            &pool.conn,
            session,
            "add",
            &format!("pantry item #{}", item.id),
            &format!("Added '{}' at {} pesos", item.name, item.price),
        )?;
        Ok(item)
    }

    pub fn edit_item(
        pool: &mut DbPool,
        session: &Session,
        id: i64,
        changes: ItemEdit,
    ) -> AppResult<PantryItem> {
        let mut item = load_item(&pool.conn, id)?;

        if let Some(n) = changes.name {
            item.name = n.trim().to_string();
        }
        if let Some(c) = changes.category {
            item.category = c.trim().to_string();
        }
        if let Some(p) = changes.price {
            item.price = p;
        }
        if let Some(a) = changes.is_available {
            item.is_available = a;
        }

        validate(&item)?;
        update_item(&pool.conn, &item)?;

        ttlog_as(
            &pool.conn,
            session,
            "edit",
            &format!("pantry item #{id}"),
            &format!("Updated '{}'", item.name),
        )?;
        Ok(item)
    }

    pub fn items(pool: &DbPool, available_only: bool) -> AppResult<Vec<PantryItem>> {
        list_items(&pool.conn, available_only)
    }

    /// Record a sale. Every item must exist and be available.
    pub fn sell(
        pool: &mut DbPool,
        session: &Session,
        cart: &[(i64, i64)],
        now: NaiveDateTime,
    ) -> AppResult<PantryTransaction> {
        if cart.is_empty() {
            return Err(AppError::InvalidInput("the cart is empty".into()));
        }

        let mut lines = Vec::with_capacity(cart.len());
        for &(id, quantity) in cart {
            let item = load_item(&pool.conn, id)?;
            if !item.is_available {
                return Err(AppError::InvalidInput(format!(
                    "'{}' is marked as unavailable",
                    item.name
                )));
            }
            lines.push(CartLine { item, quantity });
        }

        let mut sale = PantryTransaction::from_cart(&lines, now)?;
        sale.id = insert_transaction(&pool.conn, &sale)?;

        ttlog_as(
            &pool.conn,
            session,
            "sell",
            &format!("pantry sale #{}", sale.id),
            &format!("{} for {} pesos", sale.items_summary, sale.total_amount),
        )?;
        Ok(sale)
    }

    pub fn sales(
        pool: &DbPool,
        bounds: Option<(NaiveDate, NaiveDate)>,
    ) -> AppResult<Loaded<PantryTransaction>> {
        transactions_between(&pool.conn, bounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::session::SessionLogic;
    use crate::db::queries::test_support::memory_pool;
    use crate::utils::time;

    fn item(name: &str, price: i64) -> PantryItem {
        PantryItem {
            id: 0,
            name: name.into(),
            category: "Snacks".into(),
            price,
            is_available: true,
        }
    }

    #[test]
    fn cart_entries_parse() {
        assert_eq!(parse_cart_entry("3").unwrap(), (3, 1));
        assert_eq!(parse_cart_entry("3:2").unwrap(), (3, 2));
        assert!(parse_cart_entry("3:0").is_err());
        assert!(parse_cart_entry("x:1").is_err());
        assert!(parse_cart_entry("1:999").is_ok());
        assert!(parse_cart_entry("1:1000").is_err());
        assert!(parse_cart_entry("1:999999999999999").is_err());
    }

    #[test]
    fn item_names_with_commas_are_refused() {
        let mut pool = memory_pool();
        let now = time::parse_datetime("2025-03-01T10:00").unwrap();
        let s = SessionLogic::login(&mut pool, "Kim", 12, now).unwrap();

        assert!(matches!(
            PantryLogic::add_item(&mut pool, &s, item("Chips, BBQ", 35)),
            Err(AppError::InvalidInput(_))
        ));

        let chips = PantryLogic::add_item(&mut pool, &s, item("Chips BBQ", 35)).unwrap();
        let rename = ItemEdit {
            name: Some("Chips, Sour Cream".into()),
            ..Default::default()
        };
        assert!(PantryLogic::edit_item(&mut pool, &s, chips.id, rename).is_err());
        assert_eq!(PantryLogic::items(&pool, false).unwrap()[0].name, "Chips BBQ");
    }

    #[test]
    fn sale_is_summarized_and_unavailable_items_refused() {
        let mut pool = memory_pool();
        let now = time::parse_datetime("2025-03-01T10:00").unwrap();
        let s = SessionLogic::login(&mut pool, "Kim", 12, now).unwrap();

        let oreo = PantryLogic::add_item(&mut pool, &s, item("Oreo", 25)).unwrap();
        let coke = PantryLogic::add_item(&mut pool, &s, item("Coke", 40)).unwrap();

        let sale = PantryLogic::sell(&mut pool, &s, &[(oreo.id, 2), (coke.id, 1)], now).unwrap();
        assert_eq!(sale.items_summary, "2x Oreo, 1x Coke");
        assert_eq!(sale.total_amount, 90);

        let changes = ItemEdit {
            is_available: Some(false),
            ..Default::default()
        };
        PantryLogic::edit_item(&mut pool, &s, coke.id, changes).unwrap();
        assert!(PantryLogic::sell(&mut pool, &s, &[(coke.id, 1)], now).is_err());
        assert_eq!(PantryLogic::sales(&pool, None).unwrap().rows.len(), 1);
    }
}
