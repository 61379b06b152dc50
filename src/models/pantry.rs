use crate::errors::{AppError, AppResult};
use chrono::NaiveDateTime;
use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PantryItem {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub price: i64,
    pub is_available: bool,
}

/// One cart line at the point of sale.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub item: PantryItem,
    pub quantity: i64,
}

/// Append-only record of a pantry sale.
#[derive(Debug, Clone, Serialize)]
pub struct PantryTransaction {
    pub id: i64,
    pub created_at: NaiveDateTime,
    pub items_summary: String, // "2x Oreo, 1x Coke"
    pub total_quantity: i64,
    pub total_amount: i64,
}

impl PantryTransaction {
    /// Build a sale from cart lines. Lines for the same item are merged,
    /// keeping the order in which items were first added.
    pub fn from_cart(lines: &[CartLine], created_at: NaiveDateTime) -> AppResult<Self> {
        let overflow = || AppError::InvalidInput("sale total is out of range".into());

        let mut merged: Vec<CartLine> = Vec::new();
        for line in lines {
            match merged.iter_mut().find(|l| l.item.id == line.item.id) {
                Some(existing) => {
                    existing.quantity = existing
                        .quantity
                        .checked_add(line.quantity)
                        .ok_or_else(overflow)?;
                }
                None => merged.push(line.clone()),
            }
        }

        let mut total_quantity: i64 = 0;
        let mut total_amount: i64 = 0;
        for l in &merged {
            total_quantity = total_quantity.checked_add(l.quantity).ok_or_else(overflow)?;
            total_amount = l
                .quantity
                .checked_mul(l.item.price)
                .and_then(|line_total| total_amount.checked_add(line_total))
                .ok_or_else(overflow)?;
        }

        let items_summary = merged
            .iter()
            .map(|l| format!("{}x {}", l.quantity, l.item.name))
            .collect::<Vec<_>>()
            .join(", ");

        Ok(Self {
            id: 0,
            created_at,
            items_summary,
            total_quantity,
            total_amount,
        })
    }
}
