use crate::cli::commands::open_signed_in;
use crate::cli::parser::PantryCmd;
use crate::config::Config;
use crate::core::pantry::{ItemEdit, PantryLogic, parse_cart_entry};
use crate::db::initialize::open_db;
use crate::db::queries::Skipped;
use crate::errors::AppResult;
use crate::export::parse_range;
use crate::models::pantry::PantryItem;
use crate::ui::messages::{header, info, skipped_rows, success};
use crate::utils::colors::{GREY, paint};
use crate::utils::formatting::{display_datetime, money};
use crate::utils::table::Table;
use chrono::NaiveDateTime;

pub fn handle(action: &PantryCmd, cfg: &Config, now: NaiveDateTime) -> AppResult<()> {
    let symbol = cfg.currency_symbol.as_str();

    match action {
        PantryCmd::ItemAdd {
            name,
            price,
            category,
            unavailable,
        } => {
            let (mut pool, session) = open_signed_in(cfg, now)?;
            let item = PantryItem {
                id: 0,
                name: name.trim().to_string(),
                category: category.trim().to_string(),
                price: *price,
                is_available: !*unavailable,
            };
            let item = PantryLogic::add_item(&mut pool, &session, item)?;
            success(format!(
                "Item #{} '{}' added ({}).",
                item.id,
                item.name,
                money(item.price, symbol)
            ));
        }

        PantryCmd::ItemList { available } => {
            let pool = open_db(&cfg.database)?;
            let items = PantryLogic::items(&pool, *available)?;

            if items.is_empty() {
                info("No pantry items.");
                return Ok(());
            }

            header("Pantry");
            let mut table = Table::new(&["ID", "Name", "Category", "Price", "Available"]);
            for i in &items {
                let avail = if i.is_available {
                    "yes".to_string()
                } else {
                    paint("no", GREY)
                };
                table.add_row(vec![
                    i.id.to_string(),
                    i.name.clone(),
                    i.category.clone(),
                    money(i.price, symbol),
                    avail,
                ]);
            }
            print!("{}", table.render());
        }

        PantryCmd::ItemEdit {
            id,
            name,
            category,
            price,
            available,
        } => {
            let (mut pool, session) = open_signed_in(cfg, now)?;
            let changes = ItemEdit {
                name: name.clone(),
                category: category.clone(),
                price: *price,
                is_available: *available,
            };
            let item = PantryLogic::edit_item(&mut pool, &session, *id, changes)?;
            success(format!("Item #{} updated: {}.", item.id, item.name));
        }

        PantryCmd::Sell { items } => {
            let cart = items
                .iter()
                .map(|raw| parse_cart_entry(raw))
                .collect::<AppResult<Vec<_>>>()?;

            let (mut pool, session) = open_signed_in(cfg, now)?;
            let sale = PantryLogic::sell(&mut pool, &session, &cart, now)?;
            success(format!(
                "Sale #{} recorded: {} = {}",
                sale.id,
                sale.items_summary,
                money(sale.total_amount, symbol)
            ));
        }

        PantryCmd::List { range } => {
            let bounds = range.as_deref().map(parse_range).transpose()?;
            let pool = open_db(&cfg.database)?;
            let mut skipped = Skipped::default();
            let sales = PantryLogic::sales(&pool, bounds)?.into_rows("pantry sale", &mut skipped);
            skipped_rows(skipped.counts());

            if sales.is_empty() {
                info("No pantry sales found.");
                return Ok(());
            }

            header("Pantry sales");
            let mut table = Table::new(&["ID", "Date", "Items", "Qty", "Total"]);
            for s in &sales {
                table.add_row(vec![
                    s.id.to_string(),
                    display_datetime(&s.created_at),
                    s.items_summary.clone(),
                    s.total_quantity.to_string(),
                    money(s.total_amount, symbol),
                ]);
            }
            print!("{}", table.render());

            let total: i64 = sales.iter().map(|s| s.total_amount).sum();
            println!("Total: {} over {} sale(s)", money(total, symbol), sales.len());
        }
    }

    Ok(())
}
