use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::leaderboard::{LOYALTY_MIN_HOURS, LeaderboardEntry, load_leaderboard};
use crate::db::initialize::open_db;
use crate::db::queries::Page;
use crate::errors::AppResult;
use crate::ui::messages::{header, info, page_footer, skipped_rows};
use crate::utils::formatting::{display_date, hours};
use crate::utils::table::Table;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Leaderboard { search, page } = cmd {
        let pool = open_db(&cfg.database)?;
        let (board, skipped) = load_leaderboard(&pool, cfg.leaderboard_match)?;
        skipped_rows(skipped.counts());

        if board.entries.is_empty() {
            info(format!(
                "No visits of {} hours or more yet.",
                hours(LOYALTY_MIN_HOURS)
            ));
            return Ok(());
        }

        // 1️⃣ Podium, only on the unfiltered first page
        if search.is_none() && *page <= 1 {
            header("Top customers");
            for e in board.top(3) {
                println!(
                    "{} {}  {} visits · {} h",
                    e.badge().map(|b| b.icon()).unwrap_or(" "),
                    e.name,
                    e.visits,
                    hours(e.total_hours)
                );
            }
        }

        // 2️⃣ Filter (ranks are kept) and paginate
        let rows = board.search(search.as_deref().unwrap_or(""));
        if rows.is_empty() {
            info("No customer matches the search.");
            return Ok(());
        }

        let (page, total_pages, offset) =
            Page::<&LeaderboardEntry>::window(*page, cfg.page_size, rows.len());
        let visible = rows.iter().skip(offset as usize).take(cfg.page_size);

        header("Leaderboard");
        let mut table = Table::new(&["Rank", "Customer", "Visits", "Hours", "Last visit"]);
        for e in visible {
            let rank = match e.badge() {
                Some(b) => format!("{} {}", b.icon(), e.rank_label()),
                None => e.rank_label(),
            };
            table.add_row(vec![
                rank,
                e.name.clone(),
                e.visits.to_string(),
                hours(e.total_hours),
                display_date(&e.last_visit.date()),
            ]);
        }
        print!("{}", table.render());
        page_footer(page, total_pages, rows.len());
    }

    Ok(())
}
