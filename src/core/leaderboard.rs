//! Loyalty leaderboard: groups long visits by a normalized customer key and
//! ranks customers by visit count, then by hours.

use crate::config::NameMatch;
use crate::db::pool::DbPool;
use crate::db::queries::Skipped;
use crate::db::queries::leaderboard::loyalty_visits;
use crate::errors::AppResult;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::HashMap;

/// Only visits of at least this many hours count towards loyalty.
pub const LOYALTY_MIN_HOURS: f64 = 3.0;

/// One qualifying visit, from a hub booking or a Flexi log.
#[derive(Debug, Clone)]
pub struct Visit {
    pub name: String,
    pub date: NaiveDateTime,
    pub hours: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Badge {
    Gold,
    Silver,
    Bronze,
}

impl Badge {
    pub fn for_rank(rank: usize) -> Option<Self> {
        match rank {
            1 => Some(Badge::Gold),
            2 => Some(Badge::Silver),
            3 => Some(Badge::Bronze),
            _ => None,
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Badge::Gold => "👑",
            Badge::Silver => "🥈",
            Badge::Bronze => "🥉",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardEntry {
    /// 1-based position in the unfiltered ranking.
    pub rank: usize,
    pub key: String,
    /// Spelling used on the most recent visit.
    pub name: String,
    pub visits: u32,
    pub total_hours: f64,
    pub last_visit: NaiveDateTime,
}

impl LeaderboardEntry {
    pub fn badge(&self) -> Option<Badge> {
        Badge::for_rank(self.rank)
    }

    pub fn rank_label(&self) -> String {
        match self.badge() {
            Some(b) => format!("{} #{}", b.icon(), self.rank),
            None => format!("#{}", self.rank),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Leaderboard {
    pub entries: Vec<LeaderboardEntry>,
}

/// Grouping key for a customer name.
///
/// Periods are dropped, case folded and whitespace collapsed. With
/// `FirstLast`, names of more than two words are keyed on the first and last
/// word only, so "Juan Dela Cruz" and "Juan D. Cruz" collapse together.
pub fn normalize_name(full_name: &str, mode: NameMatch) -> String {
    let cleaned = full_name.replace('.', "").to_lowercase();
    let parts: Vec<&str> = cleaned.split_whitespace().collect();

    match parts.as_slice() {
        [] => "unknown".to_string(),
        [first, .., last] if parts.len() > 2 && mode == NameMatch::FirstLast => {
            format!("{first} {last}")
        }
        _ => parts.join(" "),
    }
}

impl Leaderboard {
    pub fn build(visits: &[Visit], mode: NameMatch) -> Self {
        let mut stats: HashMap<String, LeaderboardEntry> = HashMap::new();

        for v in visits {
            let key = normalize_name(&v.name, mode);

            let entry = stats.entry(key.clone()).or_insert_with(|| LeaderboardEntry {
                rank: 0,
                key,
                name: v.name.clone(),
                visits: 0,
                total_hours: 0.0,
                last_visit: v.date,
            });

            entry.visits += 1;
            entry.total_hours += v.hours;

            // the most recent spelling wins
            if v.date > entry.last_visit {
                entry.last_visit = v.date;
                entry.name = v.name.clone();
            }
        }

        let mut entries: Vec<LeaderboardEntry> = stats.into_values().collect();
        entries.sort_by(|a, b| {
            b.visits
                .cmp(&a.visits)
                .then(b.total_hours.total_cmp(&a.total_hours))
                .then_with(|| a.key.cmp(&b.key))
        });

        for (i, e) in entries.iter_mut().enumerate() {
            e.rank = i + 1;
        }

        Self { entries }
    }

    pub fn top(&self, n: usize) -> &[LeaderboardEntry] {
        &self.entries[..n.min(self.entries.len())]
    }

    /// Rows whose display name contains `term` (case-insensitive). Ranks are
    /// the ones from the full list.
    pub fn search(&self, term: &str) -> Vec<&LeaderboardEntry> {
        let needle = term.trim().to_lowercase();
        self.entries
            .iter()
            .filter(|e| needle.is_empty() || e.name.to_lowercase().contains(&needle))
            .collect()
    }

    /// Rank of a customer in the unfiltered list.
    pub fn rank_of(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.key == key).map(|i| i + 1)
    }
}

/// Build the leaderboard from every qualifying visit in the store, with the
/// visits that could not be read.
pub fn load_leaderboard(pool: &DbPool, mode: NameMatch) -> AppResult<(Leaderboard, Skipped)> {
    let mut skipped = Skipped::default();
    let visits = loyalty_visits(&pool.conn)?.into_rows("loyalty visit", &mut skipped);
    Ok((Leaderboard::build(&visits, mode), skipped))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::time::parse_datetime;

    fn visit(name: &str, date: &str, hours: f64) -> Visit {
        Visit {
            name: name.into(),
            date: parse_datetime(date).unwrap(),
            hours,
        }
    }

    #[test]
    fn normalization_cases() {
        let fl = NameMatch::FirstLast;
        assert_eq!(normalize_name("Juan Dela Cruz", fl), "juan cruz");
        assert_eq!(normalize_name("Juan D. Cruz", fl), "juan cruz");
        assert_eq!(normalize_name("JUAN DELA CRUZ", fl), "juan cruz");
        // two words stay whole, so an added middle initial never merges
        assert_eq!(normalize_name("Juan Cruz", fl), "juan cruz");
        assert_eq!(normalize_name("Juan  Dela", fl), "juan dela");
        assert_eq!(normalize_name("  Ma.  Clara  ", fl), "ma clara");
        assert_eq!(normalize_name("   ", fl), "unknown");
    }

    #[test]
    fn exact_mode_keeps_middle_names() {
        let ex = NameMatch::Exact;
        assert_eq!(normalize_name("Juan Dela Cruz", ex), "juan dela cruz");
        assert_eq!(normalize_name("Juan D. Cruz", ex), "juan d cruz");
        assert_ne!(
            normalize_name("Juan Dela Cruz", ex),
            normalize_name("Juan D. Cruz", ex)
        );
    }

    #[test]
    fn most_recent_spelling_is_displayed() {
        let visits = vec![
            visit("Juan Dela Cruz", "2025-01-05T09:00", 4.0),
            visit("JUAN D. CRUZ", "2025-02-01T09:00", 3.0),
            visit("juan dela cruz", "2025-01-20T09:00", 5.0),
        ];
        let board = Leaderboard::build(&visits, NameMatch::FirstLast);

        assert_eq!(board.entries.len(), 1);
        let e = &board.entries[0];
        assert_eq!(e.visits, 3);
        assert_eq!(e.total_hours, 12.0);
        assert_eq!(e.name, "JUAN D. CRUZ");
        assert_eq!(e.last_visit, parse_datetime("2025-02-01T09:00").unwrap());
    }

    #[test]
    fn ranking_by_visits_then_hours() {
        let visits = vec![
            visit("Ana Reyes", "2025-01-01T09:00", 3.0),
            visit("Ana Reyes", "2025-01-02T09:00", 3.0),
            visit("Ben Cruz", "2025-01-01T09:00", 8.0),
            visit("Ben Cruz", "2025-01-02T09:00", 8.0),
            visit("Carla Lim", "2025-01-03T09:00", 10.0),
            visit("Dino Tan", "2025-01-03T09:00", 4.0),
        ];
        let board = Leaderboard::build(&visits, NameMatch::FirstLast);
        let names: Vec<&str> = board.entries.iter().map(|e| e.name.as_str()).collect();

        assert_eq!(names, ["Ben Cruz", "Ana Reyes", "Carla Lim", "Dino Tan"]);
        assert_eq!(board.entries[0].badge(), Some(Badge::Gold));
        assert_eq!(board.entries[2].badge(), Some(Badge::Bronze));
        assert_eq!(board.entries[3].badge(), None);
        assert_eq!(board.entries[3].rank_label(), "#4");
    }

    #[test]
    fn search_keeps_unfiltered_ranks() {
        let visits = vec![
            visit("Ana Reyes", "2025-01-01T09:00", 3.0),
            visit("Ana Reyes", "2025-01-02T09:00", 3.0),
            visit("Ana Reyes", "2025-01-03T09:00", 3.0),
            visit("Ben Cruz", "2025-01-01T09:00", 8.0),
            visit("Ben Cruz", "2025-01-02T09:00", 8.0),
            visit("Carla Cruz", "2025-01-03T09:00", 10.0),
        ];
        let board = Leaderboard::build(&visits, NameMatch::FirstLast);
        let hits = board.search("cruz");

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].name, "Ben Cruz");
        assert_eq!(hits[0].rank, 2);
        assert_eq!(hits[1].rank, 3);
        assert_eq!(board.rank_of("carla cruz"), Some(3));
        assert_eq!(board.search("").len(), 3);
    }
}
