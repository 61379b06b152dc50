pub mod backup;
pub mod booking;
pub mod calculator;
pub mod exclusive;
pub mod flexi;
pub mod leaderboard;
pub mod ledger;
pub mod log;
pub mod package;
pub mod pantry;
pub mod report;
pub mod session;
