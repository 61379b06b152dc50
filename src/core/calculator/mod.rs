//! Pure pricing and time rules. Nothing in here touches the database.

pub mod duration;
pub mod rate;
