pub mod colors;
pub mod date;
pub mod formatting;
pub mod prompt;
pub mod table;
pub mod time;

pub use formatting::money;
