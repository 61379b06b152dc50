pub mod booking;
pub mod exclusive;
pub mod flexi;
pub mod package;
pub mod pantry;
pub mod session;
