pub mod delivery;
pub mod message;
pub mod recipients;
pub mod telegram;
