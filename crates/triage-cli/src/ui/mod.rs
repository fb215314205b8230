pub mod components;
pub mod tickets;
