//! handlers/mod.rs
pub mod campaign_handler;
pub mod root_handler;
pub mod statistics_handler;
