//! models/mod.rs
//! Registros de dominio y estructuras de request/response.

pub mod campaign_model;
pub mod channel_model;
pub mod customer_model;
pub mod statistics_model;
