//! services/mod.rs
//! Lógica de negocio: stores, canales de entrega, envío y estadísticas.

pub mod campaign_dispatcher;
pub mod campaign_service;
pub mod customer_service;
pub mod delivery_channel;
pub mod email_channel;
pub mod recipient_resolver;
pub mod seed_service;
pub mod statistics_service;
pub mod whatsapp_channel;
