//! config/mod.rs
//! Configuración de la aplicación.

pub mod app_config;
