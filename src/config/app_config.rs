//! config/app_config.rs
//! Configuración del servicio, leída del entorno (y de `.env` vía dotenv).

use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{ensure, Context, Result};

/// Configuración SMTP para el canal de email.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub sender: Option<String>,
    pub subject: String,
}

/// Gateway de WhatsApp. Solo existe si ambas variables están definidas.
#[derive(Debug, Clone)]
pub struct WhatsAppGatewayConfig {
    pub base_url: String,
    pub session_id: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_host: String,
    pub bind_port: u16,
    pub http_workers: usize,
    /// Tiempo máximo para un intento de envío (segundos).
    pub delivery_timeout_secs: u64,
    pub seed_demo_data: bool,
    pub smtp: SmtpConfig,
    pub whatsapp: Option<WhatsAppGatewayConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            database_url: "sqlite:data/crm.db".to_string(),
            bind_host: "0.0.0.0".to_string(),
            bind_port: 8000,
            http_workers: 1,
            delivery_timeout_secs: 30,
            seed_demo_data: false,
            smtp: SmtpConfig {
                host: "smtp.gmail.com".to_string(),
                port: 587,
                username: None,
                password: None,
                sender: None,
                subject: "New Campaign".to_string(),
            },
            whatsapp: None,
        }
    }
}

impl AppConfig {
    /// Construye la config desde las variables de entorno; lo que no esté
    /// definido toma el valor de `Default`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = AppConfig::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let whatsapp = match (non_empty("WHATSAPP_API_URL"), non_empty("WHATSAPP_API_SESSION_ID")) {
            (Some(base_url), Some(session_id)) => Some(WhatsAppGatewayConfig {
                base_url: base_url.trim_end_matches('/').to_string(),
                session_id,
            }),
            _ => None,
        };

        let username = non_empty("MAIL_USERNAME");
        let sender = non_empty("MAIL_DEFAULT_SENDER").or_else(|| username.clone());

        Ok(AppConfig {
            database_url: non_empty("DATABASE_URL").unwrap_or(defaults.database_url),
            bind_host: non_empty("BIND_HOST").unwrap_or(defaults.bind_host),
            bind_port: parse_or(&lookup, "BIND_PORT", defaults.bind_port)?,
            http_workers: positive_or(&lookup, "HTTP_WORKERS", defaults.http_workers)?,
            delivery_timeout_secs: positive_or(
                &lookup,
                "DELIVERY_TIMEOUT_SECS",
                defaults.delivery_timeout_secs,
            )?,
            seed_demo_data: parse_or(&lookup, "SEED_DEMO_DATA", defaults.seed_demo_data)?,
            smtp: SmtpConfig {
                host: non_empty("MAIL_SERVER").unwrap_or(defaults.smtp.host),
                port: parse_or(&lookup, "MAIL_PORT", defaults.smtp.port)?,
                username,
                password: non_empty("MAIL_PASSWORD"),
                sender,
                subject: non_empty("MAIL_SUBJECT").unwrap_or(defaults.smtp.subject),
            },
            whatsapp,
        })
    }

    pub fn delivery_timeout(&self) -> Duration {
        Duration::from_secs(self.delivery_timeout_secs)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key).filter(|v| !v.trim().is_empty()) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Invalid value for {key}: {raw:?}")),
        None => Ok(default),
    }
}

/// Igual que `parse_or`, pero el cero no es válido (workers, timeouts).
fn positive_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Default + PartialEq,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value = parse_or(lookup, key, default)?;
    ensure!(value != T::default(), "{key} must be greater than 0");
    Ok(value)
}
