//! errors.rs
//! Taxonomía de errores del envío de campañas.

use std::time::Duration;

use thiserror::Error;

/// Errores que abortan un envío completo.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Unknown channel type: {0}")]
    UnknownChannel(String),

    /// El tipo de canal es válido pero no hay una instancia configurada para él.
    #[error("Channel '{0}' is not configured")]
    ChannelNotConfigured(String),

    #[error("Persistence failure: {0:#}")]
    Persistence(anyhow::Error),
}

impl DispatchError {
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            DispatchError::UnknownChannel(_) | DispatchError::ChannelNotConfigured(_)
        )
    }
}

/// Motivo por el que un intento de entrega individual no se completó.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FailureReason {
    #[error("recipient has no {0} address")]
    MissingAddress(&'static str),

    #[error("invalid address {address:?}: {detail}")]
    InvalidAddress { address: String, detail: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("delivery timed out after {0:?}")]
    Timeout(Duration),
}
