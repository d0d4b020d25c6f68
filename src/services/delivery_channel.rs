//! services/delivery_channel.rs
//! Abstracción de canal de entrega y la tabla de la que elige el dispatcher.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    config::app_config::AppConfig,
    errors::{DispatchError, FailureReason},
    models::{channel_model::ChannelKind, customer_model::Customer},
    services::{email_channel::EmailChannel, whatsapp_channel::WhatsAppChannel},
};

/// Un transporte de salida. `attempt` envía de verdad: llamarlo dos veces
/// para el mismo destinatario envía dos veces.
#[async_trait]
pub trait DeliveryChannel: Send + Sync {
    fn kind(&self) -> ChannelKind;

    async fn attempt(&self, recipient: &Customer, message: &str) -> Result<(), FailureReason>;
}

#[derive(Clone, Default)]
pub struct ChannelRegistry {
    channels: HashMap<ChannelKind, Arc<dyn DeliveryChannel>>,
}

impl ChannelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registra todos los canales que permite la configuración. Un canal que no
    /// se puede construir queda fuera y sus peticiones fallan como no configurado.
    pub fn from_config(config: &AppConfig) -> Self {
        let mut registry = ChannelRegistry::new();

        match EmailChannel::from_config(&config.smtp) {
            Ok(channel) => {
                log::info!(
                    "(from_config) Canal de email listo vía {}:{}",
                    config.smtp.host,
                    config.smtp.port
                );
                registry.register(Arc::new(channel));
            }
            Err(e) => log::warn!("(from_config) Canal de email deshabilitado: {:#}", e),
        }

        match &config.whatsapp {
            Some(gateway) => {
                log::info!("(from_config) Canal de WhatsApp listo vía {}", gateway.base_url);
                registry.register(Arc::new(WhatsAppChannel::new(gateway)));
            }
            None => log::info!(
                "(from_config) Canal de WhatsApp deshabilitado: faltan WHATSAPP_API_URL/WHATSAPP_API_SESSION_ID"
            ),
        }

        registry
    }

    pub fn register(&mut self, channel: Arc<dyn DeliveryChannel>) -> &mut Self {
        self.channels.insert(channel.kind(), channel);
        self
    }

    /// Resuelve el tipo de canal tal como llega en la petición.
    pub fn lookup(&self, channel_type: &str) -> Result<Arc<dyn DeliveryChannel>, DispatchError> {
        let kind: ChannelKind = channel_type.parse()?;
        self.channels
            .get(&kind)
            .cloned()
            .ok_or_else(|| DispatchError::ChannelNotConfigured(kind.to_string()))
    }

    pub fn contains(&self, kind: ChannelKind) -> bool {
        self.channels.contains_key(&kind)
    }
}
