//! services/whatsapp_channel.rs
//! Entrega por WhatsApp a través de una sesión del gateway HTTP.

use async_trait::async_trait;
use reqwest::Client;

use crate::{
    config::app_config::WhatsAppGatewayConfig,
    errors::FailureReason,
    models::{channel_model::ChannelKind, customer_model::Customer},
    services::delivery_channel::DeliveryChannel,
};

#[derive(Clone)]
pub struct WhatsAppChannel {
    http_client: Client,
    send_url: String,
}

impl WhatsAppChannel {
    pub fn new(gateway: &WhatsAppGatewayConfig) -> Self {
        Self {
            http_client: Client::new(),
            send_url: format!(
                "{}/client/sendMessage/{}",
                gateway.base_url, gateway.session_id
            ),
        }
    }
}

/// Chat id del gateway para un teléfono: sus dígitos más el sufijo `@c.us`.
pub(crate) fn chat_id_for(phone: &str) -> Option<String> {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        None
    } else {
        Some(format!("{digits}@c.us"))
    }
}

#[async_trait]
impl DeliveryChannel for WhatsAppChannel {
    fn kind(&self) -> ChannelKind {
        ChannelKind::WhatsApp
    }

    async fn attempt(&self, recipient: &Customer, message: &str) -> Result<(), FailureReason> {
        let chat_id = chat_id_for(&recipient.phone).ok_or(FailureReason::MissingAddress("phone"))?;

        let payload = serde_json::json!({
            "chatId": chat_id,
            "contentType": "string",
            "content": message
        });

        let resp = self
            .http_client
            .post(&self.send_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| FailureReason::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(FailureReason::Transport(format!(
                "gateway answered {status} for {chat_id}: {body}"
            )));
        }
        Ok(())
    }
}
