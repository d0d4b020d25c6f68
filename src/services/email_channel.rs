//! services/email_channel.rs

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::{
    config::app_config::SmtpConfig,
    errors::FailureReason,
    models::{channel_model::ChannelKind, customer_model::Customer},
    services::delivery_channel::DeliveryChannel,
};

/// Envía el texto de la campaña como email de texto plano al cliente.
pub struct EmailChannel {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    subject: String,
}

impl EmailChannel {
    pub fn from_config(config: &SmtpConfig) -> Result<Self> {
        let sender = config
            .sender
            .as_deref()
            .ok_or_else(|| anyhow!("MAIL_DEFAULT_SENDER or MAIL_USERNAME must be set"))?;
        let from: Mailbox = sender.parse().context("Invalid sender address")?;

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .with_context(|| format!("Invalid SMTP relay {}", config.host))?
            .port(config.port);
        if let (Some(user), Some(pass)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        Ok(Self {
            mailer: builder.build(),
            from,
            subject: config.subject.clone(),
        })
    }

    pub(crate) fn build_message(
        &self,
        recipient: &Customer,
        message: &str,
    ) -> Result<Message, FailureReason> {
        let raw = recipient.email.trim();
        if raw.is_empty() {
            return Err(FailureReason::MissingAddress("email"));
        }
        let address: Address = raw.parse().map_err(|e: lettre::address::AddressError| {
            FailureReason::InvalidAddress {
                address: raw.to_string(),
                detail: e.to_string(),
            }
        })?;

        Message::builder()
            .from(self.from.clone())
            .to(Mailbox::new(Some(recipient.name.clone()), address))
            .subject(&self.subject)
            .header(ContentType::TEXT_PLAIN)
            .body(message.to_string())
            .map_err(|e| FailureReason::Transport(format!("could not build message: {e}")))
    }
}

#[async_trait]
impl DeliveryChannel for EmailChannel {
    fn kind(&self) -> ChannelKind {
        ChannelKind::Email
    }

    async fn attempt(&self, recipient: &Customer, message: &str) -> Result<(), FailureReason> {
        let email = self.build_message(recipient, message)?;
        self.mailer
            .send(email)
            .await
            .map(|_| ())
            .map_err(|e| FailureReason::Transport(e.to_string()))
    }
}
