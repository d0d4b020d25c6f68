//! services/campaign_dispatcher.rs
//! Envía una campaña a una lista de clientes y registra el resultado agregado.
//!
//! Las entregas ocurren antes de escribir la fila de la campaña. Si esa escritura
//! falla se devuelve error, pero los mensajes ya entregados al canal quedan
//! enviados: un envío por red y un insert local no pueden ser atómicos.

use std::collections::HashSet;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures_util::FutureExt;

use crate::{
    errors::{DispatchError, FailureReason},
    models::{
        campaign_model::{CampaignResult, DeliveryOutcome, NewCampaign},
        customer_model::Customer,
    },
    services::{
        campaign_service::CampaignStore,
        customer_service::CustomerStore,
        delivery_channel::{ChannelRegistry, DeliveryChannel},
        recipient_resolver::RecipientResolver,
    },
};

#[derive(Clone)]
pub struct CampaignDispatcher {
    channels: ChannelRegistry,
    resolver: RecipientResolver,
    customers: Arc<dyn CustomerStore>,
    campaigns: Arc<dyn CampaignStore>,
    delivery_timeout: Duration,
}

impl CampaignDispatcher {
    pub fn new(
        channels: ChannelRegistry,
        customers: Arc<dyn CustomerStore>,
        campaigns: Arc<dyn CampaignStore>,
        delivery_timeout: Duration,
    ) -> Self {
        Self {
            channels,
            resolver: RecipientResolver::new(customers.clone()),
            customers,
            campaigns,
            delivery_timeout,
        }
    }

    /// Entrega `message` por `channel_type` a cada destinatario, en orden.
    ///
    /// Los ids desconocidos se omiten sin tocar los contadores y un id repetido
    /// se entrega una sola vez. Una entrega fallida se cuenta y el bucle sigue;
    /// solo los errores de configuración o del store abortan la llamada.
    pub async fn dispatch(
        &self,
        channel_type: &str,
        message: &str,
        recipients: &[i64],
    ) -> Result<CampaignResult, DispatchError> {
        let channel = self.channels.lookup(channel_type).map_err(|e| {
            log::error!("(dispatch) Campaña rechazada antes de enviar: {}", e);
            e
        })?;

        let mut campaign = NewCampaign::provisional(channel.kind(), message, Utc::now());
        let mut seen = HashSet::with_capacity(recipients.len());

        log::info!(
            "(dispatch) Iniciando campaña {} para {} ids de destinatarios",
            channel.kind(),
            recipients.len()
        );

        for &recipient_id in recipients {
            if !seen.insert(recipient_id) {
                log::debug!("(dispatch) Destinatario {} repetido, ya procesado", recipient_id);
                continue;
            }

            let customer = match self
                .resolver
                .resolve(recipient_id)
                .await
                .map_err(DispatchError::Persistence)?
            {
                Some(customer) => customer,
                None => {
                    log::info!("(dispatch) Destinatario {} no encontrado, se omite", recipient_id);
                    continue;
                }
            };

            let outcome = self.deliver(channel.as_ref(), &customer, message).await;
            if outcome.is_success() {
                self.customers
                    .touch_last_campaign(customer.id, Utc::now())
                    .await
                    .map_err(DispatchError::Persistence)?;
            }
            campaign.record(&outcome);
        }

        let success_count = campaign.success_count;
        let fail_count = campaign.fail_count;

        let id = self.campaigns.create(campaign).await.map_err(|e| {
            log::error!(
                "(dispatch) No se pudo guardar la campaña tras {} envíos correctos / {} fallidos: {:#}",
                success_count,
                fail_count,
                e
            );
            DispatchError::Persistence(e)
        })?;

        log::info!(
            "(dispatch) Campaña {} guardada. Éxitos: {}, Fallos: {}",
            id,
            success_count,
            fail_count
        );

        Ok(CampaignResult {
            id,
            success_count,
            fail_count,
        })
    }

    /// Exactamente una llamada a `attempt`, limitada por el timeout de entrega.
    /// Un panic dentro del canal cuenta como cualquier otra entrega fallida.
    async fn deliver(
        &self,
        channel: &dyn DeliveryChannel,
        customer: &Customer,
        message: &str,
    ) -> DeliveryOutcome {
        let attempt = AssertUnwindSafe(channel.attempt(customer, message)).catch_unwind();

        let failure = match tokio::time::timeout(self.delivery_timeout, attempt).await {
            Ok(Ok(Ok(()))) => None,
            Ok(Ok(Err(reason))) => Some(reason),
            Ok(Err(_panic)) => Some(FailureReason::Transport("channel panicked".to_string())),
            Err(_elapsed) => Some(FailureReason::Timeout(self.delivery_timeout)),
        };

        let outcome = DeliveryOutcome {
            recipient_id: customer.id,
            failure,
        };

        match &outcome.failure {
            None => log::info!(
                "(deliver) Campaña {} enviada al cliente {}",
                channel.kind(),
                outcome.recipient_id
            ),
            Some(reason) => log::error!(
                "(deliver) Error al enviar campaña {} al cliente {}: {}",
                channel.kind(),
                outcome.recipient_id,
                reason
            ),
        }

        outcome
    }
}
