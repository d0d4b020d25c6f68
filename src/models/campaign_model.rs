use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::FailureReason;
use crate::models::channel_model::ChannelKind;

/// Campaña persistida. Los contadores no cambian después de guardarla.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Campaign {
    pub id: i64,
    pub channel_type: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub success_count: u32,
    pub fail_count: u32,
}

/// Campaña en construcción durante un envío; nadie la ve hasta que se
/// entrega al store de campañas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCampaign {
    pub channel_type: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub success_count: u32,
    pub fail_count: u32,
}

impl NewCampaign {
    pub fn provisional(kind: ChannelKind, message: &str, created_at: DateTime<Utc>) -> Self {
        Self {
            channel_type: kind.as_str().to_string(),
            message: message.to_string(),
            created_at,
            success_count: 0,
            fail_count: 0,
        }
    }

    pub fn record(&mut self, outcome: &DeliveryOutcome) {
        if outcome.is_success() {
            self.success_count += 1;
        } else {
            self.fail_count += 1;
        }
    }
}

/// Resultado de un intento de envío. Se suma a los contadores y se descarta.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryOutcome {
    pub recipient_id: i64,
    pub failure: Option<FailureReason>,
}

impl DeliveryOutcome {
    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }
}

/// POST /api/campaigns
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCampaignRequest {
    #[serde(rename = "type")]
    pub channel_type: String,
    pub message: String,
    pub clients: Vec<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CampaignResult {
    pub id: i64,
    pub success_count: u32,
    pub fail_count: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateCampaignResponse {
    pub id: i64,
    pub message: String,
    pub success_count: u32,
    pub fail_count: u32,
}

impl From<CampaignResult> for CreateCampaignResponse {
    fn from(result: CampaignResult) -> Self {
        Self {
            id: result.id,
            message: "Campaign sent successfully".to_string(),
            success_count: result.success_count,
            fail_count: result.fail_count,
        }
    }
}
