use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenderBuckets {
    pub male: u64,
    pub female: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AgeBuckets {
    #[serde(rename = "18-25")]
    pub up_to_25: u64,
    #[serde(rename = "26-35")]
    pub from_26_to_35: u64,
    #[serde(rename = "36-45")]
    pub from_36_to_45: u64,
    #[serde(rename = "46+")]
    pub from_46: u64,
}

impl AgeBuckets {
    /// Límites inclusivos; todo lo que sea <= 25 (incluso edades negativas por
    /// fechas de nacimiento futuras) cae en el primer rango.
    pub fn add(&mut self, age: i64) {
        match age {
            i64::MIN..=25 => self.up_to_25 += 1,
            26..=35 => self.from_26_to_35 += 1,
            36..=45 => self.from_36_to_45 += 1,
            _ => self.from_46 += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.up_to_25 + self.from_26_to_35 + self.from_36_to_45 + self.from_46
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignSummary {
    pub id: i64,
    #[serde(rename = "type")]
    pub channel_type: String,
    pub date: DateTime<Utc>,
    pub success_count: u32,
    pub fail_count: u32,
}

/// GET /api/statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsReport {
    pub total_clients: u64,
    pub gender_data: GenderBuckets,
    pub age_data: AgeBuckets,
    pub campaign_data: Vec<CampaignSummary>,
}
