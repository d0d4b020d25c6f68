//! services/statistics_service.rs
//! Buckets demográficos de clientes más el historial de campañas.

use std::sync::Arc;

use anyhow::Result;
use chrono::{NaiveDate, Utc};

use crate::{
    models::statistics_model::{AgeBuckets, CampaignSummary, GenderBuckets, StatisticsReport},
    services::{campaign_service::CampaignStore, customer_service::CustomerStore},
};

#[derive(Clone)]
pub struct StatisticsService {
    customers: Arc<dyn CustomerStore>,
    campaigns: Arc<dyn CampaignStore>,
}

impl StatisticsService {
    pub fn new(customers: Arc<dyn CustomerStore>, campaigns: Arc<dyn CampaignStore>) -> Self {
        Self {
            customers,
            campaigns,
        }
    }

    pub async fn compute(&self) -> Result<StatisticsReport> {
        self.compute_at(Utc::now().date_naive()).await
    }

    /// Recalcula todo desde los stores; no hay caché.
    pub async fn compute_at(&self, today: NaiveDate) -> Result<StatisticsReport> {
        let customers = self.customers.list_all().await?;
        let campaigns = self.campaigns.list_all().await?;

        let mut gender_data = GenderBuckets::default();
        let mut age_data = AgeBuckets::default();

        for customer in &customers {
            // Cualquier otra etiqueta no cuenta en ninguno de los dos buckets.
            match customer.gender.as_str() {
                "male" => gender_data.male += 1,
                "female" => gender_data.female += 1,
                _ => {}
            }
            age_data.add(age_in_years(customer.birth_date, today));
        }

        let campaign_data = campaigns
            .into_iter()
            .map(|c| CampaignSummary {
                id: c.id,
                channel_type: c.channel_type,
                date: c.created_at,
                success_count: c.success_count,
                fail_count: c.fail_count,
            })
            .collect();

        Ok(StatisticsReport {
            total_clients: customers.len() as u64,
            gender_data,
            age_data,
            campaign_data,
        })
    }
}

/// Periodos completos de 365 días entre ambas fechas, redondeado hacia abajo. Ignora bisiestos.
pub fn age_in_years(birth_date: NaiveDate, today: NaiveDate) -> i64 {
    (today - birth_date).num_days().div_euclid(365)
}
