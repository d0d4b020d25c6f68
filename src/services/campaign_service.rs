//! services/campaign_service.rs
//! Historial de campañas (solo inserción) en SQLite.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Pool, Sqlite};

use crate::models::campaign_model::{Campaign, NewCampaign};

#[async_trait]
pub trait CampaignStore: Send + Sync {
    /// Guarda una campaña terminada y devuelve su id.
    async fn create(&self, campaign: NewCampaign) -> Result<i64>;

    /// Todas las campañas guardadas, en orden de inserción.
    async fn list_all(&self) -> Result<Vec<Campaign>>;

    async fn count(&self) -> Result<u64>;
}

#[derive(sqlx::FromRow)]
struct CampaignRow {
    id: i64,
    channel_type: String,
    message: String,
    created_at: String,
    success_count: i64,
    fail_count: i64,
}

impl TryFrom<CampaignRow> for Campaign {
    type Error = anyhow::Error;

    fn try_from(row: CampaignRow) -> Result<Self> {
        Ok(Campaign {
            id: row.id,
            channel_type: row.channel_type,
            message: row.message,
            created_at: row
                .created_at
                .parse::<DateTime<Utc>>()
                .with_context(|| format!("Campaign {} has a malformed created_at", row.id))?,
            success_count: u32::try_from(row.success_count)
                .with_context(|| format!("Campaign {} has an invalid success_count", row.id))?,
            fail_count: u32::try_from(row.fail_count)
                .with_context(|| format!("Campaign {} has an invalid fail_count", row.id))?,
        })
    }
}

#[derive(Clone, Debug)]
pub struct CampaignService {
    db_pool: Pool<Sqlite>,
}

impl CampaignService {
    pub fn new(db_pool: Pool<Sqlite>) -> Self {
        CampaignService { db_pool }
    }
}

#[async_trait]
impl CampaignStore for CampaignService {
    async fn create(&self, campaign: NewCampaign) -> Result<i64> {
        // Un solo INSERT con los contadores finales: nunca se lee una campaña a medias.
        let result = sqlx::query(
            r#"
            INSERT INTO campaigns (channel_type, message, created_at, success_count, fail_count)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&campaign.channel_type)
        .bind(&campaign.message)
        .bind(campaign.created_at.to_rfc3339())
        .bind(i64::from(campaign.success_count))
        .bind(i64::from(campaign.fail_count))
        .execute(&self.db_pool)
        .await
        .context("Failed to insert campaign")?;

        Ok(result.last_insert_rowid())
    }

    async fn list_all(&self) -> Result<Vec<Campaign>> {
        let rows = sqlx::query_as::<_, CampaignRow>(
            r#"
            SELECT id, channel_type, message, created_at, success_count, fail_count
            FROM campaigns
            ORDER BY id
            "#,
        )
        .fetch_all(&self.db_pool)
        .await
        .context("Failed to list campaigns")?;

        rows.into_iter().map(Campaign::try_from).collect()
    }

    async fn count(&self) -> Result<u64> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM campaigns")
            .fetch_one(&self.db_pool)
            .await
            .context("Failed to count campaigns")?;
        Ok(total as u64)
    }
}
