//! services/seed_service.rs
//! Datos de demostración para una base nueva (SEED_DEMO_DATA=true).

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate, Utc};

use crate::{
    models::{
        campaign_model::NewCampaign,
        customer_model::{NewCustomer, Segment},
    },
    services::{campaign_service::CampaignStore, customer_service::CustomerStore},
};

/// Inserta clientes y campañas de demo en la tabla que siga vacía.
pub async fn seed_demo_data(
    customers: &dyn CustomerStore,
    campaigns: &dyn CampaignStore,
) -> Result<()> {
    if customers.count().await? == 0 {
        for customer in demo_customers()? {
            customers.create(customer).await?;
        }
        log::info!("(seed_demo_data) Clientes de demo creados");
    }

    if campaigns.count().await? == 0 {
        let now = Utc::now();
        let demo = [
            ("whatsapp", "Test WhatsApp campaign", now - Duration::days(5), 3, 2),
            ("email", "Test email campaign", now - Duration::days(2), 4, 1),
        ];
        for (channel_type, message, created_at, success_count, fail_count) in demo {
            campaigns
                .create(NewCampaign {
                    channel_type: channel_type.to_string(),
                    message: message.to_string(),
                    created_at,
                    success_count,
                    fail_count,
                })
                .await?;
        }
        log::info!("(seed_demo_data) Campañas de demo creadas");
    }

    Ok(())
}

fn demo_customers() -> Result<Vec<NewCustomer>> {
    let demo = [
        ("Ivan Ivanov", "+79001234567", "ivan@example.com", (1990, 5, 15), "male", Segment::Customer),
        ("Anna Petrova", "+79009876543", "anna@example.com", (1985, 8, 20), "female", Segment::Potential),
        ("Sergey Sidorov", "+79007894561", "sergey@example.com", (1988, 3, 10), "male", Segment::Guest),
    ];

    demo.into_iter()
        .map(|(name, phone, email, (y, m, d), gender, segment)| -> Result<NewCustomer> {
            Ok(NewCustomer {
                name: name.to_string(),
                phone: phone.to_string(),
                email: email.to_string(),
                birth_date: NaiveDate::from_ymd_opt(y, m, d)
                    .with_context(|| format!("Invalid demo birth date for {name}"))?,
                gender: gender.to_string(),
                segment,
            })
        })
        .collect()
}
