//! tests/support.rs
//! Fixtures and test doubles shared by the test modules.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite};

use crate::errors::FailureReason;
use crate::models::campaign_model::{Campaign, NewCampaign};
use crate::models::channel_model::ChannelKind;
use crate::models::customer_model::{Customer, NewCustomer, Segment};
use crate::services::campaign_dispatcher::CampaignDispatcher;
use crate::services::campaign_service::{CampaignService, CampaignStore};
use crate::services::customer_service::{CustomerService, CustomerStore};
use crate::services::delivery_channel::{ChannelRegistry, DeliveryChannel};

/// Single-connection in-memory database with the schema applied. The pool
/// must never recycle its connection or the database would vanish.
pub async fn memory_pool() -> Pool<Sqlite> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory SQLite");
    CustomerService::new(pool.clone())
        .run_migrations()
        .await
        .expect("Failed to run migrations");
    pool
}

pub struct Stores {
    pub customers: Arc<CustomerService>,
    pub campaigns: Arc<CampaignService>,
}

pub async fn memory_stores() -> Stores {
    let pool = memory_pool().await;
    Stores {
        customers: Arc::new(CustomerService::new(pool.clone())),
        campaigns: Arc::new(CampaignService::new(pool)),
    }
}

/// Fixed "today" so age buckets do not drift with the calendar.
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

/// Birth date that yields exactly `years` under the 365-day age rule.
pub fn born_years_ago(today: NaiveDate, years: i64) -> NaiveDate {
    today - chrono::Duration::days(365 * years)
}

pub fn new_customer(name: &str, email: &str, gender: &str, birth_date: NaiveDate) -> NewCustomer {
    NewCustomer {
        name: name.to_string(),
        phone: "+79001234567".to_string(),
        email: email.to_string(),
        birth_date,
        gender: gender.to_string(),
        segment: Segment::default(),
    }
}

pub async fn add_customer(
    store: &dyn CustomerStore,
    name: &str,
    email: &str,
    gender: &str,
    birth_date: NaiveDate,
) -> Customer {
    store
        .create(new_customer(name, email, gender, birth_date))
        .await
        .expect("Failed to insert customer")
}

pub fn dispatcher_for(
    channel: Arc<ScriptedChannel>,
    customers: Arc<dyn CustomerStore>,
    campaigns: Arc<dyn CampaignStore>,
) -> CampaignDispatcher {
    let mut registry = ChannelRegistry::new();
    registry.register(channel);
    CampaignDispatcher::new(registry, customers, campaigns, Duration::from_secs(2))
}

/// Channel double: records every attempt and fails, stalls or panics for
/// chosen email addresses.
pub struct ScriptedChannel {
    kind: ChannelKind,
    failing: HashSet<String>,
    panicking: HashSet<String>,
    stalling: HashSet<String>,
    attempts: Mutex<Vec<i64>>,
}

impl ScriptedChannel {
    pub fn email() -> Self {
        Self {
            kind: ChannelKind::Email,
            failing: HashSet::new(),
            panicking: HashSet::new(),
            stalling: HashSet::new(),
            attempts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_for(mut self, email: &str) -> Self {
        self.failing.insert(email.to_string());
        self
    }

    pub fn panicking_for(mut self, email: &str) -> Self {
        self.panicking.insert(email.to_string());
        self
    }

    pub fn stalling_for(mut self, email: &str) -> Self {
        self.stalling.insert(email.to_string());
        self
    }

    pub fn attempts(&self) -> Vec<i64> {
        self.attempts.lock().unwrap().clone()
    }
}

#[async_trait]
impl DeliveryChannel for ScriptedChannel {
    fn kind(&self) -> ChannelKind {
        self.kind
    }

    async fn attempt(&self, recipient: &Customer, _message: &str) -> Result<(), FailureReason> {
        self.attempts.lock().unwrap().push(recipient.id);

        if self.stalling.contains(&recipient.email) {
            tokio::time::sleep(Duration::from_secs(60)).await;
        }
        if self.panicking.contains(&recipient.email) {
            panic!("transport blew up for {}", recipient.email);
        }
        if self.failing.contains(&recipient.email) {
            return Err(FailureReason::Transport("550 mailbox unavailable".to_string()));
        }
        Ok(())
    }
}

/// Campaign store whose writes always fail.
pub struct UnavailableCampaignStore;

#[async_trait]
impl CampaignStore for UnavailableCampaignStore {
    async fn create(&self, _campaign: NewCampaign) -> Result<i64> {
        Err(anyhow!("database is locked"))
    }

    async fn list_all(&self) -> Result<Vec<Campaign>> {
        Ok(Vec::new())
    }

    async fn count(&self) -> Result<u64> {
        Ok(0)
    }
}

/// Customer store that cannot be read.
pub struct UnavailableCustomerStore;

#[async_trait]
impl CustomerStore for UnavailableCustomerStore {
    async fn create(&self, _customer: NewCustomer) -> Result<Customer> {
        Err(anyhow!("disk I/O error"))
    }

    async fn get(&self, _id: i64) -> Result<Option<Customer>> {
        Err(anyhow!("disk I/O error"))
    }

    async fn list_all(&self) -> Result<Vec<Customer>> {
        Err(anyhow!("disk I/O error"))
    }

    async fn count(&self) -> Result<u64> {
        Err(anyhow!("disk I/O error"))
    }

    async fn touch_last_campaign(&self, _id: i64, _at: DateTime<Utc>) -> Result<()> {
        Err(anyhow!("disk I/O error"))
    }
}

/// Real customer store whose `last_campaign_at` writes always fail.
pub struct ReadOnlyCustomerStore {
    pub inner: Arc<CustomerService>,
}

#[async_trait]
impl CustomerStore for ReadOnlyCustomerStore {
    async fn create(&self, customer: NewCustomer) -> Result<Customer> {
        self.inner.create(customer).await
    }

    async fn get(&self, id: i64) -> Result<Option<Customer>> {
        self.inner.get(id).await
    }

    async fn list_all(&self) -> Result<Vec<Customer>> {
        self.inner.list_all().await
    }

    async fn count(&self) -> Result<u64> {
        self.inner.count().await
    }

    async fn touch_last_campaign(&self, _id: i64, _at: DateTime<Utc>) -> Result<()> {
        Err(anyhow!("attempt to write a readonly database"))
    }
}
