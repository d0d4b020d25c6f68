//! services/customer_service.rs
//! Registros de clientes en SQLite.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{Pool, Sqlite};

use crate::models::customer_model::{Customer, NewCustomer};

/// Operaciones sobre clientes que necesita el motor de campañas.
#[async_trait]
pub trait CustomerStore: Send + Sync {
    async fn create(&self, customer: NewCustomer) -> Result<Customer>;

    /// `Ok(None)` si ningún cliente tiene ese id.
    async fn get(&self, id: i64) -> Result<Option<Customer>>;

    async fn list_all(&self) -> Result<Vec<Customer>>;

    async fn count(&self) -> Result<u64>;

    /// Actualiza `last_campaign_at` dentro de su propia transacción.
    async fn touch_last_campaign(&self, id: i64, at: DateTime<Utc>) -> Result<()>;
}

#[derive(sqlx::FromRow)]
struct CustomerRow {
    id: i64,
    name: String,
    phone: String,
    email: String,
    birth_date: String,
    gender: String,
    last_campaign_at: Option<String>,
    segment: String,
}

impl TryFrom<CustomerRow> for Customer {
    type Error = anyhow::Error;

    fn try_from(row: CustomerRow) -> Result<Self> {
        let birth_date = NaiveDate::parse_from_str(&row.birth_date, "%Y-%m-%d")
            .with_context(|| format!("Customer {} has a malformed birth_date", row.id))?;
        let last_campaign_at = row
            .last_campaign_at
            .map(|raw| raw.parse::<DateTime<Utc>>())
            .transpose()
            .with_context(|| format!("Customer {} has a malformed last_campaign_at", row.id))?;

        Ok(Customer {
            id: row.id,
            name: row.name,
            phone: row.phone,
            email: row.email,
            birth_date,
            gender: row.gender,
            last_campaign_at,
            segment: row.segment.parse()?,
        })
    }
}

#[derive(Clone, Debug)]
pub struct CustomerService {
    db_pool: Pool<Sqlite>,
}

impl CustomerService {
    pub fn new(db_pool: Pool<Sqlite>) -> Self {
        CustomerService { db_pool }
    }

    /// Aplica el esquema de ./migrations (customers y campaigns).
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.db_pool)
            .await
            .context("Failed to run migrations")?;
        Ok(())
    }
}

#[async_trait]
impl CustomerStore for CustomerService {
    async fn create(&self, customer: NewCustomer) -> Result<Customer> {
        let birth_date = customer.birth_date.format("%Y-%m-%d").to_string();

        let result = sqlx::query(
            r#"
            INSERT INTO customers (name, phone, email, birth_date, gender, segment)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&customer.name)
        .bind(&customer.phone)
        .bind(&customer.email)
        .bind(&birth_date)
        .bind(&customer.gender)
        .bind(customer.segment.as_str())
        .execute(&self.db_pool)
        .await
        .context("Failed to insert customer")?;

        Ok(Customer {
            id: result.last_insert_rowid(),
            name: customer.name,
            phone: customer.phone,
            email: customer.email,
            birth_date: customer.birth_date,
            gender: customer.gender,
            last_campaign_at: None,
            segment: customer.segment,
        })
    }

    async fn get(&self, id: i64) -> Result<Option<Customer>> {
        let row = sqlx::query_as::<_, CustomerRow>(
            r#"
            SELECT id, name, phone, email, birth_date, gender, last_campaign_at, segment
            FROM customers
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db_pool)
        .await
        .with_context(|| format!("Failed to load customer {id}"))?;

        row.map(Customer::try_from).transpose()
    }

    async fn list_all(&self) -> Result<Vec<Customer>> {
        let rows = sqlx::query_as::<_, CustomerRow>(
            r#"
            SELECT id, name, phone, email, birth_date, gender, last_campaign_at, segment
            FROM customers
            ORDER BY id
            "#,
        )
        .fetch_all(&self.db_pool)
        .await
        .context("Failed to list customers")?;

        rows.into_iter().map(Customer::try_from).collect()
    }

    async fn count(&self) -> Result<u64> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers")
            .fetch_one(&self.db_pool)
            .await
            .context("Failed to count customers")?;
        Ok(total as u64)
    }

    async fn touch_last_campaign(&self, id: i64, at: DateTime<Utc>) -> Result<()> {
        let mut tx = self
            .db_pool
            .begin()
            .await
            .context("Failed to open transaction for last_campaign_at")?;

        let result = sqlx::query("UPDATE customers SET last_campaign_at = ?1 WHERE id = ?2")
            .bind(at.to_rfc3339())
            .bind(id)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed to update last_campaign_at for customer {id}"))?;

        tx.commit()
            .await
            .with_context(|| format!("Failed to commit last_campaign_at for customer {id}"))?;

        if result.rows_affected() == 0 {
            log::warn!(
                "(touch_last_campaign) El cliente {} desapareció antes de actualizar last_campaign_at",
                id
            );
        }
        Ok(())
    }
}
