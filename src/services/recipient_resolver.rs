use std::sync::Arc;

use anyhow::Result;

use crate::{models::customer_model::Customer, services::customer_service::CustomerStore};

/// Traduce el id de un destinatario de la petición a su registro de cliente.
#[derive(Clone)]
pub struct RecipientResolver {
    customers: Arc<dyn CustomerStore>,
}

impl RecipientResolver {
    pub fn new(customers: Arc<dyn CustomerStore>) -> Self {
        Self { customers }
    }

    /// Los ids desconocidos resuelven a `None`; solo los fallos del store son errores.
    pub async fn resolve(&self, id: i64) -> Result<Option<Customer>> {
        self.customers.get(id).await
    }
}
