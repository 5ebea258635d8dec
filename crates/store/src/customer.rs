use async_trait::async_trait;
use checkout::{CustomerGateway, PortError};
use common::CustomerId;
use sqlx::PgPool;

use crate::db_error;

/// PostgreSQL-backed customer directory.
#[derive(Clone)]
pub struct PostgresCustomerGateway {
    pool: PgPool,
}

impl PostgresCustomerGateway {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CustomerGateway for PostgresCustomerGateway {
    async fn exists(&self, customer_id: CustomerId) -> Result<bool, PortError> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM customers WHERE id = $1)")
            .bind(customer_id.as_uuid())
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("check customer"))
    }
}
