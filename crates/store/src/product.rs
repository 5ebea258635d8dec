use async_trait::async_trait;
use checkout::{PortError, Product, ProductGateway};
use common::ProductId;
use domain::Money;
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::db_error;

/// PostgreSQL-backed product catalog.
#[derive(Clone)]
pub struct PostgresProductGateway {
    pool: PgPool,
}

impl PostgresProductGateway {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_product(row: PgRow) -> Result<Product, PortError> {
        let id: Uuid = row.try_get("id").map_err(db_error("read product row"))?;
        let price: i64 = row.try_get("price").map_err(db_error("read product row"))?;
        let unit_price = Money::new(price)
            .map_err(|e| PortError::with_source(format!("product {id} has an invalid price"), e))?;

        Ok(Product {
            id: ProductId::from_uuid(id),
            unit_price,
        })
    }
}

#[async_trait]
impl ProductGateway for PostgresProductGateway {
    async fn find_by_id(&self, product_id: ProductId) -> Result<Option<Product>, PortError> {
        let row: Option<PgRow> = sqlx::query("SELECT id, price FROM products WHERE id = $1")
            .bind(product_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("load product"))?;

        row.map(Self::row_to_product).transpose()
    }
}
