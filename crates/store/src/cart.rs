use async_trait::async_trait;
use checkout::{CartRepository, PortError};
use common::{CartId, CartItemId, CustomerId, ProductId};
use domain::{Cart, CartItem, Money, Quantity};
use sqlx::{PgPool, Postgres, Row, Transaction, postgres::PgRow};
use uuid::Uuid;

use crate::db_error;

/// PostgreSQL-backed cart repository.
///
/// A cart row carries its derived totals; items live in `cart_items` and keep
/// their insertion order through the `position` column. Writes run inside a
/// single transaction.
#[derive(Clone)]
pub struct PostgresCartRepository {
    pool: PgPool,
}

impl PostgresCartRepository {
    /// Creates a new PostgreSQL cart repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn row_to_item(row: PgRow) -> Result<CartItem, PortError> {
        let id: Uuid = row.try_get("id").map_err(db_error("read cart item row"))?;
        let product_id: Uuid = row
            .try_get("product_id")
            .map_err(db_error("read cart item row"))?;
        let quantity: i64 = row
            .try_get("quantity")
            .map_err(db_error("read cart item row"))?;
        let unit_price: i64 = row
            .try_get("unit_price")
            .map_err(db_error("read cart item row"))?;

        let quantity = u32::try_from(quantity)
            .map(Quantity::from)
            .map_err(|e| PortError::with_source(format!("cart item {id} has an invalid quantity"), e))?;
        let unit_price = Money::new(unit_price)
            .map_err(|e| PortError::with_source(format!("cart item {id} has an invalid price"), e))?;

        Ok(CartItem::restore(
            CartItemId::from_uuid(id),
            ProductId::from_uuid(product_id),
            quantity,
            unit_price,
        ))
    }

    async fn insert_items(
        tx: &mut Transaction<'_, Postgres>,
        cart: &Cart,
    ) -> Result<(), PortError> {
        for (position, item) in cart.items().iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO cart_items (id, cart_id, product_id, position, quantity, unit_price)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(item.id().as_uuid())
            .bind(cart.id().as_uuid())
            .bind(item.product_id().as_uuid())
            .bind(position as i64)
            .bind(i64::from(item.quantity().value()))
            .bind(item.unit_price().cents())
            .execute(&mut **tx)
            .await
            .map_err(db_error("insert cart item"))?;
        }

        Ok(())
    }
}

#[async_trait]
impl CartRepository for PostgresCartRepository {
    async fn find_by_customer_id(&self, customer_id: CustomerId) -> Result<Option<Cart>, PortError> {
        let cart_id: Option<Uuid> =
            sqlx::query_scalar("SELECT id FROM carts WHERE customer_id = $1")
                .bind(customer_id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error("load cart"))?;

        let Some(cart_id) = cart_id else {
            return Ok(None);
        };

        let rows = sqlx::query(
            r#"
            SELECT id, product_id, quantity, unit_price
            FROM cart_items
            WHERE cart_id = $1
            ORDER BY position ASC
            "#,
        )
        .bind(cart_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("load cart items"))?;

        let items = rows
            .into_iter()
            .map(Self::row_to_item)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(Cart::restore(
            CartId::from_uuid(cart_id),
            customer_id,
            items,
        )))
    }

    async fn create(&self, cart: &Cart) -> Result<(), PortError> {
        let mut tx = self.pool.begin().await.map_err(db_error("begin transaction"))?;

        sqlx::query(
            r#"
            INSERT INTO carts (id, customer_id, total_price, total_quantity)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(cart.id().as_uuid())
        .bind(cart.customer_id().as_uuid())
        .bind(cart.total_price().cents())
        .bind(i64::from(cart.total_quantity().value()))
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            let duplicate = matches!(
                &e,
                sqlx::Error::Database(db_err) if db_err.constraint() == Some("unique_customer_cart")
            );
            if duplicate {
                return PortError::with_source(
                    format!("customer {} already has a cart", cart.customer_id()),
                    e,
                );
            }
            db_error("insert cart")(e)
        })?;

        Self::insert_items(&mut tx, cart).await?;

        tx.commit().await.map_err(db_error("commit cart"))?;
        tracing::debug!(cart_id = %cart.id(), items = cart.item_count(), "cart inserted");
        Ok(())
    }

    async fn update(&self, cart: &Cart) -> Result<(), PortError> {
        let mut tx = self.pool.begin().await.map_err(db_error("begin transaction"))?;

        let updated = sqlx::query(
            r#"
            UPDATE carts
            SET total_price = $1, total_quantity = $2, updated_at = NOW()
            WHERE id = $3
            "#,
        )
        .bind(cart.total_price().cents())
        .bind(i64::from(cart.total_quantity().value()))
        .bind(cart.id().as_uuid())
        .execute(&mut *tx)
        .await
        .map_err(db_error("update cart"))?;

        if updated.rows_affected() == 0 {
            return Err(PortError::new(format!("cart {} not found", cart.id())));
        }

        sqlx::query("DELETE FROM cart_items WHERE cart_id = $1")
            .bind(cart.id().as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(db_error("clear cart items"))?;

        Self::insert_items(&mut tx, cart).await?;

        tx.commit().await.map_err(db_error("commit cart"))?;
        tracing::debug!(cart_id = %cart.id(), items = cart.item_count(), "cart rewritten");
        Ok(())
    }
}
