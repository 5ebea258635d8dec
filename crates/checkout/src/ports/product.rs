//! Product lookup port and in-memory implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::ProductId;
use domain::Money;
use tokio::sync::RwLock;

use crate::error::PortError;

/// A catalog product as seen by checkout: its id and current unit price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Product {
    pub id: ProductId,
    pub unit_price: Money,
}

/// Resolves products to their current unit price.
#[async_trait]
pub trait ProductGateway: Send + Sync {
    /// Returns the product, or `None` if the catalog has no such product.
    async fn find_by_id(&self, product_id: ProductId) -> Result<Option<Product>, PortError>;
}

#[derive(Debug, Default)]
struct InMemoryProductState {
    products: HashMap<ProductId, Product>,
    fail_on_lookup: bool,
}

/// In-memory product catalog.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProductGateway {
    state: Arc<RwLock<InMemoryProductState>>,
}

impl InMemoryProductGateway {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a product.
    pub async fn insert(&self, product: Product) {
        self.state
            .write()
            .await
            .products
            .insert(product.id, product);
    }

    /// Makes every lookup fail with a transport error.
    pub async fn set_fail_on_lookup(&self, fail: bool) {
        self.state.write().await.fail_on_lookup = fail;
    }
}

#[async_trait]
impl ProductGateway for InMemoryProductGateway {
    async fn find_by_id(&self, product_id: ProductId) -> Result<Option<Product>, PortError> {
        let state = self.state.read().await;

        if state.fail_on_lookup {
            return Err(PortError::new("product catalog unavailable"));
        }

        Ok(state.products.get(&product_id).copied())
    }
}
