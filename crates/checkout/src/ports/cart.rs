//! Cart persistence port and in-memory implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::CustomerId;
use domain::Cart;
use tokio::sync::RwLock;

use crate::error::PortError;

/// Loads and stores cart aggregates.
///
/// Implementations must keep at most one cart per customer and write a cart
/// together with all its items atomically.
#[async_trait]
pub trait CartRepository: Send + Sync {
    /// Returns the customer's cart, or `None` if they have none yet.
    async fn find_by_customer_id(&self, customer_id: CustomerId) -> Result<Option<Cart>, PortError>;

    /// Stores a cart that has never been persisted.
    async fn create(&self, cart: &Cart) -> Result<(), PortError>;

    /// Replaces a previously stored cart.
    async fn update(&self, cart: &Cart) -> Result<(), PortError>;
}

#[derive(Debug, Default)]
struct InMemoryCartState {
    carts: HashMap<CustomerId, Cart>,
    create_calls: usize,
    update_calls: usize,
    fail_on_write: bool,
}

/// In-memory cart store keyed by customer.
///
/// Counts create and update calls so callers can assert which persistence
/// path was taken.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCartRepository {
    state: Arc<RwLock<InMemoryCartState>>,
}

impl InMemoryCartRepository {
    /// Creates an empty cart store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a cart directly, bypassing the call counters.
    pub async fn seed(&self, cart: Cart) {
        self.state
            .write()
            .await
            .carts
            .insert(cart.customer_id(), cart);
    }

    /// Returns the stored cart for a customer.
    pub async fn get(&self, customer_id: CustomerId) -> Option<Cart> {
        self.state.read().await.carts.get(&customer_id).cloned()
    }

    /// Returns the number of stored carts.
    pub async fn cart_count(&self) -> usize {
        self.state.read().await.carts.len()
    }

    /// Returns how many times `create` was called.
    pub async fn create_calls(&self) -> usize {
        self.state.read().await.create_calls
    }

    /// Returns how many times `update` was called.
    pub async fn update_calls(&self) -> usize {
        self.state.read().await.update_calls
    }

    /// Makes every create and update fail with a transport error.
    pub async fn set_fail_on_write(&self, fail: bool) {
        self.state.write().await.fail_on_write = fail;
    }
}

#[async_trait]
impl CartRepository for InMemoryCartRepository {
    async fn find_by_customer_id(&self, customer_id: CustomerId) -> Result<Option<Cart>, PortError> {
        Ok(self.get(customer_id).await)
    }

    async fn create(&self, cart: &Cart) -> Result<(), PortError> {
        let mut state = self.state.write().await;
        state.create_calls += 1;

        if state.fail_on_write {
            return Err(PortError::new("cart store unavailable"));
        }

        // Unique (customer_id) constraint simulation
        if state.carts.contains_key(&cart.customer_id()) {
            return Err(PortError::new(format!(
                "customer {} already has a cart",
                cart.customer_id()
            )));
        }

        state.carts.insert(cart.customer_id(), cart.clone());
        Ok(())
    }

    async fn update(&self, cart: &Cart) -> Result<(), PortError> {
        let mut state = self.state.write().await;
        state.update_calls += 1;

        if state.fail_on_write {
            return Err(PortError::new("cart store unavailable"));
        }

        match state.carts.get_mut(&cart.customer_id()) {
            Some(stored) if stored.id() == cart.id() => {
                *stored = cart.clone();
                Ok(())
            }
            _ => Err(PortError::new(format!("cart {} not found", cart.id()))),
        }
    }
}
