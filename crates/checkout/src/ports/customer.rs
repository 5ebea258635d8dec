//! Customer existence port and in-memory implementation.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use common::CustomerId;
use tokio::sync::RwLock;

use crate::error::PortError;

/// Answers whether a customer exists.
#[async_trait]
pub trait CustomerGateway: Send + Sync {
    /// Returns true if the customer is known.
    async fn exists(&self, customer_id: CustomerId) -> Result<bool, PortError>;
}

#[derive(Debug, Default)]
struct InMemoryCustomerState {
    customers: HashSet<CustomerId>,
    fail_on_lookup: bool,
}

/// In-memory customer directory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCustomerGateway {
    state: Arc<RwLock<InMemoryCustomerState>>,
}

impl InMemoryCustomerGateway {
    /// Creates an empty customer directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a customer.
    pub async fn register(&self, customer_id: CustomerId) {
        self.state.write().await.customers.insert(customer_id);
    }

    /// Makes every lookup fail with a transport error.
    pub async fn set_fail_on_lookup(&self, fail: bool) {
        self.state.write().await.fail_on_lookup = fail;
    }
}

#[async_trait]
impl CustomerGateway for InMemoryCustomerGateway {
    async fn exists(&self, customer_id: CustomerId) -> Result<bool, PortError> {
        let state = self.state.read().await;

        if state.fail_on_lookup {
            return Err(PortError::new("customer directory unavailable"));
        }

        Ok(state.customers.contains(&customer_id))
    }
}
