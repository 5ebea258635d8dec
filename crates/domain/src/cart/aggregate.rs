//! Cart aggregate root.

use common::{CartId, CustomerId, ProductId};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_objects::{Money, Quantity};

use super::CartItem;

/// Shopping cart aggregate root.
///
/// A cart belongs to one customer and holds at most one [`CartItem`] per
/// product. Adding a product that is already present grows the existing
/// line instead of appending a duplicate. Items keep their insertion order.
///
/// The cart never persists itself; loading and saving is the job of the
/// cart repository port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    id: CartId,
    customer_id: CustomerId,
    items: Vec<CartItem>,
}

impl Cart {
    /// Creates an empty cart for a customer.
    pub fn new(customer_id: CustomerId) -> Self {
        Self {
            id: CartId::new(),
            customer_id,
            items: Vec::new(),
        }
    }

    /// Rebuilds a cart from persisted state.
    ///
    /// The caller is trusted to supply at most one item per product.
    pub fn restore(id: CartId, customer_id: CustomerId, items: Vec<CartItem>) -> Self {
        Self {
            id,
            customer_id,
            items,
        }
    }
}

// Query methods
impl Cart {
    pub fn id(&self) -> CartId {
        self.id
    }

    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    /// Returns the items in insertion order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Returns the item for a product, if present.
    pub fn item(&self, product_id: ProductId) -> Option<&CartItem> {
        self.items
            .iter()
            .find(|item| item.product_id() == product_id)
    }

    /// Returns the number of distinct products.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the sum of all item quantities.
    pub fn total_quantity(&self) -> Quantity {
        self.items.iter().map(CartItem::quantity).sum()
    }

    /// Returns the sum of all item totals.
    pub fn total_price(&self) -> Money {
        self.items.iter().map(CartItem::total_price).sum()
    }
}

// Mutations
impl Cart {
    /// Adds `quantity` units of a product at `unit_price`.
    ///
    /// Both values are validated first. When the product is already in the
    /// cart its line grows by `quantity` and keeps its original unit price.
    pub fn add_item(
        &mut self,
        product_id: ProductId,
        quantity: i32,
        unit_price: i64,
    ) -> Result<(), DomainError> {
        Quantity::new(quantity)?;
        Money::new(unit_price)?;

        if let Some(existing) = self
            .items
            .iter_mut()
            .find(|item| item.product_id() == product_id)
        {
            tracing::debug!(cart_id = %self.id, %product_id, quantity, "merging into existing item");
            return existing.increase_quantity(quantity);
        }

        let item = CartItem::new(product_id, quantity, unit_price)?;
        self.items.push(item);
        Ok(())
    }

    /// Removes the line for a product and returns it.
    pub fn remove_item(&mut self, product_id: ProductId) -> Result<CartItem, DomainError> {
        if self.items.is_empty() {
            return Err(DomainError::CartEmpty);
        }

        let index = self
            .items
            .iter()
            .position(|item| item.product_id() == product_id)
            .ok_or(DomainError::ProductNotInCart { product_id })?;

        Ok(self.items.remove(index))
    }
}
