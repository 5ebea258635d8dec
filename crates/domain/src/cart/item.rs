//! Cart line item.

use common::{CartItemId, ProductId};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_objects::{Money, Quantity};

/// Smallest quantity an item can be created with or changed by.
pub const MINIMUM_QUANTITY: u32 = 1;

/// A single product line inside a cart.
///
/// Items are owned by exactly one [`Cart`](super::Cart) and reference their
/// product only by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    id: CartItemId,
    product_id: ProductId,
    quantity: Quantity,
    unit_price: Money,
}

impl CartItem {
    /// Creates a new item with a fresh id.
    ///
    /// Fails with [`DomainError::NegativeValue`] for a negative quantity or
    /// price, and with [`DomainError::QuantityBelowMinimum`] for zero units.
    pub fn new(product_id: ProductId, quantity: i32, unit_price: i64) -> Result<Self, DomainError> {
        let quantity = Quantity::new(quantity)?;
        let unit_price = Money::new(unit_price)?;
        ensure_minimum(quantity)?;

        Ok(Self {
            id: CartItemId::new(),
            product_id,
            quantity,
            unit_price,
        })
    }

    /// Rebuilds an item from persisted state without re-applying creation rules.
    pub fn restore(
        id: CartItemId,
        product_id: ProductId,
        quantity: Quantity,
        unit_price: Money,
    ) -> Self {
        Self {
            id,
            product_id,
            quantity,
            unit_price,
        }
    }

    pub fn id(&self) -> CartItemId {
        self.id
    }

    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    /// Adds `delta` units. There is no upper bound besides saturation.
    pub fn increase_quantity(&mut self, delta: i32) -> Result<(), DomainError> {
        let delta = validate_delta(delta)?;
        self.quantity = self.quantity + delta;
        Ok(())
    }

    /// Removes `delta` units.
    ///
    /// Removing more units than the item holds is not an error: quantity and
    /// unit price both drop to zero.
    pub fn decrease_quantity(&mut self, delta: i32) -> Result<(), DomainError> {
        let delta = validate_delta(delta)?;

        match self.quantity.value().checked_sub(delta.value()) {
            Some(remaining) => self.quantity = Quantity::from(remaining),
            None => {
                self.quantity = Quantity::zero();
                self.unit_price = Money::zero();
            }
        }

        Ok(())
    }

    /// Returns `unit_price * quantity`.
    pub fn total_price(&self) -> Money {
        self.unit_price.multiply(self.quantity)
    }
}

fn validate_delta(delta: i32) -> Result<Quantity, DomainError> {
    let delta = Quantity::new(delta)?;
    ensure_minimum(delta)?;
    Ok(delta)
}

fn ensure_minimum(quantity: Quantity) -> Result<(), DomainError> {
    if quantity.value() < MINIMUM_QUANTITY {
        return Err(DomainError::QuantityBelowMinimum {
            quantity: quantity.value(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(quantity: i32, price: i64) -> CartItem {
        CartItem::new(ProductId::new(), quantity, price).unwrap()
    }

    #[test]
    fn test_new_item_computes_total_price() {
        for (quantity, price) in [(1, 0), (2, 2550), (3, 3550), (10, 1)] {
            let item = item(quantity, price);
            assert_eq!(item.quantity().value(), quantity as u32);
            assert_eq!(item.unit_price().cents(), price);
            assert_eq!(item.total_price().cents(), price * i64::from(quantity));
        }
    }

    #[test]
    fn test_new_items_get_distinct_ids() {
        let product_id = ProductId::new();
        let a = CartItem::new(product_id, 1, 100).unwrap();
        let b = CartItem::new(product_id, 1, 100).unwrap();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_new_rejects_zero_quantity() {
        assert_eq!(
            CartItem::new(ProductId::new(), 0, 100),
            Err(DomainError::QuantityBelowMinimum { quantity: 0 })
        );
    }

    #[test]
    fn test_new_rejects_negative_values() {
        assert!(matches!(
            CartItem::new(ProductId::new(), -1, 100),
            Err(DomainError::NegativeValue {
                value_object: "quantity",
                ..
            })
        ));
        assert!(matches!(
            CartItem::new(ProductId::new(), 1, -100),
            Err(DomainError::NegativeValue {
                value_object: "money",
                ..
            })
        ));
    }

    #[test]
    fn test_increase_quantity() {
        let mut item = item(2, 1000);
        item.increase_quantity(3).unwrap();
        assert_eq!(item.quantity().value(), 5);
        assert_eq!(item.total_price().cents(), 5000);
    }

    #[test]
    fn test_increase_rejects_invalid_delta() {
        let mut item = item(2, 1000);
        assert_eq!(
            item.increase_quantity(0),
            Err(DomainError::QuantityBelowMinimum { quantity: 0 })
        );
        assert!(matches!(
            item.increase_quantity(-4),
            Err(DomainError::NegativeValue { .. })
        ));
        assert_eq!(item.quantity().value(), 2);
    }

    #[test]
    fn test_decrease_quantity() {
        let mut item = item(5, 1000);
        item.decrease_quantity(2).unwrap();
        assert_eq!(item.quantity().value(), 3);
        assert_eq!(item.unit_price().cents(), 1000);
    }

    #[test]
    fn test_decrease_to_exactly_zero_keeps_price() {
        let mut item = item(2, 1000);
        item.decrease_quantity(2).unwrap();
        assert!(item.quantity().is_zero());
        assert_eq!(item.unit_price().cents(), 1000);
        assert!(item.total_price().is_zero());
    }

    #[test]
    fn test_decrease_below_zero_floors_quantity_and_price() {
        let mut item = item(2, 1000);
        item.decrease_quantity(7).unwrap();
        assert!(item.quantity().is_zero());
        assert!(item.unit_price().is_zero());
    }

    #[test]
    fn test_decrease_rejects_invalid_delta() {
        let mut item = item(2, 1000);
        assert_eq!(
            item.decrease_quantity(0),
            Err(DomainError::QuantityBelowMinimum { quantity: 0 })
        );
        assert!(item.decrease_quantity(-1).is_err());
        assert_eq!(item.quantity().value(), 2);
    }

    #[test]
    fn test_increase_then_decrease_restores_item() {
        for (start, delta) in [(1, 1), (3, 5), (10, 2)] {
            let original = item(start, 1299);
            let mut changed = original.clone();
            changed.increase_quantity(delta).unwrap();
            changed.decrease_quantity(delta).unwrap();
            assert_eq!(changed, original);
        }
    }

    #[test]
    fn test_restore_preserves_fields() {
        let id = CartItemId::new();
        let product_id = ProductId::new();
        let item = CartItem::restore(
            id,
            product_id,
            Quantity::from(4),
            Money::new(250).unwrap(),
        );
        assert_eq!(item.id(), id);
        assert_eq!(item.product_id(), product_id);
        assert_eq!(item.total_price().cents(), 1000);
    }
}
