//! Domain error types.

use common::ProductId;
use thiserror::Error;

/// Errors raised by the cart aggregate and its value objects.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// A money amount or quantity was constructed from a negative number.
    #[error("{value_object} value cannot be negative: {value}")]
    NegativeValue {
        value_object: &'static str,
        value: i64,
    },

    /// An item creation or quantity change was given fewer than one unit.
    #[error("Cart item quantity cannot be less than one (got {quantity})")]
    QuantityBelowMinimum { quantity: u32 },

    /// Removal attempted on a cart without items.
    #[error("Cart is empty")]
    CartEmpty,

    /// Removal attempted for a product the cart does not hold.
    #[error("Product not found in cart: {product_id}")]
    ProductNotInCart { product_id: ProductId },
}
