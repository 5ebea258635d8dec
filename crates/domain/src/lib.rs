//! Domain layer for the shopping cart system.
//!
//! This crate provides the cart consistency boundary:
//! - `Money` and `Quantity` value objects
//! - `CartItem` line items with quantity arithmetic
//! - `Cart` aggregate root enforcing one line per product

pub mod cart;
pub mod error;
pub mod value_objects;

pub use cart::{Cart, CartItem, MINIMUM_QUANTITY};
pub use common::{CartId, CartItemId, CustomerId, ProductId};
pub use error::DomainError;
pub use value_objects::{Money, Quantity};
