//! Shared types for the shopping cart system.

pub mod types;

pub use types::{CartId, CartItemId, CustomerId, ProductId};
