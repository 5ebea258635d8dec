//! Cart aggregate and its line items.

mod aggregate;
mod item;

pub use aggregate::Cart;
pub use item::{CartItem, MINIMUM_QUANTITY};
