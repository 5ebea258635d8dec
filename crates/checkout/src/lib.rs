//! Checkout use cases for the shopping cart system.
//!
//! The `AddProductToCart` use case turns a request into cart mutations plus a
//! single persistence call:
//! 1. Check that the customer exists
//! 2. Resolve the product's current unit price
//! 3. Load the customer's cart, or start a new one
//! 4. Add the item and persist (update for a loaded cart, create for a new one)
//!
//! Collaborators are reached only through the port traits in [`ports`].

pub mod add_product_to_cart;
pub mod error;
pub mod ports;

pub use add_product_to_cart::{AddProductToCart, AddProductToCartInput, AddProductToCartUseCase};
pub use error::{CheckoutError, ErrorKind, PortError};
pub use ports::{
    CartRepository, CustomerGateway, InMemoryCartRepository, InMemoryCustomerGateway,
    InMemoryProductGateway, Product, ProductGateway,
};
