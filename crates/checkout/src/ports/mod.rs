//! Ports the checkout use cases reach collaborators through, with in-memory
//! adapters.

pub mod cart;
pub mod customer;
pub mod product;

pub use cart::{CartRepository, InMemoryCartRepository};
pub use customer::{CustomerGateway, InMemoryCustomerGateway};
pub use product::{InMemoryProductGateway, Product, ProductGateway};
