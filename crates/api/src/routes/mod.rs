//! HTTP route handlers.

pub mod cart;
pub mod system;
