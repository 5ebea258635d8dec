//! Checkout error types.

use common::{CustomerId, ProductId};
use domain::DomainError;
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A failure surfaced by a port adapter (network, database, ...).
///
/// The use case forwards these unchanged and never retries.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct PortError {
    message: String,
    #[source]
    source: Option<BoxError>,
}

impl PortError {
    /// Creates a port error with a message only.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a port error wrapping the adapter's own error.
    pub fn with_source(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors returned by checkout use cases.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The customer port reported no such customer.
    #[error("Customer not found: {0}")]
    CustomerNotFound(CustomerId),

    /// The product port returned no product.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// The cart rejected the mutation.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// A port failed.
    #[error(transparent)]
    Transport(#[from] PortError),
}

/// Closed classification of every checkout failure.
///
/// Callers branch on this to pick a response, e.g. an HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NegativeValue,
    QuantityBelowMinimum,
    CartEmpty,
    ProductNotInCart,
    CustomerNotFound,
    ProductNotFound,
    TransportFailure,
}

impl ErrorKind {
    /// Returns the kind as a snake_case label.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NegativeValue => "negative_value",
            ErrorKind::QuantityBelowMinimum => "quantity_below_minimum",
            ErrorKind::CartEmpty => "cart_empty",
            ErrorKind::ProductNotInCart => "product_not_in_cart",
            ErrorKind::CustomerNotFound => "customer_not_found",
            ErrorKind::ProductNotFound => "product_not_found",
            ErrorKind::TransportFailure => "transport_failure",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl CheckoutError {
    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CheckoutError::CustomerNotFound(_) => ErrorKind::CustomerNotFound,
            CheckoutError::ProductNotFound(_) => ErrorKind::ProductNotFound,
            CheckoutError::Transport(_) => ErrorKind::TransportFailure,
            CheckoutError::Domain(err) => match err {
                DomainError::NegativeValue { .. } => ErrorKind::NegativeValue,
                DomainError::QuantityBelowMinimum { .. } => ErrorKind::QuantityBelowMinimum,
                DomainError::CartEmpty => ErrorKind::CartEmpty,
                DomainError::ProductNotInCart { .. } => ErrorKind::ProductNotInCart,
            },
        }
    }
}
