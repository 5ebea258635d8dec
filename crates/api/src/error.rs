//! API error types with HTTP response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use checkout::{CheckoutError, ErrorKind};

use crate::auth::AuthError;
use crate::response::{ErrorBody, ValidationErrorBody};

const INTERNAL_ERROR_MESSAGE: &str = "Something went wrong. Please try again later.";

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// The request body failed validation.
    Validation(Vec<String>),
    /// Authentication or authorization failed.
    Auth(AuthError),
    /// The use case failed.
    Checkout(CheckoutError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Auth(AuthError::Forbidden) => StatusCode::FORBIDDEN,
            ApiError::Auth(_) => StatusCode::UNAUTHORIZED,
            ApiError::Checkout(err) => match err.kind() {
                ErrorKind::CustomerNotFound | ErrorKind::ProductNotFound => StatusCode::NOT_FOUND,
                ErrorKind::NegativeValue
                | ErrorKind::QuantityBelowMinimum
                | ErrorKind::CartEmpty
                | ErrorKind::ProductNotInCart => StatusCode::UNPROCESSABLE_ENTITY,
                ErrorKind::TransportFailure => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ApiError::Validation(errors) => {
                return (status, Json(ValidationErrorBody::new(errors))).into_response();
            }
            ApiError::Auth(err) => err.to_string(),
            ApiError::Checkout(err) => checkout_error_message(&err),
        };

        (status, Json(ErrorBody::new(status, message))).into_response()
    }
}

fn checkout_error_message(err: &CheckoutError) -> String {
    match err {
        CheckoutError::ProductNotFound(product_id) => format!(
            "We couldn't find a product with the ID '{product_id}'. Please check the product ID and try again."
        ),
        CheckoutError::CustomerNotFound(customer_id) => {
            format!("We couldn't find a customer with the ID '{customer_id}'.")
        }
        CheckoutError::Domain(domain_err) => domain_err.to_string(),
        CheckoutError::Transport(_) => {
            tracing::error!(error = %err, "internal server error");
            INTERNAL_ERROR_MESSAGE.to_string()
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::Auth(err)
    }
}

impl From<CheckoutError> for ApiError {
    fn from(err: CheckoutError) -> Self {
        ApiError::Checkout(err)
    }
}
