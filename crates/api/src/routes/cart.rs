//! Cart endpoints.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::{Extension, Json};
use checkout::AddProductToCartInput;
use common::ProductId;
use serde::Deserialize;
use uuid::{Uuid, Variant, Version};

use crate::AppState;
use crate::auth::AuthenticatedCustomer;
use crate::error::ApiError;
use crate::response::SuccessBody;

const NOT_JSON_MESSAGE: &str = "content-type must be application/json.";

/// Body of `POST /add-product-to-cart`.
///
/// Both fields are optional here so that absent values surface as
/// validation messages instead of a deserialization failure.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddProductToCartRequest {
    pub product_id: Option<String>,
    pub quantity: Option<i32>,
}

impl AddProductToCartRequest {
    /// Checks every field, collecting one message per failing field in
    /// declaration order.
    pub fn validate(&self) -> Result<(ProductId, i32), Vec<String>> {
        let mut errors = Vec::new();

        let product_id = match self.product_id.as_deref() {
            None => {
                errors.push("productId is required".to_string());
                None
            }
            Some(raw) => {
                let parsed = parse_uuid_v4(raw);
                if parsed.is_none() {
                    errors.push("productId must be uuidv4".to_string());
                }
                parsed.map(ProductId::from_uuid)
            }
        };

        let quantity = match self.quantity {
            None => {
                errors.push("quantity is required".to_string());
                None
            }
            Some(quantity) if quantity < 1 => {
                errors.push("quantity must be greater than or equal to 1".to_string());
                None
            }
            Some(quantity) => Some(quantity),
        };

        match (product_id, quantity) {
            (Some(product_id), Some(quantity)) => Ok((product_id, quantity)),
            _ => Err(errors),
        }
    }
}

fn parse_uuid_v4(raw: &str) -> Option<Uuid> {
    if raw.len() != 36 {
        return None;
    }
    Uuid::parse_str(raw)
        .ok()
        .filter(|uuid| uuid.get_version() == Some(Version::Random))
        .filter(|uuid| uuid.get_variant() == Variant::RFC4122)
}

/// POST /add-product-to-cart: add a product to the caller's cart.
#[tracing::instrument(skip(state, customer, payload), fields(customer_id = %customer.0))]
pub async fn add_product_to_cart(
    State(state): State<Arc<AppState>>,
    Extension(customer): Extension<AuthenticatedCustomer>,
    payload: Result<Json<AddProductToCartRequest>, JsonRejection>,
) -> Result<Json<SuccessBody<()>>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection, "rejected request body");
        ApiError::Validation(vec![NOT_JSON_MESSAGE.to_string()])
    })?;

    let (product_id, quantity) = request.validate().map_err(ApiError::Validation)?;

    state
        .add_product_to_cart
        .execute(AddProductToCartInput::new(customer.0, product_id, quantity))
        .await?;

    Ok(Json(SuccessBody::ok(())))
}
