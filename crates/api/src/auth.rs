//! Bearer token authentication.
//!
//! Tokens are HS256 JWTs signed with the configured access token secret.
//! The `customerId` claim identifies the caller. The time claims `exp`,
//! `nbf` and `iat` are optional. Each one present must hold at verification
//! time.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Duration, Utc};
use common::CustomerId;
use hmac::digest::InvalidLength;
use hmac::{Hmac, Mac};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;
use uuid::Uuid;

use crate::AppState;
use crate::error::ApiError;

type HmacSha256 = Hmac<Sha256>;

/// Lifetime of tokens produced by [`issue_token`].
pub const TOKEN_TTL_MINUTES: i64 = 15;

/// The caller resolved from a verified token, stored as a request extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedCustomer(pub CustomerId);

/// Reasons a request fails authentication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Authorization token is missing.")]
    Missing,

    #[error("Invalid authorization token format.")]
    Malformed,

    #[error("Authorization token is invalid.")]
    Invalid,

    #[error("You do not have permission to access this resource.")]
    Forbidden,
}

impl AuthError {
    fn reason(&self) -> &'static str {
        match self {
            AuthError::Missing => "missing",
            AuthError::Malformed => "malformed",
            AuthError::Invalid => "invalid",
            AuthError::Forbidden => "forbidden",
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Header {
    alg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    typ: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Claims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    customer_id: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    exp: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    nbf: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    iat: Option<f64>,
}

impl Claims {
    fn is_current(&self, now: DateTime<Utc>) -> bool {
        let now = now.timestamp() as f64;
        self.exp.is_none_or(|exp| now <= exp)
            && self.nbf.is_none_or(|nbf| nbf <= now)
            && self.iat.is_none_or(|iat| iat <= now)
    }
}

/// Axum middleware that rejects unauthenticated requests and attaches the
/// [`AuthenticatedCustomer`] to the ones it lets through.
pub async fn require_customer(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let result = bearer_token(request.headers())
        .and_then(|token| verify_token(&state.auth_secret, token, Utc::now()));

    let customer_id = match result {
        Ok(customer_id) => customer_id,
        Err(err) => {
            tracing::warn!(reason = err.reason(), "request rejected by authentication");
            metrics::counter!("auth_rejected_total", "reason" => err.reason()).increment(1);
            return Err(err.into());
        }
    };

    request
        .extensions_mut()
        .insert(AuthenticatedCustomer(customer_id));
    Ok(next.run(request).await)
}

/// Extracts the raw token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers.get(AUTHORIZATION).ok_or(AuthError::Missing)?;
    let value = value.to_str().map_err(|_| AuthError::Malformed)?;
    if value.is_empty() {
        return Err(AuthError::Missing);
    }

    let mut parts = value.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("bearer") => Ok(token),
        _ => Err(AuthError::Malformed),
    }
}

/// Verifies a token's signature and time claims, returning the customer it names.
pub fn verify_token(secret: &str, token: &str, now: DateTime<Utc>) -> Result<CustomerId, AuthError> {
    let mut segments = token.split('.');
    let (Some(raw_header), Some(raw_payload), Some(raw_signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(AuthError::Invalid);
    };

    let header: Header = decode_segment(raw_header)?;
    if header.alg != "HS256" {
        return Err(AuthError::Invalid);
    }

    let signature = URL_SAFE_NO_PAD
        .decode(raw_signature)
        .map_err(|_| AuthError::Invalid)?;
    let signing_input = &token[..raw_header.len() + 1 + raw_payload.len()];
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| AuthError::Invalid)?;
    mac.update(signing_input.as_bytes());
    mac.verify_slice(&signature)
        .map_err(|_| AuthError::Invalid)?;

    let claims: Claims = decode_segment(raw_payload)?;
    if !claims.is_current(now) {
        return Err(AuthError::Invalid);
    }

    claims
        .customer_id
        .as_ref()
        .and_then(serde_json::Value::as_str)
        .and_then(|raw| Uuid::parse_str(raw).ok())
        .map(CustomerId::from_uuid)
        .ok_or(AuthError::Forbidden)
}

/// Signs a token for `customer_id` that expires [`TOKEN_TTL_MINUTES`] from now.
pub fn issue_token(secret: &str, customer_id: CustomerId) -> Result<String, InvalidLength> {
    let expires_at = Utc::now() + Duration::minutes(TOKEN_TTL_MINUTES);
    issue_token_expiring_at(secret, customer_id, expires_at)
}

/// Signs a token for `customer_id` with an explicit expiry.
pub fn issue_token_expiring_at(
    secret: &str,
    customer_id: CustomerId,
    expires_at: DateTime<Utc>,
) -> Result<String, InvalidLength> {
    let claims = Claims {
        customer_id: Some(serde_json::Value::String(customer_id.to_string())),
        exp: Some(expires_at.timestamp() as f64),
        nbf: None,
        iat: Some(Utc::now().timestamp() as f64),
    };
    sign(secret, &claims)
}

fn sign<T: Serialize>(secret: &str, claims: &T) -> Result<String, InvalidLength> {
    let header = Header {
        alg: "HS256".to_string(),
        typ: Some("JWT".to_string()),
    };
    let signing_input = format!("{}.{}", encode_segment(&header), encode_segment(claims));

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())?;
    mac.update(signing_input.as_bytes());
    let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

    Ok(format!("{signing_input}.{signature}"))
}

fn encode_segment<T: Serialize>(value: &T) -> String {
    // Serializing plain structs of strings and numbers cannot fail.
    let json = serde_json::to_vec(value).unwrap_or_default();
    URL_SAFE_NO_PAD.encode(json)
}

fn decode_segment<T: DeserializeOwned>(segment: &str) -> Result<T, AuthError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|_| AuthError::Invalid)?;
    serde_json::from_slice(&bytes).map_err(|_| AuthError::Invalid)
}
