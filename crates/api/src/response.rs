//! JSON response envelopes shared by every endpoint.

use axum::http::StatusCode;
use serde::Serialize;

/// `{"status":"SUCCESS","statusCode":200,"statusText":"OK","data":...}`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuccessBody<T> {
    pub status: &'static str,
    pub status_code: u16,
    pub status_text: String,
    pub data: T,
}

impl<T: Serialize> SuccessBody<T> {
    pub fn ok(data: T) -> Self {
        Self {
            status: "SUCCESS",
            status_code: StatusCode::OK.as_u16(),
            status_text: status_text(StatusCode::OK),
            data,
        }
    }
}

/// An error envelope carrying a single message.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub status: &'static str,
    pub status_code: u16,
    pub status_text: String,
    pub error: String,
}

impl ErrorBody {
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            status: "ERROR",
            status_code: status.as_u16(),
            status_text: status_text(status),
            error: error.into(),
        }
    }
}

/// An error envelope listing every validation failure.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationErrorBody {
    pub status: &'static str,
    pub status_code: u16,
    pub status_text: String,
    pub errors: Vec<String>,
}

impl ValidationErrorBody {
    pub fn new(errors: Vec<String>) -> Self {
        Self {
            status: "ERROR",
            status_code: StatusCode::BAD_REQUEST.as_u16(),
            status_text: status_text(StatusCode::BAD_REQUEST),
            errors,
        }
    }
}

/// Upper snake case reason phrase, e.g. `NOT_FOUND`.
pub fn status_text(status: StatusCode) -> String {
    status
        .canonical_reason()
        .unwrap_or("UNKNOWN")
        .to_ascii_uppercase()
        .replace([' ', '-'], "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_text() {
        assert_eq!(status_text(StatusCode::OK), "OK");
        assert_eq!(status_text(StatusCode::BAD_REQUEST), "BAD_REQUEST");
        assert_eq!(status_text(StatusCode::FORBIDDEN), "FORBIDDEN");
        assert_eq!(
            status_text(StatusCode::UNPROCESSABLE_ENTITY),
            "UNPROCESSABLE_ENTITY"
        );
        assert_eq!(
            status_text(StatusCode::INTERNAL_SERVER_ERROR),
            "INTERNAL_SERVER_ERROR"
        );
    }

    #[test]
    fn test_success_envelope_with_no_data() {
        let json = serde_json::to_value(SuccessBody::ok(())).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "status": "SUCCESS",
                "statusCode": 200,
                "statusText": "OK",
                "data": null
            })
        );
    }

    #[test]
    fn test_error_envelope() {
        let json = serde_json::to_value(ErrorBody::new(StatusCode::NOT_FOUND, "gone")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "status": "ERROR",
                "statusCode": 404,
                "statusText": "NOT_FOUND",
                "error": "gone"
            })
        );
    }
}
