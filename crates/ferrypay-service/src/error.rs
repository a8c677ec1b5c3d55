//! API error types and responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use ferrypay_client::ClientError;
use ferrypay_core::{SigningError, ValidationError};

/// API error type.
///
/// Serialized as `{"error": CODE, "message": msg}`, the shape the booking
/// front end already understands.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Bad request - invalid input.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Webhook authenticity check failed.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// The processor rejected the request or could not be reached.
    #[error("payment failed: {0}")]
    PaymentFailed(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

/// JSON error response body.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: &'static str,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, "INVALID_REQUEST", msg),
            Self::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "INVALID_REQUEST", msg),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, "RESOURCE_NOT_FOUND", msg),
            Self::PaymentFailed(msg) => (StatusCode::BAD_GATEWAY, "PAYMENT_FAILED", msg),
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "SYSTEM_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        (status, Json(ErrorResponse { error: code, message })).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl From<SigningError> for ApiError {
    fn from(err: SigningError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl From<ClientError> for ApiError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Validation(e) => e.into(),
            ClientError::Signing(e) => e.into(),
            ClientError::Api { message, .. } => Self::PaymentFailed(message),
            ClientError::Http(e) => {
                tracing::warn!(error = %e, "Payment processor unreachable");
                Self::PaymentFailed("Payment processor unavailable".into())
            }
            ClientError::Serialization(e) => {
                tracing::warn!(error = %e, "Unreadable payment processor response");
                Self::PaymentFailed("Invalid response from payment processor".into())
            }
            ClientError::Configuration(msg) => Self::Internal(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn render(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn validation_error_maps_to_invalid_request() {
        let (status, body) = render(ValidationError::missing("order_id").into()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "INVALID_REQUEST");
        assert_eq!(body["message"], "Missing required field: order_id");
    }

    #[tokio::test]
    async fn internal_error_hides_details() {
        let (status, body) = render(ApiError::Internal("db password wrong".into())).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "SYSTEM_ERROR");
        assert_eq!(body["message"], "An internal error occurred");
    }

    #[tokio::test]
    async fn processor_rejection_maps_to_payment_failed() {
        let err = ClientError::Api {
            code: "INVALID_REQUEST".into(),
            message: "Card declined".into(),
            status: 400,
        };
        let (status, body) = render(err.into()).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"], "PAYMENT_FAILED");
        assert_eq!(body["message"], "Card declined");
    }
}
