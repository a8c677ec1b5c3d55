//! mPAY ONE webhook handler.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use serde::Serialize;

use super::parse_payload;
use crate::error::ApiError;
use crate::state::AppState;

/// Webhook acknowledgement.
#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    /// Always `SUCCESS`.
    pub status: &'static str,
    /// Human-readable message.
    pub message: &'static str,
}

/// Handle asynchronous payment notifications.
///
/// The notification is authenticated by its embedded `signature` before
/// anything is recorded. Rejections never reveal the expected signature.
pub async fn mpay_webhook(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<WebhookResponse>, ApiError> {
    let payload = parse_payload(&body)?;

    let authentic = state.verifier.verify_embedded(&payload).map_err(|e| {
        tracing::warn!(error = %e, "Unsupported webhook payload");
        ApiError::BadRequest("Unsupported webhook payload".into())
    })?;

    if !authentic {
        return Err(ApiError::Unauthorized("Webhook rejected".into()));
    }

    let order_id = payload
        .get_str("order_id")
        .ok_or_else(|| ApiError::BadRequest("Missing required field: order_id".into()))?;

    let status = state
        .payments
        .record(order_id, payload.without_signature())
        .await;

    tracing::info!(
        order_id = %order_id,
        payment_status = status.fields.get_str("status").unwrap_or("-"),
        "Webhook accepted"
    );

    Ok(Json(WebhookResponse {
        status: "SUCCESS",
        message: "Webhook received",
    }))
}
