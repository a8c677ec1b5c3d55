//! API handlers.

pub mod health;
pub mod payments;
pub mod status;
pub mod webhooks;

use ferrypay_core::Payload;
use serde_json::Value;

use crate::error::ApiError;

/// Parse a request body into a flat payload.
///
/// Bodies are taken as raw bytes so that malformed JSON gets the same error
/// shape as every other rejection.
pub(crate) fn parse_payload(body: &[u8]) -> Result<Payload, ApiError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| ApiError::BadRequest(format!("Invalid JSON body: {e}")))?;

    Payload::try_from(value)
        .map_err(|_| ApiError::BadRequest("Request body must be a JSON object".into()))
}
