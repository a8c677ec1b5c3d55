//! Response types of the mPAY ONE API.

use serde::{Deserialize, Serialize};

/// Status value the processor uses for accepted requests.
pub const STATUS_SUCCESS: &str = "SUCCESS";

/// A successful processor response.
///
/// Only the common envelope is typed; method-specific fields (redirect URL,
/// QR payload, refund ID, ...) are kept in `extra` and relayed as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpstreamResponse {
    /// Processor status, e.g. `SUCCESS`.
    pub status: String,
    /// Human-readable message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Order the response refers to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    /// Remaining method-specific fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl UpstreamResponse {
    /// Whether the processor reported success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == STATUS_SUCCESS
    }
}

/// Error body returned by the processor on non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct UpstreamErrorResponse {
    pub error: String,
    #[serde(default)]
    pub message: String,
}
