//! Payment status lookup.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;

use crate::board::PaymentStatus;
use crate::error::ApiError;
use crate::state::AppState;

/// Latest webhook-delivered status of an order.
pub async fn payment_status(
    State(state): State<Arc<AppState>>,
    Path(order_id): Path<String>,
) -> Result<Json<PaymentStatus>, ApiError> {
    state
        .payments
        .get(&order_id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("No payment status for order {order_id}")))
}
