//! Payment handlers.
//!
//! Each route validates the booking site's payload for one operation, signs
//! it and relays the processor's answer unchanged.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;

use ferrypay_client::UpstreamResponse;
use ferrypay_core::{Operation, PaymentRequest};

use super::parse_payload;
use crate::error::ApiError;
use crate::state::AppState;

/// Validate, sign and forward a request for `operation`.
async fn forward(
    state: &AppState,
    operation: Operation,
    body: &[u8],
) -> Result<Json<UpstreamResponse>, ApiError> {
    let mut payload = parse_payload(body)?;
    if !payload.contains("merchant_id") {
        payload.insert("merchant_id", state.config.merchant_id.clone());
    }

    let request = PaymentRequest::new(operation, payload).map_err(|e| {
        tracing::debug!(%operation, field = %e.field, "Rejected payment request");
        e
    })?;

    let response = state.mpay.submit(request).await?;
    Ok(Json(response))
}

/// Card payment.
pub async fn credit_card(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<UpstreamResponse>, ApiError> {
    forward(&state, Operation::CreditCardPayment, &body).await
}

/// QR code generation.
pub async fn qr_generate(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<UpstreamResponse>, ApiError> {
    forward(&state, Operation::QrGenerate, &body).await
}

/// Rabbit LINE Pay wallet payment.
pub async fn rabbit_line_pay(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<UpstreamResponse>, ApiError> {
    forward(&state, Operation::RabbitLinePayPayment, &body).await
}

/// Card installment payment.
pub async fn installment(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<UpstreamResponse>, ApiError> {
    forward(&state, Operation::InstallmentPayment, &body).await
}

/// Internet banking transfer.
pub async fn internet_banking(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<UpstreamResponse>, ApiError> {
    forward(&state, Operation::InternetBankingPayment, &body).await
}

/// Order status inquiry.
pub async fn inquiry(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<UpstreamResponse>, ApiError> {
    forward(&state, Operation::PaymentInquiry, &body).await
}

/// Void or refund.
pub async fn void_refund(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<UpstreamResponse>, ApiError> {
    forward(&state, Operation::VoidRefund, &body).await
}
