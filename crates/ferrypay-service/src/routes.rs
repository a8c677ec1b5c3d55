//! Router configuration.
//!
//! This module sets up the Axum router with all routes and middleware.

use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{health, payments, status, webhooks};
use crate::state::AppState;

/// Maximum concurrent requests for payment endpoints.
const PAYMENT_MAX_CONCURRENT_REQUESTS: usize = 50;

/// Create the service router with all routes and middleware.
///
/// # Routes
///
/// ## Public
/// - `GET /health` - Health check
///
/// ## Payments (signed and forwarded to mPAY ONE, rate-limited)
/// - `POST /api/credit-card/payment`
/// - `POST /api/qr/generate`
/// - `POST /api/rabbit-line-pay/payment`
/// - `POST /api/installment/payment`
/// - `POST /api/banking/payment`
/// - `POST /api/payment/inquiry`
/// - `POST /api/payment/void-refund`
///
/// ## Webhooks (signature verification)
/// - `POST /api/webhook` - mPAY ONE notifications
/// - `GET /api/payment/:order_id/status` - Latest notified status
pub fn create_router(state: AppState) -> Router {
    // Extract config values before moving state
    let cors_origins = state.config.cors_origins.clone();
    let max_body_bytes = state.config.max_body_bytes;
    let request_timeout_seconds = state.config.request_timeout_seconds;

    let cors = build_cors_layer(&cors_origins);

    let state = Arc::new(state);

    let payment_routes = Router::new()
        .route("/credit-card/payment", post(payments::credit_card))
        .route("/qr/generate", post(payments::qr_generate))
        .route("/rabbit-line-pay/payment", post(payments::rabbit_line_pay))
        .route("/installment/payment", post(payments::installment))
        .route("/banking/payment", post(payments::internet_banking))
        .route("/payment/inquiry", post(payments::inquiry))
        .route("/payment/void-refund", post(payments::void_refund))
        .layer(ConcurrencyLimitLayer::new(PAYMENT_MAX_CONCURRENT_REQUESTS));

    let api_routes = payment_routes
        // Webhooks (no rate limit - controlled by the processor)
        .route("/webhook", post(webhooks::mpay_webhook))
        .route("/payment/:order_id/status", get(status::payment_status));

    Router::new()
        .route("/health", get(health::health))
        .nest("/api", api_routes)
        // Global middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(
            request_timeout_seconds,
        )))
        .with_state(state)
}

/// Build the CORS layer from configured origins.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
