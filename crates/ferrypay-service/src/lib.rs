//! Ferrypay HTTP gateway.
//!
//! This crate exposes the payment API used by the ferry-booking site:
//!
//! - Payment initiation for card, QR, wallet, installment and bank transfer
//! - Order inquiry and void/refund
//! - mPAY ONE webhooks, verified before their status is recorded
//!
//! Every request forwarded upstream is signed with the merchant secret; every
//! webhook must carry a valid signature under the same secret.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Allow some pedantic lints that are noisy for Axum handler functions
#![allow(clippy::missing_errors_doc)] // Axum handlers all return Result
#![allow(clippy::unused_async)] // Axum handlers must be async

pub mod board;
pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use board::{PaymentStatus, StatusBoard};
pub use config::{ConfigError, ServiceConfig};
pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
