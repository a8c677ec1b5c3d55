//! mPAY ONE client SDK.
//!
//! Validates, signs and submits payment requests to the processor.
//!
//! # Example
//!
//! ```no_run
//! use ferrypay_client::MpayClient;
//! use ferrypay_core::{Operation, Payload, SharedSecret, Signer};
//!
//! # async fn example() -> Result<(), ferrypay_client::ClientError> {
//! let client = MpayClient::new(
//!     "https://sandbox.mpay.one/api/v1",
//!     Signer::new(SharedSecret::new("merchant-secret")),
//! )?;
//!
//! let payload = Payload::new()
//!     .with("merchant_id", "MERCH-12345")
//!     .with("order_id", "ORD-2025001")
//!     .with("amount", 529.73)
//!     .with("currency", "THB");
//!
//! let response = client.execute(Operation::QrGenerate, payload).await?;
//! println!("processor status: {}", response.status);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod client;
mod error;
mod types;

pub use client::{ClientOptions, MpayClient, REQUEST_ID_HEADER};
pub use error::ClientError;
pub use types::{UpstreamResponse, STATUS_SUCCESS};
