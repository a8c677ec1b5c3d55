//! Core signing contract for the ferrypay gateway.
//!
//! This crate provides everything that has to agree byte-for-byte with the
//! mPAY ONE payment processor:
//!
//! - **Payloads**: `Payload`, a flat field map with sorted keys
//! - **Canonical form**: `canonicalize`, `signing_bytes`
//! - **Signing**: `SharedSecret`, `Signer`, `Signature`
//! - **Verification**: `Verifier`, `constant_time_eq`
//! - **Requests**: `Operation`, `PaymentRequest`, `SignedRequest`
//!
//! # Signing rule
//!
//! `signature = hex(HMAC-SHA256(secret, canonical(payload - "signature")))`
//!
//! The canonical form is compact, key-sorted, ASCII-escaped JSON; see
//! [`canonical`] for the exact number and string formatting rules.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod canonical;
pub mod error;
pub mod operation;
pub mod payload;
pub mod request;
pub mod signature;

pub use canonical::{canonicalize, signing_bytes, PythonFormatter};
pub use error::{Result, SigningError, ValidationError, ValidationReason};
pub use operation::{Operation, REFUND_TYPE_REFUND, REFUND_TYPE_VOID};
pub use payload::{Payload, SIGNATURE_FIELD};
pub use request::{PaymentRequest, SignedRequest};
pub use signature::{
    constant_time_eq, hmac_sha256_hex, sign, verify, SharedSecret, Signature, Signer, Verifier,
};
