//! Request signing and webhook verification.
//!
//! Outbound requests are signed with HMAC-SHA256 over the payload's canonical
//! form (see [`crate::canonical`]) keyed by the merchant's shared secret. The
//! processor signs webhook callbacks the same way, and [`Verifier`] checks them
//! with a constant-time comparison.
//!
//! ```
//! use ferrypay_core::{Payload, SharedSecret, Signer, Verifier};
//!
//! let secret = SharedSecret::new("test_secret_key");
//! let signer = Signer::new(secret.clone());
//! let verifier = Verifier::new(secret);
//!
//! let payload = Payload::new().with("merchant_id", "M1").with("order_id", "O1");
//! let signed = signer.sign_into(payload).unwrap();
//!
//! assert!(verifier.verify_embedded(&signed).unwrap());
//! ```

use std::fmt;
use std::sync::Arc;

use hmac::{Hmac, Mac};
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::canonical;
use crate::error::{Result, SigningError};
use crate::payload::Payload;

type HmacSha256 = Hmac<Sha256>;

/// The HMAC key shared out-of-band with the payment processor.
///
/// The secret is wiped from memory on drop and never printed.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SharedSecret {
    inner: String,
}

impl SharedSecret {
    /// Wrap a secret value.
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            inner: secret.into(),
        }
    }

    /// Access the raw secret. Only the signing code should need this.
    #[must_use]
    pub fn expose_secret(&self) -> &str {
        &self.inner
    }

    /// Whether the secret is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedSecret")
            .field("inner", &"[REDACTED]")
            .finish()
    }
}

impl fmt::Display for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl From<String> for SharedSecret {
    fn from(secret: String) -> Self {
        Self::new(secret)
    }
}

impl From<&str> for SharedSecret {
    fn from(secret: &str) -> Self {
        Self::new(secret)
    }
}

/// A lowercase hex HMAC-SHA256 digest (64 characters).
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Signature(String);

impl Signature {
    /// Length of a hex-encoded signature.
    pub const HEX_LEN: usize = 64;

    /// The hex digest.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Only a prefix, so signatures do not end up whole in logs.
impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({}…)", &self.0[..8.min(self.0.len())])
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Signature> for String {
    fn from(signature: Signature) -> Self {
        signature.0
    }
}

/// Compute HMAC-SHA256 and return the hex-encoded result (64 characters).
///
/// # Errors
///
/// Returns [`SigningError::Encoding`] if the MAC rejects the key. HMAC accepts
/// keys of any length, so this does not happen with the SHA-256 instance.
pub fn hmac_sha256_hex(secret: &[u8], message: &[u8]) -> Result<String> {
    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|e| SigningError::Encoding(format!("invalid HMAC key: {e}")))?;
    mac.update(message);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Constant-time string comparison.
///
/// Lengths are compared first (a signature's length is not secret); equal
/// length inputs are compared across every byte without early exit.
#[must_use]
pub fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    a.bytes().zip(b.bytes()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

fn compute_signature(payload: &Payload, secret: &SharedSecret) -> Result<Signature> {
    let message = canonical::signing_bytes(payload)?;
    let digest = hmac_sha256_hex(secret.expose_secret().as_bytes(), &message)?;
    Ok(Signature(digest))
}

/// Sign `payload` with `secret`.
///
/// A `signature` field already present in the payload is ignored.
///
/// # Errors
///
/// Returns [`SigningError::UnsupportedValueType`] if the payload holds a
/// nested value.
pub fn sign(payload: &Payload, secret: &SharedSecret) -> Result<Signature> {
    compute_signature(payload, secret)
}

/// Check `received` against the signature of `payload` under `secret`.
///
/// # Errors
///
/// Only canonicalization failures are errors; a mismatch is `Ok(false)`.
pub fn verify(payload: &Payload, secret: &SharedSecret, received: &str) -> Result<bool> {
    let expected = compute_signature(payload, secret)?;
    Ok(check(&expected, payload, received))
}

fn check(expected: &Signature, payload: &Payload, received: &str) -> bool {
    let valid = constant_time_eq(expected.as_str(), received);

    if valid {
        tracing::debug!(fields = payload.len(), "Signature verified");
    } else {
        tracing::warn!(
            fields = payload.len(),
            received_len = received.len(),
            "Signature verification failed"
        );
    }

    valid
}

/// Signs outbound payloads with a fixed shared secret.
///
/// Cheap to clone and safe to share across tasks; the secret is read-only.
#[derive(Debug, Clone)]
pub struct Signer {
    secret: Arc<SharedSecret>,
}

impl Signer {
    /// Create a signer for `secret`.
    #[must_use]
    pub fn new(secret: SharedSecret) -> Self {
        Self {
            secret: Arc::new(secret),
        }
    }

    /// Compute the signature of `payload`, ignoring any `signature` field.
    ///
    /// # Errors
    ///
    /// Returns [`SigningError::UnsupportedValueType`] if the payload holds a
    /// nested value.
    pub fn sign(&self, payload: &Payload) -> Result<Signature> {
        let signature = compute_signature(payload, &self.secret)?;
        tracing::debug!(fields = payload.len(), "Payload signed");
        Ok(signature)
    }

    /// Sign `payload` and attach the result as its `signature` field.
    ///
    /// # Errors
    ///
    /// Same as [`sign`](Self::sign).
    pub fn sign_into(&self, payload: Payload) -> Result<Payload> {
        let signature = self.sign(&payload)?;
        Ok(payload.with_signature(&signature))
    }
}

/// Verifies signatures on inbound payloads (webhook callbacks).
#[derive(Debug, Clone)]
pub struct Verifier {
    secret: Arc<SharedSecret>,
}

impl Verifier {
    /// Create a verifier for `secret`.
    #[must_use]
    pub fn new(secret: SharedSecret) -> Self {
        Self {
            secret: Arc::new(secret),
        }
    }

    /// Check `received` against the signature of `payload`.
    ///
    /// The payload's own `signature` field, if any, is not part of the signed
    /// content. Returns `Ok(false)` on any mismatch, including a length
    /// mismatch, and logs a warning without the signature values.
    ///
    /// # Errors
    ///
    /// Returns an error only if the payload cannot be canonicalized.
    pub fn verify(&self, payload: &Payload, received: &str) -> Result<bool> {
        let expected = compute_signature(payload, &self.secret)?;
        Ok(check(&expected, payload, received))
    }

    /// Verify a payload that carries its signature in the `signature` field.
    ///
    /// A missing or non-string signature is a mismatch.
    ///
    /// # Errors
    ///
    /// Same as [`verify`](Self::verify).
    pub fn verify_embedded(&self, payload: &Payload) -> Result<bool> {
        if let Some(received) = payload.signature() {
            self.verify(payload, received)
        } else {
            tracing::warn!(fields = payload.len(), "Payload carries no signature");
            Ok(false)
        }
    }
}

impl From<Signer> for Verifier {
    fn from(signer: Signer) -> Self {
        Self {
            secret: signer.secret,
        }
    }
}
