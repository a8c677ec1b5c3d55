//! Validated and signed upstream requests.

use crate::error::{Result, ValidationError};
use crate::operation::Operation;
use crate::payload::{Payload, SIGNATURE_FIELD};
use crate::signature::Signer;

/// A payload that passed validation for an [`Operation`].
///
/// Any caller-supplied `signature` field is dropped; only the gateway signs.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentRequest {
    operation: Operation,
    payload: Payload,
}

impl PaymentRequest {
    /// Validate `payload` for `operation`.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] naming the first field that fails.
    pub fn new(
        operation: Operation,
        mut payload: Payload,
    ) -> std::result::Result<Self, ValidationError> {
        payload.remove(SIGNATURE_FIELD);
        operation.validate(&payload)?;
        Ok(Self { operation, payload })
    }

    /// The operation this request is for.
    #[must_use]
    pub fn operation(&self) -> Operation {
        self.operation
    }

    /// The validated, unsigned payload.
    #[must_use]
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// The order this request refers to, when it is a string.
    #[must_use]
    pub fn order_id(&self) -> Option<&str> {
        self.payload.get_str("order_id")
    }

    /// Sign the payload, producing the body to transmit.
    ///
    /// # Errors
    ///
    /// Fails if the payload holds values outside the signing contract.
    pub fn sign(self, signer: &Signer) -> Result<SignedRequest> {
        let payload = signer.sign_into(self.payload)?;
        Ok(SignedRequest {
            operation: self.operation,
            payload,
        })
    }
}

/// A request body with its `signature` attached, ready to send.
#[derive(Debug, Clone, PartialEq)]
pub struct SignedRequest {
    operation: Operation,
    payload: Payload,
}

impl SignedRequest {
    /// The operation this request is for.
    #[must_use]
    pub fn operation(&self) -> Operation {
        self.operation
    }

    /// Upstream path for this request.
    #[must_use]
    pub fn endpoint(&self) -> &'static str {
        self.operation.endpoint()
    }

    /// The signed payload.
    #[must_use]
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Consume into the signed payload.
    #[must_use]
    pub fn into_payload(self) -> Payload {
        self.payload
    }
}
