//! Error types for ferrypay.

/// Result type for canonicalization and signing.
pub type Result<T> = std::result::Result<T, SigningError>;

/// Errors raised while turning a payload into signing input.
///
/// These are programming errors on the producing side (a malformed payload was
/// assembled) and are never retried. A signature *mismatch* is not an error; it
/// is reported as `Ok(false)` by the verifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SigningError {
    /// A field holds a value outside the supported scalar set.
    #[error("unsupported value type for field `{field}`: {kind}")]
    UnsupportedValueType {
        /// Name of the offending field (`$` for the payload root).
        field: String,
        /// JSON kind of the offending value (`array`, `object`, ...).
        kind: &'static str,
    },

    /// The canonical form could not be produced.
    #[error("encoding error: {0}")]
    Encoding(String),
}

/// Why a required-field check failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationReason {
    /// The field is absent from the payload.
    Missing,
    /// The field is required because of another field's value.
    Conditional(String),
}

/// A request payload failed validation for a specific field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", self.message())]
pub struct ValidationError {
    /// The field that failed validation.
    pub field: String,
    /// Why it failed.
    pub reason: ValidationReason,
}

impl ValidationError {
    /// A required field is missing.
    #[must_use]
    pub fn missing(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: ValidationReason::Missing,
        }
    }

    /// A field is required by a rule that depends on other fields.
    #[must_use]
    pub fn conditional(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: ValidationReason::Conditional(message.into()),
        }
    }

    /// Human-readable message, as shown to the booking site.
    #[must_use]
    pub fn message(&self) -> String {
        match &self.reason {
            ValidationReason::Missing => format!("Missing required field: {}", self.field),
            ValidationReason::Conditional(message) => message.clone(),
        }
    }
}
