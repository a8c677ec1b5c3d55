//! Key-value payloads exchanged with the payment processor.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SigningError;
use crate::signature::Signature;

/// Name of the field that carries the request or webhook signature.
///
/// This field is never part of the signing input.
pub const SIGNATURE_FIELD: &str = "signature";

/// A flat mapping of field names to scalar JSON values.
///
/// Keys are unique and always iterate in ascending byte order, whatever order
/// they were inserted in. Values are not checked on insertion; unsupported
/// values (arrays, objects) are rejected when the payload is canonicalized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload {
    fields: BTreeMap<String, Value>,
}

impl Payload {
    /// Create an empty payload.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field, replacing and returning any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(key.into(), value.into())
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Get a field value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Get a field value if it is a string.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    /// Whether the field is present (with any value, including `null`).
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Remove a field.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.fields.remove(key)
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the payload has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over fields in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }

    /// The embedded signature, if the payload carries one as a string.
    #[must_use]
    pub fn signature(&self) -> Option<&str> {
        self.get_str(SIGNATURE_FIELD)
    }

    /// A copy of this payload without the signature field.
    #[must_use]
    pub fn without_signature(&self) -> Self {
        let mut unsigned = self.clone();
        unsigned.remove(SIGNATURE_FIELD);
        unsigned
    }

    /// This payload with `signature` attached, replacing any existing one.
    #[must_use]
    pub fn with_signature(mut self, signature: &Signature) -> Self {
        self.insert(SIGNATURE_FIELD, signature.as_str());
        self
    }

    /// Convert into a JSON object.
    #[must_use]
    pub fn into_json(self) -> Value {
        Value::Object(self.fields.into_iter().collect())
    }
}

impl<K, V> FromIterator<(K, V)> for Payload
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl From<serde_json::Map<String, Value>> for Payload {
    fn from(map: serde_json::Map<String, Value>) -> Self {
        map.into_iter().collect()
    }
}

impl TryFrom<Value> for Payload {
    type Error = SigningError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(map.into()),
            other => Err(SigningError::UnsupportedValueType {
                field: "$".into(),
                kind: crate::canonical::value_kind(&other),
            }),
        }
    }
}

impl<'a> IntoIterator for &'a Payload {
    type Item = (&'a String, &'a Value);
    type IntoIter = std::collections::btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}
