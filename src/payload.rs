//! Payload representation and encoding into a request body.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

/// A value that can be serialized to JSON at dispatch time.
///
/// Implemented for every `Serialize + Debug + Send + Sync + 'static` type,
/// so callers never implement it by hand. It exists to keep [`Payload`]
/// free of generics while still deferring serialization (and its errors)
/// until the callback is dispatched.
pub trait StructuredValue: fmt::Debug + Send + Sync {
    /// Appends the JSON encoding of the value to `buf`.
    ///
    /// # Errors
    ///
    /// Returns the serializer's error if the value cannot be represented
    /// as JSON (for example a map with non-string keys).
    fn write_json(&self, buf: &mut Vec<u8>) -> Result<(), serde_json::Error>;
}

impl<T> StructuredValue for T
where
    T: Serialize + fmt::Debug + Send + Sync + 'static,
{
    fn write_json(&self, buf: &mut Vec<u8>) -> Result<(), serde_json::Error> {
        serde_json::to_writer(buf, self)
    }
}

/// The data carried by a callback.
///
/// Raw bytes and text are sent verbatim. Anything else is a structured value
/// serialized as JSON and marked with a JSON content type.
///
/// # Example
///
/// ```
/// use callback::payload::{Payload, encode};
///
/// let payload = Payload::structured(serde_json::json!({"a": 12, "b": {"aa": "bb"}}));
/// let body = encode(Some(&payload)).unwrap();
///
/// assert_eq!(body.bytes, br#"{"a":12,"b":{"aa":"bb"}}"#);
/// assert!(body.is_json);
/// ```
#[derive(Debug, Clone)]
pub enum Payload {
    /// Raw bytes, sent as-is.
    Bytes(Vec<u8>),
    /// Raw text, sent as its UTF-8 bytes.
    Text(String),
    /// A structured value, sent as JSON.
    Structured(Arc<dyn StructuredValue>),
}

impl Payload {
    /// Creates a raw byte payload.
    #[must_use]
    pub fn bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self::Bytes(bytes.into())
    }

    /// Creates a raw text payload.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Creates a structured payload from any serializable value.
    #[must_use]
    pub fn structured<T>(value: T) -> Self
    where
        T: Serialize + fmt::Debug + Send + Sync + 'static,
    {
        Self::Structured(Arc::new(value))
    }

    /// Returns true if this payload will be encoded as JSON.
    #[must_use]
    pub const fn is_structured(&self) -> bool {
        matches!(self, Self::Structured(_))
    }
}

impl From<Vec<u8>> for Payload {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<&[u8]> for Payload {
    fn from(bytes: &[u8]) -> Self {
        Self::Bytes(bytes.to_vec())
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<serde_json::Value> for Payload {
    fn from(value: serde_json::Value) -> Self {
        Self::structured(value)
    }
}

/// A payload encoded for the wire.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EncodedBody {
    /// Body bytes
    pub bytes: Vec<u8>,
    /// Whether the request needs `Content-Type: application/json`
    pub is_json: bool,
    present: bool,
}

impl EncodedBody {
    /// Returns the body to attach to the request.
    ///
    /// `None` when there was no payload at all. An empty byte or text
    /// payload still yields `Some(vec![])`.
    #[must_use]
    pub fn into_body(self) -> Option<Vec<u8>> {
        self.present.then_some(self.bytes)
    }
}

/// Encodes an optional payload into a request body.
///
/// - No payload: empty body, no JSON marker, and no body on the request.
/// - Bytes and text: copied verbatim.
/// - Structured: one-shot JSON encoding. HTML-significant characters such
///   as `<`, `>` and `&` are left unescaped.
///
/// # Errors
///
/// Returns the serializer's error if a structured value cannot be encoded.
/// Nothing is produced in that case.
pub fn encode(payload: Option<&Payload>) -> Result<EncodedBody, serde_json::Error> {
    let Some(payload) = payload else {
        return Ok(EncodedBody::default());
    };

    let encoded = match payload {
        Payload::Bytes(bytes) => EncodedBody {
            bytes: bytes.clone(),
            is_json: false,
            present: true,
        },
        Payload::Text(text) => EncodedBody {
            bytes: text.as_bytes().to_vec(),
            is_json: false,
            present: true,
        },
        Payload::Structured(value) => {
            let mut bytes = Vec::new();
            value.write_json(&mut bytes)?;
            EncodedBody {
                bytes,
                is_json: true,
                present: true,
            }
        }
    };

    Ok(encoded)
}
