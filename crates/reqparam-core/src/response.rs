//! Response construction and JSON encoding policy.
//!
//! The transport layer proper is out of scope; what lives here is the
//! minimal response surface the binding layer owes its callers: a status
//! code, headers, a byte body, and an explicit JSON encoding policy.
//!
//! Non-representable numeric values (infinities, NaN) are rendered as the
//! JSON `null` literal instead of failing serialization; see
//! [`JsonEncoder`].

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// HTTP status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusCode(u16);

impl StatusCode {
    /// 200 OK.
    pub const OK: Self = Self(200);
    /// 404 Not Found.
    pub const NOT_FOUND: Self = Self(404);
    /// 422 Unprocessable Entity.
    pub const UNPROCESSABLE_ENTITY: Self = Self(422);
    /// 500 Internal Server Error.
    pub const INTERNAL_SERVER_ERROR: Self = Self(500);

    /// Numeric code.
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self.0
    }

    /// Standard reason phrase.
    #[must_use]
    pub const fn canonical_reason(self) -> &'static str {
        match self.0 {
            200 => "OK",
            404 => "Not Found",
            422 => "Unprocessable Entity",
            500 => "Internal Server Error",
            _ => "Unknown",
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.0, self.canonical_reason())
    }
}

/// An HTTP response: status, headers, byte body.
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl Response {
    /// Create an empty response with the given status.
    #[must_use]
    pub fn with_status(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Create a 200 OK response.
    #[must_use]
    pub fn ok() -> Self {
        Self::with_status(StatusCode::OK)
    }

    /// Create a 404 Not Found response with a JSON detail body.
    #[must_use]
    pub fn not_found() -> Self {
        Self::with_status(StatusCode::NOT_FOUND)
            .header("content-type", "application/json")
            .body(br#"{"detail":"Not Found"}"#.to_vec())
    }

    /// Append a header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Replace the body.
    #[must_use]
    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    /// Status code.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Headers, in insertion order.
    #[must_use]
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// First value of a header, matched case-insensitively.
    #[must_use]
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Body bytes.
    #[must_use]
    pub fn body_bytes(&self) -> &[u8] {
        &self.body
    }
}

/// Conversion into a [`Response`].
pub trait IntoResponse {
    /// Build the response.
    fn into_response(self) -> Response;
}

impl IntoResponse for Response {
    fn into_response(self) -> Response {
        self
    }
}

/// Response serialization failed.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// The payload could not be serialized to JSON.
    #[error("response serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Explicit JSON response-encoding policy.
///
/// Passed as configuration to whatever dispatches responses; there is no
/// process-wide default encoder.
///
/// Non-finite floats never fail encoding: the serializer substitutes the
/// JSON `null` literal for positive/negative infinity and NaN, which is
/// the documented wire behavior for values JSON cannot represent.
///
/// # Example
///
/// ```
/// use reqparam_core::JsonEncoder;
///
/// let encoder = JsonEncoder::new();
/// let response = encoder.encode(&vec![3.14, f64::INFINITY, f64::NAN]).unwrap();
/// assert_eq!(response.body_bytes(), b"[3.14,null,null]");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEncoder {
    pretty: bool,
}

impl JsonEncoder {
    /// Create the default encoder (compact output).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit pretty-printed JSON.
    #[must_use]
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    /// Serialize a payload to JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError`] when the payload cannot be serialized (a
    /// map with non-string keys, a failing `Serialize` impl). Non-finite
    /// floats are not an error; they render as `null`.
    pub fn to_bytes<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, EncodeError> {
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(value)?
        } else {
            serde_json::to_vec(value)?
        };
        Ok(bytes)
    }

    /// Serialize a payload into a 200 JSON response.
    ///
    /// # Errors
    ///
    /// Same conditions as [`JsonEncoder::to_bytes`].
    pub fn encode<T: Serialize>(&self, value: &T) -> Result<Response, EncodeError> {
        Ok(Response::ok()
            .header("content-type", "application/json")
            .body(self.to_bytes(value)?))
    }
}
