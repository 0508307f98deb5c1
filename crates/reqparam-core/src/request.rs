//! Raw request input sets.
//!
//! A [`RawRequest`] carries three flat, order-preserving mappings of raw
//! key to raw string value, one per [`Location`]. It is supplied fresh per
//! incoming request and is immutable while that request is validated.
//!
//! Both access modes the validator needs are supported: exact-key lookup
//! (value extraction) and full key enumeration (extra-field detection).

use crate::schema::Location;
use indexmap::IndexMap;

/// A raw value: a single string, or every occurrence of a repeated key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    /// The key appeared once.
    Single(String),
    /// The key appeared multiple times; occurrences in arrival order.
    Repeated(Vec<String>),
}

impl RawValue {
    /// The value used when a scalar is expected.
    ///
    /// For repeated keys this is the last occurrence, matching the
    /// transport's multi-dict lookup.
    #[must_use]
    pub fn as_scalar(&self) -> &str {
        match self {
            Self::Single(s) => s,
            Self::Repeated(values) => values.last().map(String::as_str).unwrap_or(""),
        }
    }

    /// Every occurrence, in arrival order.
    #[must_use]
    pub fn all(&self) -> &[String] {
        match self {
            Self::Single(s) => std::slice::from_ref(s),
            Self::Repeated(values) => values,
        }
    }

    fn append(&mut self, value: String) {
        match self {
            Self::Single(first) => {
                *self = Self::Repeated(vec![std::mem::take(first), value]);
            }
            Self::Repeated(values) => values.push(value),
        }
    }
}

/// One location's flat mapping of raw key to raw value.
///
/// Keys keep insertion order; inserting an existing key folds the value
/// into [`RawValue::Repeated`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawInput {
    values: IndexMap<String, RawValue>,
}

impl RawInput {
    /// Create an empty input set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from key-value pairs, folding repeated keys.
    #[must_use]
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut input = Self::new();
        for (key, value) in pairs {
            input.insert(key, value);
        }
        input
    }

    /// Insert a value, appending if the key is already present.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let value = value.into();
        match self.values.entry(key.into()) {
            indexmap::map::Entry::Occupied(mut entry) => entry.get_mut().append(value),
            indexmap::map::Entry::Vacant(entry) => {
                entry.insert(RawValue::Single(value));
            }
        }
    }

    /// Look up a key exactly.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&RawValue> {
        self.values.get(key)
    }

    /// Enumerate every present key, in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no keys are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// The raw input sets of one incoming request, one per [`Location`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRequest {
    query: RawInput,
    headers: RawInput,
    cookies: RawInput,
}

impl RawRequest {
    /// Create an empty request.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a raw value into the given location's input set.
    ///
    /// Header keys are lowercased on ingestion; header lookup is
    /// case-insensitive on the wire.
    pub fn insert(&mut self, location: Location, key: impl Into<String>, value: impl Into<String>) {
        match location {
            Location::Query => self.query.insert(key, value),
            Location::Header => self.headers.insert(key.into().to_ascii_lowercase(), value),
            Location::Cookie => self.cookies.insert(key, value),
        }
    }

    /// The input set for a location.
    #[must_use]
    pub fn section(&self, location: Location) -> &RawInput {
        match location {
            Location::Query => &self.query,
            Location::Header => &self.headers,
            Location::Cookie => &self.cookies,
        }
    }

    /// Replace the query section with a parsed query string.
    pub fn set_query_string(&mut self, query: &str) {
        self.query = parse_query_string(query);
    }
}

/// Parse an URL-encoded query string into a [`RawInput`].
///
/// Splits on `&` and `=`, percent-decodes both sides, and treats `+` as a
/// space. Empty segments are skipped; a segment without `=` becomes a key
/// with an empty value. Malformed percent escapes are kept verbatim; raw
/// parsing happens before validation and must not fail.
#[must_use]
pub fn parse_query_string(query: &str) -> RawInput {
    let mut input = RawInput::new();
    for pair in query.split('&') {
        if pair.is_empty() {
            continue;
        }
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        input.insert(percent_decode(key), percent_decode(value));
    }
    input
}

/// Parse a `Cookie` header value into a [`RawInput`].
///
/// Pairs are separated by `;`; names and values are trimmed. Segments
/// without `=` are skipped.
#[must_use]
pub fn parse_cookie_header(header: &str) -> RawInput {
    let mut input = RawInput::new();
    for pair in header.split(';') {
        let Some((name, value)) = pair.split_once('=') else {
            continue;
        };
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        input.insert(name, value.trim());
    }
    input
}

fn percent_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b'%' if i + 2 < bytes.len() => match hex_pair(bytes[i + 1], bytes[i + 2]) {
                Some(byte) => {
                    out.push(byte);
                    i += 3;
                }
                None => {
                    out.push(b'%');
                    i += 1;
                }
            },
            byte => {
                out.push(byte);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_pair(high: u8, low: u8) -> Option<u8> {
    let high = (high as char).to_digit(16)?;
    let low = (low as char).to_digit(16)?;
    Some((high * 16 + low) as u8)
}
