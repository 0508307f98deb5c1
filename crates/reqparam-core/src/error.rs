//! Error types.
//!
//! Two families live here:
//!
//! - [`ConfigError`]: structural problems detected while a handler is being
//!   registered (conflicting declarations, duplicate names). Fatal at
//!   startup; never surfaces to a request.
//! - [`ValidationError`] / [`ValidationErrors`]: per-field request-time
//!   failures, collected across every parameter of a handler and returned
//!   together as one 422 response so a caller can fix every problem in one
//!   round trip.

use crate::response::{IntoResponse, Response, StatusCode};
use crate::schema::{Location, TypeSpec};
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

// ============================================================================
// Location Paths
// ============================================================================

/// One step of a validation error path.
///
/// Error paths are tuples whose items are either strings (location tags and
/// field names) or integers (array indices).
///
/// # Examples
///
/// ```
/// use reqparam_core::LocItem;
///
/// let field = LocItem::field("page");
/// assert_eq!(field.as_str(), Some("page"));
///
/// let idx = LocItem::index(0);
/// assert_eq!(idx.as_index(), Some(0));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocItem {
    /// Field name or location tag.
    Field(String),
    /// Array index.
    Index(usize),
}

impl LocItem {
    /// Create a field path item.
    #[must_use]
    pub fn field(name: impl Into<String>) -> Self {
        Self::Field(name.into())
    }

    /// Create an index path item.
    #[must_use]
    pub fn index(idx: usize) -> Self {
        Self::Index(idx)
    }

    /// The field name, if this is a `Field` item.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Field(s) => Some(s),
            Self::Index(_) => None,
        }
    }

    /// The index, if this is an `Index` item.
    #[must_use]
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Self::Field(_) => None,
            Self::Index(i) => Some(*i),
        }
    }
}

impl From<&str> for LocItem {
    fn from(s: &str) -> Self {
        Self::Field(s.to_owned())
    }
}

impl From<String> for LocItem {
    fn from(s: String) -> Self {
        Self::Field(s)
    }
}

impl From<usize> for LocItem {
    fn from(i: usize) -> Self {
        Self::Index(i)
    }
}

impl Serialize for LocItem {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Field(s) => serializer.serialize_str(s),
            Self::Index(i) => serializer.serialize_u64(*i as u64),
        }
    }
}

/// Location-path constructors for the supported request channels.
pub mod loc {
    use super::LocItem;
    use crate::schema::Location;

    /// `[location, name]` for an arbitrary location.
    #[must_use]
    pub fn of(location: Location, name: &str) -> Vec<LocItem> {
        vec![LocItem::field(location.as_str()), LocItem::field(name)]
    }

    /// Query parameter path: `["query", name]`.
    #[must_use]
    pub fn query(name: &str) -> Vec<LocItem> {
        of(Location::Query, name)
    }

    /// Header path: `["header", name]`.
    #[must_use]
    pub fn header(name: &str) -> Vec<LocItem> {
        of(Location::Header, name)
    }

    /// Cookie path: `["cookie", name]`.
    #[must_use]
    pub fn cookie(name: &str) -> Vec<LocItem> {
        of(Location::Cookie, name)
    }
}

// ============================================================================
// Error Type Identifiers
// ============================================================================

/// Validation error type strings, as published in the error report.
pub mod error_types {
    /// Required field is missing.
    pub const MISSING: &str = "missing";
    /// Value is not a valid string.
    pub const STRING_TYPE: &str = "string_type";
    /// Value is not a valid integer.
    pub const INT_TYPE: &str = "int_type";
    /// Value is not a valid float.
    pub const FLOAT_TYPE: &str = "float_type";
    /// Value is not a valid boolean.
    pub const BOOL_TYPE: &str = "bool_type";
    /// Raw key present but not declared by a model that forbids extras.
    pub const EXTRA_FORBIDDEN: &str = "extra_forbidden";
    /// Generic value error with a custom message.
    pub const VALUE_ERROR: &str = "value_error";
}

// ============================================================================
// Validation Error
// ============================================================================

/// A single validation error item.
///
/// The serialized field set (`type`, `loc`, `msg`, and the optional
/// `input` / `ctx`) is a contract with any client inspecting failure
/// responses.
///
/// # Examples
///
/// ```
/// use reqparam_core::{loc, ValidationError};
///
/// let error = ValidationError::missing(loc::query("q"));
/// assert_eq!(error.error_type, "missing");
/// assert_eq!(error.msg, "Field required");
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ValidationError {
    /// Error type identifier (e.g., "missing", "int_type").
    #[serde(rename = "type")]
    pub error_type: &'static str,

    /// Location path, e.g. `["query", "page"]`.
    pub loc: Vec<LocItem>,

    /// Human-readable error message.
    pub msg: String,

    /// Echo of the raw input value that failed, when one was present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<Value>,

    /// Additional context about the violated constraint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ctx: Option<HashMap<String, Value>>,
}

impl ValidationError {
    /// Create a new validation error with the default message for its type.
    #[must_use]
    pub fn new(error_type: &'static str, loc: Vec<LocItem>) -> Self {
        Self {
            error_type,
            loc,
            msg: Self::default_message(error_type),
            input: None,
            ctx: None,
        }
    }

    /// A required field was not supplied.
    #[must_use]
    pub fn missing(loc: Vec<LocItem>) -> Self {
        Self::new(error_types::MISSING, loc)
    }

    /// A raw key was present that the validating model does not declare.
    #[must_use]
    pub fn extra_forbidden(loc: Vec<LocItem>) -> Self {
        Self::new(error_types::EXTRA_FORBIDDEN, loc)
    }

    /// A raw value could not be converted to its declared type.
    #[must_use]
    pub fn type_error(loc: Vec<LocItem>, expected: TypeSpec) -> Self {
        let error_type = match expected {
            TypeSpec::String => error_types::STRING_TYPE,
            TypeSpec::Integer => error_types::INT_TYPE,
            TypeSpec::Number => error_types::FLOAT_TYPE,
            TypeSpec::Boolean => error_types::BOOL_TYPE,
        };
        Self::new(error_type, loc)
    }

    /// A generic value error with a custom message.
    #[must_use]
    pub fn value_error(loc: Vec<LocItem>, msg: impl Into<String>) -> Self {
        Self::new(error_types::VALUE_ERROR, loc).with_msg(msg)
    }

    /// Override the human-readable message.
    #[must_use]
    pub fn with_msg(mut self, msg: impl Into<String>) -> Self {
        self.msg = msg.into();
        self
    }

    /// Attach the raw input value that failed.
    #[must_use]
    pub fn with_input(mut self, input: Value) -> Self {
        self.input = Some(input);
        self
    }

    /// Attach a context key-value pair.
    #[must_use]
    pub fn with_ctx_value(mut self, key: impl Into<String>, value: Value) -> Self {
        self.ctx
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value);
        self
    }

    fn default_message(error_type: &str) -> String {
        match error_type {
            error_types::MISSING => "Field required".to_owned(),
            error_types::STRING_TYPE => "Input should be a valid string".to_owned(),
            error_types::INT_TYPE => "Input should be a valid integer".to_owned(),
            error_types::FLOAT_TYPE => "Input should be a valid number".to_owned(),
            error_types::BOOL_TYPE => "Input should be a valid boolean".to_owned(),
            error_types::EXTRA_FORBIDDEN => "Extra inputs are not permitted".to_owned(),
            _ => "Validation error".to_owned(),
        }
    }
}

// ============================================================================
// Validation Errors Collection
// ============================================================================

/// Ordered collection of validation errors (422 Unprocessable Entity).
///
/// Errors are appended in validation order: parameter-declaration order,
/// then field-declaration order within a parameter, with extra-key errors
/// after a model's field errors.
///
/// # Examples
///
/// ```
/// use reqparam_core::{loc, ValidationError, ValidationErrors};
///
/// let mut errors = ValidationErrors::new();
/// errors.push(ValidationError::missing(loc::query("q")));
/// errors.push(ValidationError::extra_forbidden(loc::query("debug")));
///
/// assert_eq!(errors.len(), 2);
/// assert!(errors.to_json().contains("extra_forbidden"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    /// Create an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from a single error.
    #[must_use]
    pub fn single(error: ValidationError) -> Self {
        Self {
            errors: vec![error],
        }
    }

    /// Create from a list of errors.
    #[must_use]
    pub fn from_errors(errors: Vec<ValidationError>) -> Self {
        Self { errors }
    }

    /// Append an error.
    pub fn push(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Append all errors from another collection.
    pub fn merge(&mut self, other: ValidationErrors) {
        self.errors.extend(other.errors);
    }

    /// Whether any errors were collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of collected errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Iterate over the errors in report order.
    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.errors.iter()
    }

    /// Render the report as a `{"detail": [...]}` JSON string.
    #[must_use]
    pub fn to_json(&self) -> String {
        #[derive(Serialize)]
        struct Report<'a> {
            detail: &'a [ValidationError],
        }

        serde_json::to_string(&Report {
            detail: &self.errors,
        })
        .unwrap_or_else(|_| r#"{"detail":[]}"#.to_owned())
    }

    /// Render the report as JSON bytes.
    #[must_use]
    pub fn to_json_bytes(&self) -> Vec<u8> {
        self.to_json().into_bytes()
    }
}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

impl Extend<ValidationError> for ValidationErrors {
    fn extend<T: IntoIterator<Item = ValidationError>>(&mut self, iter: T) {
        self.errors.extend(iter);
    }
}

impl FromIterator<ValidationError> for ValidationErrors {
    fn from_iter<T: IntoIterator<Item = ValidationError>>(iter: T) -> Self {
        Self::from_errors(iter.into_iter().collect())
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} validation error", self.errors.len())?;
        if self.errors.len() != 1 {
            write!(f, "s")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl IntoResponse for ValidationErrors {
    fn into_response(self) -> Response {
        Response::with_status(StatusCode::UNPROCESSABLE_ENTITY)
            .header("content-type", "application/json")
            .body(self.to_json_bytes())
    }
}

// ============================================================================
// Configuration Error
// ============================================================================

/// Structural error detected while registering a handler.
///
/// Registration aborts on the first configuration error; these never reach
/// a request.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Two declarations share `(name, location)` but disagree on type,
    /// default, or required-ness. The ambiguity is structural, so it is
    /// surfaced here rather than at request time.
    #[error("conflicting declarations for {location}.{name}: {reason}")]
    ConflictingDeclaration {
        /// Field name shared by the conflicting declarations.
        name: String,
        /// Location shared by the conflicting declarations.
        location: Location,
        /// What the declarations disagree on.
        reason: String,
    },

    /// Two parameters of one handler share a name.
    #[error("parameter `{0}` is declared more than once")]
    DuplicateParameter(String),

    /// A route path was registered twice.
    #[error("route `{0}` is already registered")]
    DuplicateRoute(String),
}

// ============================================================================
// Tests
// ============================================================================
