//! Raw-to-typed value conversion.
//!
//! The validator does not parse values itself; it consumes a [`Coerce`]
//! capability. [`DefaultCoercer`] provides the standard lenient wire
//! conversions; swap in another implementation via
//! [`App::with_coercer`](crate::App::with_coercer) to change them.

use crate::schema::TypeSpec;
use serde_json::Value;
use thiserror::Error;

/// Why a raw value could not be converted.
#[derive(Debug, Clone, Error)]
#[error("invalid {expected} value: {reason}")]
pub struct CoerceFailure {
    /// The type the value was expected to convert to.
    pub expected: TypeSpec,
    /// Parser-level detail, for logging; not part of the error report.
    pub reason: String,
}

impl CoerceFailure {
    /// Create a failure for the expected type.
    #[must_use]
    pub fn new(expected: TypeSpec, reason: impl Into<String>) -> Self {
        Self {
            expected,
            reason: reason.into(),
        }
    }
}

/// Conversion capability: raw string plus declared type to typed value.
pub trait Coerce: Send + Sync {
    /// Convert one raw value to its declared type.
    ///
    /// # Errors
    ///
    /// Returns [`CoerceFailure`] when the raw value is not a valid
    /// rendering of `ty`.
    fn coerce(&self, raw: &str, ty: TypeSpec) -> Result<Value, CoerceFailure>;
}

/// Standard lenient conversions.
///
/// - integers: decimal `i64`, surrounding whitespace ignored
/// - numbers: finite `f64`; textual infinities and NaN are rejected since
///   they have no JSON representation
/// - booleans: `true/false/1/0/yes/no/on/off`, ASCII case-insensitive
/// - strings: passed through verbatim
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultCoercer;

impl Coerce for DefaultCoercer {
    fn coerce(&self, raw: &str, ty: TypeSpec) -> Result<Value, CoerceFailure> {
        match ty {
            TypeSpec::String => Ok(Value::String(raw.to_owned())),
            TypeSpec::Integer => raw
                .trim()
                .parse::<i64>()
                .map(Value::from)
                .map_err(|e| CoerceFailure::new(ty, e.to_string())),
            TypeSpec::Number => {
                let parsed: f64 = raw
                    .trim()
                    .parse()
                    .map_err(|e: std::num::ParseFloatError| CoerceFailure::new(ty, e.to_string()))?;
                serde_json::Number::from_f64(parsed)
                    .map(Value::Number)
                    .ok_or_else(|| CoerceFailure::new(ty, "number is not finite"))
            }
            TypeSpec::Boolean => match raw.to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => Ok(Value::Bool(true)),
                "false" | "0" | "no" | "off" => Ok(Value::Bool(false)),
                _ => Err(CoerceFailure::new(ty, "unrecognized boolean literal")),
            },
        }
    }
}
