//! Request-time validation and extra-field policy enforcement.
//!
//! [`BindingPlan::bind`] is the whole request-time pass: it slices each
//! parameter's raw values out of the request, coerces them to their
//! declared types, enforces each model's extra-key policy against the full
//! co-located raw input, and either returns every parameter's typed value
//! or the complete, ordered error report. There is no partial success and
//! no short-circuiting: every field of every parameter is checked.

use crate::coerce::Coerce;
use crate::error::{loc, ValidationError, ValidationErrors};
use crate::plan::{BindingPlan, ExtraFieldScope};
use crate::request::{RawInput, RawRequest};
use crate::schema::{FieldSpec, Location, ParamShape};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, trace};

/// Validated values of one request, keyed by parameter name.
///
/// Models bind to JSON objects, scalars to bare values. Keys follow
/// parameter-declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundParams {
    values: IndexMap<String, Value>,
}

impl BoundParams {
    /// A parameter's bound value.
    #[must_use]
    pub fn get(&self, param: &str) -> Option<&Value> {
        self.values.get(param)
    }

    /// One field of a bound model parameter.
    #[must_use]
    pub fn field(&self, param: &str, field: &str) -> Option<&Value> {
        match self.values.get(param)? {
            Value::Object(object) => object.get(field),
            _ => None,
        }
    }

    /// Deserialize a bound model into a typed struct.
    ///
    /// # Errors
    ///
    /// Returns the serde error when `T` does not match the bound shape.
    pub fn decode<T: DeserializeOwned>(&self, param: &str) -> Result<T, serde_json::Error> {
        let value = self.values.get(param).cloned().unwrap_or(Value::Null);
        serde_json::from_value(value)
    }

    /// Iterate over `(parameter name, bound value)` in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of bound parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no parameters were bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl BindingPlan {
    /// Validate a request's raw input against this plan.
    ///
    /// # Errors
    ///
    /// Returns the full ordered [`ValidationErrors`] report when any field
    /// of any parameter fails; the whole request fails as one.
    pub fn bind(
        &self,
        raw: &RawRequest,
        coercer: &dyn Coerce,
    ) -> Result<BoundParams, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let mut values = IndexMap::new();

        for param in self.params() {
            let location = param.location();
            let section = raw.section(location);

            match param.shape() {
                ParamShape::Scalar(field) => {
                    if let Some(value) = bind_field(section, field, location, coercer, &mut errors)
                    {
                        values.insert(param.name().to_owned(), value);
                    }
                }
                ParamShape::Model(model) => {
                    let mut object = Map::new();
                    let mut complete = true;

                    for field in model.fields() {
                        match bind_field(section, field, location, coercer, &mut errors) {
                            Some(value) => {
                                object.insert(field.name().to_owned(), value);
                            }
                            None => complete = false,
                        }
                    }

                    if param.forbids_extra() {
                        // The check runs against the full raw input for this
                        // location, scoped to this model's own fields by
                        // default: a key owned by a sibling parameter still
                        // counts as extra here.
                        for key in section.keys() {
                            let declared = match self.options().extra_field_scope {
                                ExtraFieldScope::OwnFields => model.has_field(key),
                                ExtraFieldScope::DeclaredUnion => self.declares(location, key),
                            };
                            if !declared {
                                complete = false;
                                let echo = section
                                    .get(key)
                                    .map(|v| Value::String(v.as_scalar().to_owned()));
                                let mut error =
                                    ValidationError::extra_forbidden(loc::of(location, key));
                                if let Some(echo) = echo {
                                    error = error.with_input(echo);
                                }
                                errors.push(error);
                            }
                        }
                    }

                    if complete {
                        values.insert(param.name().to_owned(), Value::Object(object));
                    }
                }
            }
        }

        if errors.is_empty() {
            Ok(BoundParams { values })
        } else {
            debug!(errors = errors.len(), "request validation failed");
            Err(errors)
        }
    }
}

fn bind_field(
    section: &RawInput,
    field: &FieldSpec,
    location: Location,
    coercer: &dyn Coerce,
    errors: &mut ValidationErrors,
) -> Option<Value> {
    match section.get(field.name()) {
        Some(raw) => match coercer.coerce(raw.as_scalar(), field.ty()) {
            Ok(value) => Some(value),
            Err(failure) => {
                trace!(field = field.name(), %failure, "coercion failed");
                errors.push(
                    ValidationError::type_error(loc::of(location, field.name()), field.ty())
                        .with_input(Value::String(raw.as_scalar().to_owned())),
                );
                None
            }
        },
        None => match field.default() {
            Some(default) => Some(default.clone()),
            None => {
                errors.push(ValidationError::missing(loc::of(location, field.name())));
                None
            }
        },
    }
}
