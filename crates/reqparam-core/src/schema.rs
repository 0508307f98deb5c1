//! Parameter declarations: locations, field types, and aggregate models.
//!
//! Everything in this module is declaration metadata, produced once when a
//! handler is registered. [`ParamSource::fields`] is the flattening step:
//! it yields a parameter's fields in declaration order, whether the
//! parameter is a bare scalar or an aggregate model.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Request channel a field is read from.
///
/// Determines which raw input set of a [`crate::RawRequest`] the field's
/// value is looked up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    /// Query-string parameter.
    Query,
    /// HTTP header.
    Header,
    /// Cookie.
    Cookie,
}

impl Location {
    /// Lowercase name as it appears in error paths and documents.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Header => "header",
            Self::Cookie => "cookie",
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declared wire type of a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeSpec {
    /// UTF-8 string, passed through as-is.
    String,
    /// Signed 64-bit integer.
    Integer,
    /// Finite 64-bit float.
    Number,
    /// Boolean with lenient textual forms.
    Boolean,
}

impl TypeSpec {
    /// JSON Schema type name for this field type.
    #[must_use]
    pub const fn schema_name(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
        }
    }
}

impl fmt::Display for TypeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.schema_name())
    }
}

/// One named, typed field of a parameter.
///
/// A field with no declared default is required: a request that does not
/// supply it fails validation with a `missing` error.
///
/// # Example
///
/// ```
/// use reqparam_core::{FieldSpec, TypeSpec};
///
/// let page = FieldSpec::new("page", TypeSpec::Integer).with_default(1);
/// assert!(!page.required());
///
/// let token = FieldSpec::new("token", TypeSpec::String);
/// assert!(token.required());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    name: String,
    ty: TypeSpec,
    default: Option<Value>,
}

impl FieldSpec {
    /// Declare a required field.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: TypeSpec) -> Self {
        Self {
            name: name.into(),
            ty,
            default: None,
        }
    }

    /// Attach a default, making the field optional.
    #[must_use]
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Field name, as looked up in the raw input set.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared type.
    #[must_use]
    pub fn ty(&self) -> TypeSpec {
        self.ty
    }

    /// Declared default, if any.
    #[must_use]
    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// A field without a default must be supplied by the request.
    #[must_use]
    pub fn required(&self) -> bool {
        self.default.is_none()
    }
}

/// What an aggregate model does with raw keys it does not declare.
///
/// This is a property of the model, never of the merged schema: it only
/// restricts what that specific model accepts from its own location's raw
/// input set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExtraPolicy {
    /// Unrecognized keys are ignored.
    #[default]
    Allow,
    /// Unrecognized keys fail validation with `extra_forbidden`.
    Forbid,
}

/// A declared group of named, typed fields bound together as one parameter.
///
/// Field order is declaration order and is preserved through schema merging
/// and into the published document.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSchema {
    name: String,
    fields: Vec<FieldSpec>,
    extra: ExtraPolicy,
}

impl ModelSchema {
    /// Start an empty model.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            extra: ExtraPolicy::default(),
        }
    }

    /// Append a field.
    #[must_use]
    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    /// Reject raw keys this model does not declare.
    #[must_use]
    pub fn forbid_extra(mut self) -> Self {
        self.extra = ExtraPolicy::Forbid;
        self
    }

    /// Model name (used for diagnostics only).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared fields, in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Extra-key policy.
    #[must_use]
    pub fn extra(&self) -> ExtraPolicy {
        self.extra
    }

    /// Whether this model declares a field with the given name.
    #[must_use]
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.name() == name)
    }
}

/// Shape of a declared parameter: a bare scalar or an aggregate model.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamShape {
    /// A single field bound directly.
    Scalar(FieldSpec),
    /// An aggregate model contributing all of its fields.
    Model(ModelSchema),
}

/// One declared handler parameter: a name, a [`Location`], and a shape.
///
/// A scalar parameter behaves exactly like a synthetic single-field model
/// that allows extras; the parameter name doubles as the field name.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSource {
    name: String,
    location: Location,
    shape: ParamShape,
}

impl ParamSource {
    /// Declare a scalar parameter; the parameter is named after its field.
    #[must_use]
    pub fn scalar(location: Location, field: FieldSpec) -> Self {
        Self {
            name: field.name().to_owned(),
            location,
            shape: ParamShape::Scalar(field),
        }
    }

    /// Declare an aggregate-model parameter.
    #[must_use]
    pub fn model(name: impl Into<String>, location: Location, model: ModelSchema) -> Self {
        Self {
            name: name.into(),
            location,
            shape: ParamShape::Model(model),
        }
    }

    /// Parameter name, the key under which its bound value is returned.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Location all of this parameter's fields are read from.
    #[must_use]
    pub fn location(&self) -> Location {
        self.location
    }

    /// Parameter shape.
    #[must_use]
    pub fn shape(&self) -> &ParamShape {
        &self.shape
    }

    /// The parameter's fields, flattened in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldSpec] {
        match &self.shape {
            ParamShape::Scalar(field) => std::slice::from_ref(field),
            ParamShape::Model(model) => model.fields(),
        }
    }

    /// Whether this parameter rejects undeclared co-located raw keys.
    #[must_use]
    pub fn forbids_extra(&self) -> bool {
        matches!(
            &self.shape,
            ParamShape::Model(model) if model.extra() == ExtraPolicy::Forbid
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn location_round_trips_lowercase() {
        assert_eq!(serde_json::to_string(&Location::Query).unwrap(), "\"query\"");
        assert_eq!(Location::Header.to_string(), "header");
        assert_eq!(Location::Cookie.as_str(), "cookie");
    }

    #[test]
    fn field_without_default_is_required() {
        let field = FieldSpec::new("q", TypeSpec::String);
        assert!(field.required());
        assert_eq!(field.default(), None);
    }

    #[test]
    fn field_with_default_is_optional() {
        let field = FieldSpec::new("page", TypeSpec::Integer).with_default(1);
        assert!(!field.required());
        assert_eq!(field.default(), Some(&json!(1)));
    }

    #[test]
    fn model_preserves_field_order() {
        let model = ModelSchema::new("Filters")
            .field(FieldSpec::new("b", TypeSpec::Integer))
            .field(FieldSpec::new("a", TypeSpec::Integer));

        let names: Vec<_> = model.fields().iter().map(FieldSpec::name).collect();
        assert_eq!(names, ["b", "a"]);
    }

    #[test]
    fn model_extra_policy_defaults_to_allow() {
        let model = ModelSchema::new("M").field(FieldSpec::new("a", TypeSpec::Integer));
        assert_eq!(model.extra(), ExtraPolicy::Allow);
        assert_eq!(model.forbid_extra().extra(), ExtraPolicy::Forbid);
    }

    #[test]
    fn scalar_param_takes_field_name() {
        let param = ParamSource::scalar(
            Location::Query,
            FieldSpec::new("limit", TypeSpec::Integer).with_default(10),
        );
        assert_eq!(param.name(), "limit");
        assert_eq!(param.fields().len(), 1);
        assert!(!param.forbids_extra());
    }

    #[test]
    fn model_param_flattens_fields_in_order() {
        let model = ModelSchema::new("M")
            .field(FieldSpec::new("x", TypeSpec::Integer))
            .field(FieldSpec::new("y", TypeSpec::String))
            .forbid_extra();
        let param = ParamSource::model("m", Location::Header, model);

        let names: Vec<_> = param.fields().iter().map(FieldSpec::name).collect();
        assert_eq!(names, ["x", "y"]);
        assert!(param.forbids_extra());
    }
}
