//! OpenAPI document types and the parameter emitter.

use crate::schema::ParamSchema;
use indexmap::IndexMap;
use reqparam_core::{BindingPlan, Location, SchemaEntry};
use serde::{Deserialize, Serialize};

/// Parameter location tag (`in` field).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    /// Query parameter.
    Query,
    /// Header parameter.
    Header,
    /// Cookie parameter.
    Cookie,
}

impl From<Location> for ParameterLocation {
    fn from(location: Location) -> Self {
        match location {
            Location::Query => Self::Query,
            Location::Header => Self::Header,
            Location::Cookie => Self::Cookie,
        }
    }
}

impl From<ParameterLocation> for Location {
    fn from(location: ParameterLocation) -> Self {
        match location {
            ParameterLocation::Query => Self::Query,
            ParameterLocation::Header => Self::Header,
            ParameterLocation::Cookie => Self::Cookie,
        }
    }
}

/// One published operation parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name.
    pub name: String,
    /// Parameter location.
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    /// Whether the request must supply the parameter.
    #[serde(default)]
    pub required: bool,
    /// Parameter schema.
    pub schema: ParamSchema,
}

/// API operation (GET-only surface).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    /// Operation ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    /// Parameters, in first-declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
}

/// Path item (operations for a path).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathItem {
    /// GET operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub get: Option<Operation>,
}

/// API information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Info {
    /// API title.
    pub title: String,
    /// API version.
    pub version: String,
}

/// OpenAPI document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenApi {
    /// OpenAPI version.
    pub openapi: String,
    /// API information.
    pub info: Info,
    /// Path items, in registration order.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub paths: IndexMap<String, PathItem>,
}

/// Render a plan's merged entries into parameter objects.
///
/// One object per [`SchemaEntry`], in first-declaration order. The `title`
/// is the entry name with its first letter uppercased.
#[must_use]
pub fn parameters_for(plan: &BindingPlan) -> Vec<Parameter> {
    plan.entries().iter().map(parameter_for).collect()
}

fn parameter_for(entry: &SchemaEntry) -> Parameter {
    Parameter {
        name: entry.name().to_owned(),
        location: entry.location().into(),
        required: entry.required(),
        schema: ParamSchema {
            schema_type: entry.ty().into(),
            default: entry.default().cloned(),
            title: Some(title_for(entry.name())),
        },
    }
}

fn title_for(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Builder for a per-route OpenAPI document.
///
/// # Example
///
/// ```
/// use reqparam_core::{BindingPlan, FieldSpec, Location, ParamSource, TypeSpec};
/// use reqparam_openapi::OpenApiBuilder;
///
/// let plan = BindingPlan::build(vec![ParamSource::scalar(
///     Location::Query,
///     FieldSpec::new("q", TypeSpec::String),
/// )])
/// .unwrap();
///
/// let doc = OpenApiBuilder::new("Search API", "1.0.0")
///     .route("/search/", &plan)
///     .build();
/// assert!(doc.paths.contains_key("/search/"));
/// ```
#[derive(Debug)]
pub struct OpenApiBuilder {
    info: Info,
    paths: IndexMap<String, PathItem>,
}

impl OpenApiBuilder {
    /// Start a document.
    #[must_use]
    pub fn new(title: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            info: Info {
                title: title.into(),
                version: version.into(),
            },
            paths: IndexMap::new(),
        }
    }

    /// Add a GET route's parameters under its path.
    #[must_use]
    pub fn route(mut self, path: impl Into<String>, plan: &BindingPlan) -> Self {
        let path = path.into();
        let operation = Operation {
            operation_id: Some(operation_id_for(&path)),
            parameters: parameters_for(plan),
        };
        self.paths.entry(path).or_default().get = Some(operation);
        self
    }

    /// Add every route of an [`App`](reqparam_core::App), in registration
    /// order.
    #[must_use]
    pub fn app(mut self, app: &reqparam_core::App) -> Self {
        for route in app.routes() {
            self = self.route(route.path(), route.plan());
        }
        self
    }

    /// Finish the document.
    #[must_use]
    pub fn build(self) -> OpenApi {
        OpenApi {
            openapi: "3.1.0".to_owned(),
            info: self.info,
            paths: self.paths,
        }
    }
}

fn operation_id_for(path: &str) -> String {
    path.trim_matches('/').replace(['/', '-'], "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn titles_uppercase_the_first_letter() {
        assert_eq!(title_for("field1"), "Field1");
        assert_eq!(title_for("q"), "Q");
        assert_eq!(title_for("alreadyTitled"), "AlreadyTitled");
        assert_eq!(title_for(""), "");
    }

    #[test]
    fn operation_ids_come_from_the_path() {
        assert_eq!(operation_id_for("/query-models/"), "query_models");
        assert_eq!(operation_id_for("/users/search/"), "users_search");
    }
}
