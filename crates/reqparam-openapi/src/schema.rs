//! JSON Schema fragments for published parameters.

use reqparam_core::TypeSpec;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON Schema primitive types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    /// String type.
    String,
    /// Number type (float).
    Number,
    /// Integer type.
    Integer,
    /// Boolean type.
    Boolean,
}

impl From<TypeSpec> for SchemaType {
    fn from(ty: TypeSpec) -> Self {
        match ty {
            TypeSpec::String => Self::String,
            TypeSpec::Integer => Self::Integer,
            TypeSpec::Number => Self::Number,
            TypeSpec::Boolean => Self::Boolean,
        }
    }
}

/// The published schema object of one parameter: type, default, title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamSchema {
    /// JSON Schema type.
    #[serde(rename = "type")]
    pub schema_type: SchemaType,
    /// Declared default, when the parameter is optional.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Display title, derived from the parameter name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn schema_type_serializes_lowercase() {
        assert_eq!(serde_json::to_value(SchemaType::Integer).unwrap(), json!("integer"));
        assert_eq!(serde_json::to_value(SchemaType::String).unwrap(), json!("string"));
    }

    #[test]
    fn absent_default_and_title_are_omitted() {
        let schema = ParamSchema {
            schema_type: SchemaType::Boolean,
            default: None,
            title: None,
        };
        assert_eq!(serde_json::to_value(&schema).unwrap(), json!({"type": "boolean"}));
    }

    #[test]
    fn full_schema_round_trips() {
        let schema = ParamSchema {
            schema_type: SchemaType::Integer,
            default: Some(json!(0)),
            title: Some("Page".to_owned()),
        };
        let value = serde_json::to_value(&schema).unwrap();
        assert_eq!(value, json!({"type": "integer", "default": 0, "title": "Page"}));
        assert_eq!(serde_json::from_value::<ParamSchema>(value).unwrap(), schema);
    }
}
