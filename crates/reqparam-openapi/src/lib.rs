//! OpenAPI parameter documents for reqparam binding plans.
//!
//! This crate is a pure projection: it walks the merged entry list of a
//! [`BindingPlan`](reqparam_core::BindingPlan) and renders one
//! location-tagged parameter object per entry, in first-declaration order.
//! Every merge decision made at registration is mirrored here exactly; no
//! enforcement logic runs during emission.
//!
//! # Example
//!
//! ```
//! use reqparam_core::{BindingPlan, FieldSpec, Location, ModelSchema, ParamSource, TypeSpec};
//! use reqparam_openapi::parameters_for;
//!
//! let plan = BindingPlan::build(vec![ParamSource::model(
//!     "filters",
//!     Location::Query,
//!     ModelSchema::new("Filters")
//!         .field(FieldSpec::new("limit", TypeSpec::Integer).with_default(10)),
//! )])
//! .unwrap();
//!
//! let parameters = parameters_for(&plan);
//! assert_eq!(parameters.len(), 1);
//! assert_eq!(parameters[0].name, "limit");
//! ```

#![forbid(unsafe_code)]

mod schema;
mod spec;

pub use schema::{ParamSchema, SchemaType};
pub use spec::{
    parameters_for, Info, OpenApi, OpenApiBuilder, Operation, Parameter, ParameterLocation,
    PathItem,
};
