//! Core types for parameter binding and request validation.
//!
//! This crate turns a handler's declared inputs (scalars and aggregate
//! models bound to a request location: query string, header block, cookie
//! jar) into a single merged, order-preserving schema, and validates raw
//! request data against that schema with location-aware error reporting.
//!
//! The building blocks:
//! - [`ParamSource`] and [`ModelSchema`]: declarative parameter metadata
//! - [`BindingPlan`]: the merged, deduplicated schema built once per handler
//! - [`RawRequest`]: the per-request raw input sets, one per [`Location`]
//! - [`BoundParams`]: validated, typed values keyed by parameter name
//! - [`ValidationErrors`]: the aggregated, ordered error report
//!
//! # Design Principles
//!
//! - Registration-time work runs once per handler; its output is immutable
//!   and safe to share across request threads without locking
//! - Request-time work is stateless with respect to other requests
//! - Per-field failures are collected, never short-circuited: the validator
//!   always returns a complete outcome
//! - No ambient global state; coercion and response encoding are explicit
//!   configuration
//!
//! # Example
//!
//! ```
//! use reqparam_core::{
//!     App, FieldSpec, Location, ModelSchema, ParamSource, TypeSpec,
//! };
//! use serde_json::json;
//!
//! let filters = ModelSchema::new("Filters")
//!     .field(FieldSpec::new("limit", TypeSpec::Integer).with_default(10));
//!
//! let app = App::new()
//!     .get(
//!         "/items/",
//!         vec![ParamSource::model("filters", Location::Query, filters)],
//!         |params| json!({ "limit": params.field("filters", "limit") }),
//!     )
//!     .expect("route registration failed");
//!
//! let client = reqparam_core::testing::TestClient::new(app);
//! let response = client.get("/items/").query("limit", "25").send();
//! assert_eq!(response.status_code(), 200);
//! ```

#![forbid(unsafe_code)]

pub mod app;
pub mod coerce;
pub mod error;
pub mod plan;
pub mod request;
pub mod response;
pub mod schema;
pub mod testing;
mod validate;

pub use app::{App, RouteEntry};
pub use coerce::{Coerce, CoerceFailure, DefaultCoercer};
pub use error::{
    error_types, loc, ConfigError, LocItem, ValidationError, ValidationErrors,
};
pub use plan::{BindingPlan, ExtraFieldScope, PlanOptions, SchemaEntry};
pub use request::{parse_cookie_header, parse_query_string, RawInput, RawRequest, RawValue};
pub use response::{EncodeError, IntoResponse, JsonEncoder, Response, StatusCode};
pub use schema::{
    ExtraPolicy, FieldSpec, Location, ModelSchema, ParamShape, ParamSource, TypeSpec,
};
pub use validate::BoundParams;
