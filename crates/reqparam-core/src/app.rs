//! Route registry and request dispatch.
//!
//! Registration is the once-per-handler half of the lifecycle: building a
//! route derives its [`BindingPlan`] and caches it, keyed by path, and any
//! structural problem aborts registration with a [`ConfigError`]. After
//! that the table is read-only; dispatching borrows it concurrently from
//! any number of request tasks.
//!
//! The sampled surface is GET-only with JSON responses, so the handler
//! contract is deliberately small: validated parameters in, JSON value
//! out.

use crate::coerce::{Coerce, DefaultCoercer};
use crate::error::ConfigError;
use crate::plan::{BindingPlan, PlanOptions};
use crate::request::RawRequest;
use crate::response::{IntoResponse, JsonEncoder, Response};
use crate::schema::ParamSource;
use crate::validate::BoundParams;
use indexmap::IndexMap;
use std::sync::Arc;
use tracing::{debug, error};

type Handler = dyn Fn(&BoundParams) -> serde_json::Value + Send + Sync;

/// One registered route: its path, cached plan, and handler.
pub struct RouteEntry {
    path: String,
    plan: Arc<BindingPlan>,
    handler: Box<Handler>,
}

impl RouteEntry {
    /// Route path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The binding plan derived at registration.
    #[must_use]
    pub fn plan(&self) -> &BindingPlan {
        &self.plan
    }
}

impl std::fmt::Debug for RouteEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteEntry")
            .field("path", &self.path)
            .field("entries", &self.plan.entries().len())
            .finish()
    }
}

/// Route table plus explicit request-time configuration.
///
/// # Example
///
/// ```
/// use reqparam_core::{App, FieldSpec, Location, ParamSource, TypeSpec};
/// use serde_json::json;
///
/// let app = App::new()
///     .get(
///         "/ping/",
///         vec![ParamSource::scalar(
///             Location::Query,
///             FieldSpec::new("echo", TypeSpec::String).with_default("pong"),
///         )],
///         |params| json!({ "echo": params.get("echo") }),
///     )
///     .unwrap();
///
/// let response = app.dispatch("/ping/", &reqparam_core::RawRequest::new());
/// assert_eq!(response.status().as_u16(), 200);
/// ```
pub struct App {
    routes: IndexMap<String, RouteEntry>,
    coercer: Arc<dyn Coerce>,
    encoder: JsonEncoder,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    /// Create an empty app with the default coercer and encoder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            routes: IndexMap::new(),
            coercer: Arc::new(DefaultCoercer),
            encoder: JsonEncoder::new(),
        }
    }

    /// Replace the type-conversion capability.
    #[must_use]
    pub fn with_coercer(mut self, coercer: impl Coerce + 'static) -> Self {
        self.coercer = Arc::new(coercer);
        self
    }

    /// Replace the response-encoding policy.
    #[must_use]
    pub fn with_encoder(mut self, encoder: JsonEncoder) -> Self {
        self.encoder = encoder;
        self
    }

    /// Register a GET route with default plan options.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] on a duplicate path or on a structural
    /// conflict in the declared parameters. Registration errors are fatal
    /// at startup; nothing is registered on failure.
    pub fn get<H>(
        self,
        path: impl Into<String>,
        params: Vec<ParamSource>,
        handler: H,
    ) -> Result<Self, ConfigError>
    where
        H: Fn(&BoundParams) -> serde_json::Value + Send + Sync + 'static,
    {
        self.get_with(path, params, PlanOptions::default(), handler)
    }

    /// Register a GET route with explicit [`PlanOptions`].
    ///
    /// # Errors
    ///
    /// Same conditions as [`App::get`].
    pub fn get_with<H>(
        mut self,
        path: impl Into<String>,
        params: Vec<ParamSource>,
        options: PlanOptions,
        handler: H,
    ) -> Result<Self, ConfigError>
    where
        H: Fn(&BoundParams) -> serde_json::Value + Send + Sync + 'static,
    {
        let path = path.into();
        if self.routes.contains_key(&path) {
            return Err(ConfigError::DuplicateRoute(path));
        }

        let plan = BindingPlan::build_with(params, options)?;
        debug!(path = %path, entries = plan.entries().len(), "route registered");

        self.routes.insert(
            path.clone(),
            RouteEntry {
                path,
                plan: Arc::new(plan),
                handler: Box::new(handler),
            },
        );
        Ok(self)
    }

    /// Look up a registered route.
    #[must_use]
    pub fn route(&self, path: &str) -> Option<&RouteEntry> {
        self.routes.get(path)
    }

    /// Iterate over routes in registration order.
    pub fn routes(&self) -> impl Iterator<Item = &RouteEntry> {
        self.routes.values()
    }

    /// Dispatch one request.
    ///
    /// Unknown paths return 404. Validation failure returns 422 with the
    /// full error report. Success runs the handler and encodes its payload
    /// as a 200 JSON response.
    #[must_use]
    pub fn dispatch(&self, path: &str, raw: &RawRequest) -> Response {
        let Some(route) = self.routes.get(path) else {
            return Response::not_found();
        };

        match route.plan.bind(raw, self.coercer.as_ref()) {
            Ok(bound) => {
                let payload = (route.handler)(&bound);
                match self.encoder.encode(&payload) {
                    Ok(response) => response,
                    Err(err) => {
                        error!(path = %path, %err, "response encoding failed");
                        Response::with_status(crate::response::StatusCode::INTERNAL_SERVER_ERROR)
                            .header("content-type", "application/json")
                            .body(br#"{"detail":"Internal Server Error"}"#.to_vec())
                    }
                }
            }
            Err(errors) => {
                debug!(path = %path, errors = errors.len(), "request rejected");
                errors.into_response()
            }
        }
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("routes", &self.routes.len())
            .finish()
    }
}
