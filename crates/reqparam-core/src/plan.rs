//! Registration-time schema merging.
//!
//! [`BindingPlan::build`] runs once per handler, at registration. It
//! flattens every declared parameter into field descriptors, collapses
//! descriptors sharing `(name, location)` into a single published
//! [`SchemaEntry`], and records which parameters own each entry. The result
//! is immutable for the life of the process and is read concurrently by
//! request handling without locking.
//!
//! Merging is deterministic and order-stable: entries appear in
//! first-declaration order, and rebuilding a plan from the same
//! declarations yields an identical entry list.

use crate::error::ConfigError;
use crate::schema::{Location, ParamSource, TypeSpec};
use indexmap::IndexMap;
use serde_json::Value;
use tracing::debug;

/// The merged, published description of one `(name, location)` pair.
///
/// Invariant: no two entries of a plan share `(name, location)`. Entries
/// that differ only in location stay distinct even when the name repeats.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaEntry {
    name: String,
    location: Location,
    ty: TypeSpec,
    default: Option<Value>,
}

impl SchemaEntry {
    /// Published field name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Location the field is read from.
    #[must_use]
    pub fn location(&self) -> Location {
        self.location
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

    /// Whether the request must supply this field.
    #[must_use]
    pub fn required(&self) -> bool {
        self.default.is_none()
    }
}

/// How a forbid-extras model scopes its unknown-key check.
///
/// The sampled framework checks each model's location-wide raw input
/// against that model's *own* declared fields, so a field legitimately
/// owned by a sibling model at the same location is still reported as
/// extra. [`ExtraFieldScope::OwnFields`] preserves that contract;
/// [`ExtraFieldScope::DeclaredUnion`] is the opt-out that accepts any key
/// declared by any co-located parameter of the handler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExtraFieldScope {
    /// Check against the validating model's own field names.
    #[default]
    OwnFields,
    /// Check against the union of all co-located declared field names.
    DeclaredUnion,
}

/// Options fixed at plan-build time.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlanOptions {
    /// Scope of the extra-key check for forbid-extras models.
    pub extra_field_scope: ExtraFieldScope,
}

#[derive(Debug)]
struct EntryOwners {
    entry: usize,
    params: Vec<usize>,
}

/// The immutable binding metadata of one handler.
///
/// Built once from the handler's declared parameters; holds the ordered
/// published entries and the ownership multimap that maps each merged
/// `(name, location)` pair back to every parameter that declared it.
#[derive(Debug)]
pub struct BindingPlan {
    params: Vec<ParamSource>,
    entries: Vec<SchemaEntry>,
    owners: IndexMap<(String, Location), EntryOwners>,
    options: PlanOptions,
}

impl BindingPlan {
    /// Build a plan with default options.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] on duplicate parameter names or on two
    /// declarations that share `(name, location)` but disagree on type or
    /// default.
    pub fn build(params: Vec<ParamSource>) -> Result<Self, ConfigError> {
        Self::build_with(params, PlanOptions::default())
    }

    /// Build a plan with explicit [`PlanOptions`].
    ///
    /// # Errors
    ///
    /// Same conditions as [`BindingPlan::build`].
    pub fn build_with(params: Vec<ParamSource>, options: PlanOptions) -> Result<Self, ConfigError> {
        for (idx, param) in params.iter().enumerate() {
            if params[..idx].iter().any(|p| p.name() == param.name()) {
                return Err(ConfigError::DuplicateParameter(param.name().to_owned()));
            }
        }

        let mut entries: Vec<SchemaEntry> = Vec::new();
        let mut owners: IndexMap<(String, Location), EntryOwners> = IndexMap::new();

        for (param_idx, param) in params.iter().enumerate() {
            let location = param.location();
            for field in param.fields() {
                let key = (field.name().to_owned(), location);
                match owners.get_mut(&key) {
                    None => {
                        entries.push(SchemaEntry {
                            name: field.name().to_owned(),
                            location,
                            ty: field.ty(),
                            default: field.default().cloned(),
                        });
                        owners.insert(
                            key,
                            EntryOwners {
                                entry: entries.len() - 1,
                                params: vec![param_idx],
                            },
                        );
                    }
                    Some(existing) => {
                        let entry = &entries[existing.entry];
                        if entry.ty != field.ty() {
                            return Err(ConfigError::ConflictingDeclaration {
                                name: field.name().to_owned(),
                                location,
                                reason: format!(
                                    "declared as {} and {}",
                                    entry.ty.schema_name(),
                                    field.ty().schema_name()
                                ),
                            });
                        }
                        if entry.default.as_ref() != field.default() {
                            return Err(ConfigError::ConflictingDeclaration {
                                name: field.name().to_owned(),
                                location,
                                reason: "declared defaults disagree".to_owned(),
                            });
                        }
                        if !existing.params.contains(&param_idx) {
                            existing.params.push(param_idx);
                        }
                    }
                }
            }
        }

        debug!(
            params = params.len(),
            entries = entries.len(),
            "binding plan built"
        );

        Ok(Self {
            params,
            entries,
            owners,
            options,
        })
    }

    /// Published entries, in first-declaration order.
    #[must_use]
    pub fn entries(&self) -> &[SchemaEntry] {
        &self.entries
    }

    /// The declared parameters, in declaration order.
    #[must_use]
    pub fn params(&self) -> &[ParamSource] {
        &self.params
    }

    /// Options this plan was built with.
    #[must_use]
    pub fn options(&self) -> PlanOptions {
        self.options
    }

    /// Indices of every parameter that declared `(name, location)`.
    ///
    /// A merged entry with more than one owner means the shared raw value
    /// is bound to each of them independently at request time.
    #[must_use]
    pub fn shared_owners(&self, name: &str, location: Location) -> &[usize] {
        self.owners
            .get(&(name.to_owned(), location))
            .map(|o| o.params.as_slice())
            .unwrap_or(&[])
    }

    /// Whether any parameter of this handler declares `name` at `location`.
    pub(crate) fn declares(&self, location: Location, name: &str) -> bool {
        self.owners
            .keys()
            .any(|(n, l)| *l == location && n == name)
    }
}
