//! Property tests for schema merging.
//!
//! Generated declarations keep each field name's type and default
//! consistent (both derive from the name), so merging never conflicts and
//! the structural properties can be checked over arbitrary parameter
//! lists.

use proptest::prelude::*;
use reqparam_core::{
    BindingPlan, DefaultCoercer, FieldSpec, Location, ModelSchema, ParamSource, RawRequest,
    TypeSpec,
};
use serde_json::{json, Value};
use std::collections::HashSet;

fn ty_for(name: &str) -> TypeSpec {
    match name.as_bytes()[0] {
        b'a' => TypeSpec::Integer,
        b'b' => TypeSpec::String,
        b'c' => TypeSpec::Number,
        _ => TypeSpec::Boolean,
    }
}

fn default_for(ty: TypeSpec) -> Value {
    match ty {
        TypeSpec::Integer => json!(0),
        TypeSpec::String => json!("d"),
        TypeSpec::Number => json!(0.5),
        TypeSpec::Boolean => json!(false),
    }
}

// Single-letter names get defaults, two-letter names are required.
fn field_for(name: &str) -> FieldSpec {
    let ty = ty_for(name);
    let field = FieldSpec::new(name, ty);
    if name.len() == 1 {
        field.with_default(default_for(ty))
    } else {
        field
    }
}

fn supplied_value(ty: TypeSpec) -> &'static str {
    match ty {
        TypeSpec::Integer => "7",
        TypeSpec::String => "text",
        TypeSpec::Number => "1.25",
        TypeSpec::Boolean => "true",
    }
}

fn location_strategy() -> impl Strategy<Value = Location> {
    prop_oneof![
        Just(Location::Query),
        Just(Location::Header),
        Just(Location::Cookie),
    ]
}

fn params_strategy() -> impl Strategy<Value = Vec<ParamSource>> {
    proptest::collection::vec(
        (
            location_strategy(),
            proptest::collection::btree_set("[a-e]{1,2}", 1..4),
        ),
        1..5,
    )
    .prop_map(|specs| {
        specs
            .into_iter()
            .enumerate()
            .map(|(idx, (location, names))| {
                let model = names
                    .iter()
                    .fold(ModelSchema::new(format!("M{idx}")), |model, name| {
                        model.field(field_for(name))
                    });
                ParamSource::model(format!("p{idx}"), location, model)
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn rebuilding_yields_identical_entries(params in params_strategy()) {
        let first = BindingPlan::build(params.clone()).unwrap();
        let second = BindingPlan::build(params).unwrap();
        prop_assert_eq!(first.entries(), second.entries());
    }

    #[test]
    fn no_two_entries_share_name_and_location(params in params_strategy()) {
        let plan = BindingPlan::build(params).unwrap();
        let mut seen = HashSet::new();
        for entry in plan.entries() {
            prop_assert!(
                seen.insert((entry.name().to_owned(), entry.location())),
                "duplicate entry for {}.{}",
                entry.location(),
                entry.name()
            );
        }
    }

    #[test]
    fn entry_order_is_first_occurrence_order(params in params_strategy()) {
        let plan = BindingPlan::build(params.clone()).unwrap();

        let mut expected: Vec<(String, Location)> = Vec::new();
        for param in &params {
            for field in param.fields() {
                let key = (field.name().to_owned(), param.location());
                if !expected.contains(&key) {
                    expected.push(key);
                }
            }
        }

        let got: Vec<_> = plan
            .entries()
            .iter()
            .map(|e| (e.name().to_owned(), e.location()))
            .collect();
        prop_assert_eq!(expected, got);
    }

    #[test]
    fn every_declaring_param_owns_its_entries(params in params_strategy()) {
        let plan = BindingPlan::build(params.clone()).unwrap();
        for (idx, param) in params.iter().enumerate() {
            for field in param.fields() {
                prop_assert!(
                    plan.shared_owners(field.name(), param.location()).contains(&idx),
                    "param {idx} missing from owners of {}",
                    field.name()
                );
            }
        }
    }

    #[test]
    fn fully_supplied_requests_always_validate(params in params_strategy()) {
        let plan = BindingPlan::build(params).unwrap();

        let mut raw = RawRequest::new();
        for entry in plan.entries() {
            raw.insert(entry.location(), entry.name(), supplied_value(entry.ty()));
        }

        prop_assert!(plan.bind(&raw, &DefaultCoercer).is_ok());
    }
}
