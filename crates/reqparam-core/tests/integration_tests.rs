//! End-to-end binding tests.
//!
//! Drives full apps through the test client: multiple aggregate models per
//! handler, model/scalar mixes, co-located and cross-location declarations,
//! the extra-field policy, and the error-report wire format.

use pretty_assertions::assert_eq;
use reqparam_core::testing::TestClient;
use reqparam_core::{
    App, ExtraFieldScope, FieldSpec, Location, ModelSchema, ParamSource, PlanOptions, TypeSpec,
};
use serde_json::{json, Value};

fn model1() -> ModelSchema {
    ModelSchema::new("Model").field(FieldSpec::new("field1", TypeSpec::Integer).with_default(0))
}

fn model2() -> ModelSchema {
    ModelSchema::new("Model2").field(FieldSpec::new("field2", TypeSpec::Integer).with_default(0))
}

fn model_no_extra() -> ModelSchema {
    ModelSchema::new("ModelNoExtra")
        .field(FieldSpec::new("field1", TypeSpec::Integer).with_default(0))
        .forbid_extra()
}

fn int_scalar(location: Location, name: &str) -> ParamSource {
    ParamSource::scalar(
        location,
        FieldSpec::new(name, TypeSpec::Integer).with_default(0),
    )
}

/// One app covering every sampled route shape, for all three locations.
fn sample_app() -> App {
    let mut app = App::new();

    for location in [Location::Query, Location::Header, Location::Cookie] {
        let tag = location.as_str();

        app = app
            .get(
                format!("/{tag}-models/"),
                vec![
                    ParamSource::model("model1", location, model1()),
                    ParamSource::model("model2", location, model2()),
                ],
                |p| json!({ "field1": p.field("model1", "field1"), "field2": p.field("model2", "field2") }),
            )
            .unwrap()
            .get(
                format!("/{tag}-argument/"),
                vec![
                    ParamSource::model("model1", location, model1()),
                    int_scalar(location, "field2"),
                ],
                |p| json!({ "field1": p.field("model1", "field1"), "field2": p.get("field2") }),
            )
            .unwrap()
            .get(
                format!("/{tag}-arguments/"),
                vec![int_scalar(location, "field1"), int_scalar(location, "field2")],
                |p| json!({ "field1": p.get("field1"), "field2": p.get("field2") }),
            )
            .unwrap();
    }

    app.get(
        "/mixed/",
        vec![
            ParamSource::model("model1", Location::Query, model1()),
            ParamSource::model("model2", Location::Header, model2()),
        ],
        |p| json!({ "field1": p.field("model1", "field1"), "field2": p.field("model2", "field2") }),
    )
    .unwrap()
    .get(
        "/duplicate/",
        vec![
            ParamSource::model("model", Location::Query, model1()),
            ParamSource::model("same_model", Location::Query, model1()),
        ],
        |p| json!({ "field1": p.field("model", "field1"), "duplicate": p.field("same_model", "field1") }),
    )
    .unwrap()
    .get(
        "/duplicate2/",
        vec![
            ParamSource::model("model", Location::Query, model1()),
            ParamSource::model("same_model", Location::Header, model1()),
        ],
        |p| json!({ "field1": p.field("model", "field1"), "duplicate": p.field("same_model", "field1") }),
    )
    .unwrap()
    .get(
        "/duplicate-no-extra/",
        vec![
            ParamSource::model("model", Location::Query, model1()),
            ParamSource::model("same_model", Location::Query, model_no_extra()),
        ],
        |p| json!({ "field1": p.field("model", "field1"), "duplicate": p.field("same_model", "field1") }),
    )
    .unwrap()
    .get(
        "/no-extra/",
        vec![
            ParamSource::model("model1", Location::Query, model_no_extra()),
            ParamSource::model("model2", Location::Query, model2()),
        ],
        |_| Value::Null,
    )
    .unwrap()
    .get("/numbers/", vec![], |_| {
        json!({ "numbers": [3.14, f64::INFINITY, f64::NAN, 2.72] })
    })
    .unwrap()
}

#[test]
fn query_routes_bind_both_fields() {
    let client = TestClient::new(sample_app());
    for path in ["/query-models/", "/query-argument/", "/query-arguments/"] {
        let response = client
            .get(path)
            .query("field1", "0")
            .query("field2", "1")
            .send();
        assert_eq!(response.status_code(), 200, "{path}");
        assert_eq!(
            response.json::<Value>().unwrap(),
            json!({"field1": 0, "field2": 1}),
            "{path}"
        );
    }
}

#[test]
fn header_routes_bind_both_fields() {
    let client = TestClient::new(sample_app());
    for path in ["/header-models/", "/header-argument/", "/header-arguments/"] {
        let response = client
            .get(path)
            .header("field1", "0")
            .header("field2", "1")
            .send();
        assert_eq!(response.status_code(), 200, "{path}");
        assert_eq!(
            response.json::<Value>().unwrap(),
            json!({"field1": 0, "field2": 1}),
            "{path}"
        );
    }
}

#[test]
fn cookie_routes_bind_both_fields() {
    let client = TestClient::new(sample_app());
    client.set_cookie("field1", "0");
    client.set_cookie("field2", "1");

    for path in ["/cookie-models/", "/cookie-argument/", "/cookie-arguments/"] {
        let response = client.get(path).send();
        assert_eq!(response.status_code(), 200, "{path}");
        assert_eq!(
            response.json::<Value>().unwrap(),
            json!({"field1": 0, "field2": 1}),
            "{path}"
        );
    }
}

#[test]
fn omitted_fields_fall_back_to_defaults() {
    let client = TestClient::new(sample_app());
    let response = client.get("/query-models/").send();
    assert_eq!(response.status_code(), 200);
    assert_eq!(
        response.json::<Value>().unwrap(),
        json!({"field1": 0, "field2": 0})
    );
}

#[test]
fn mixed_locations_bind_independently() {
    let client = TestClient::new(sample_app());
    let response = client
        .get("/mixed/")
        .query("field1", "0")
        .header("field2", "1")
        .send();
    assert_eq!(response.status_code(), 200);
    assert_eq!(
        response.json::<Value>().unwrap(),
        json!({"field1": 0, "field2": 1})
    );
}

#[test]
fn duplicate_models_share_one_raw_value() {
    let client = TestClient::new(sample_app());
    for path in ["/duplicate/", "/duplicate2/", "/duplicate-no-extra/"] {
        let response = client.get(path).query("field1", "0").send();
        assert_eq!(response.status_code(), 200, "{path}");
        assert_eq!(
            response.json::<Value>().unwrap(),
            json!({"field1": 0, "duplicate": 0}),
            "{path}"
        );
    }
}

#[test]
fn same_name_across_locations_binds_per_location() {
    let client = TestClient::new(sample_app());
    let response = client
        .get("/duplicate2/")
        .query("field1", "0")
        .header("field1", "1")
        .send();
    assert_eq!(response.status_code(), 200);
    assert_eq!(
        response.json::<Value>().unwrap(),
        json!({"field1": 0, "duplicate": 1})
    );
}

#[test]
fn sibling_owned_field_is_rejected_by_a_forbidding_model() {
    let client = TestClient::new(sample_app());
    let response = client
        .get("/no-extra/")
        .query("field1", "0")
        .query("field2", "1")
        .send();

    assert_eq!(response.status_code(), 422);
    assert_eq!(
        response.json::<Value>().unwrap(),
        json!({
            "detail": [
                {
                    "input": "1",
                    "loc": ["query", "field2"],
                    "msg": "Extra inputs are not permitted",
                    "type": "extra_forbidden",
                }
            ]
        })
    );
}

#[test]
fn declared_union_scope_disables_the_asymmetry() {
    let app = App::new()
        .get_with(
            "/no-extra/",
            vec![
                ParamSource::model("model1", Location::Query, model_no_extra()),
                ParamSource::model("model2", Location::Query, model2()),
            ],
            PlanOptions {
                extra_field_scope: ExtraFieldScope::DeclaredUnion,
            },
            |p| json!({ "field1": p.field("model1", "field1"), "field2": p.field("model2", "field2") }),
        )
        .unwrap();

    let response = TestClient::new(app)
        .get("/no-extra/")
        .query("field1", "0")
        .query("field2", "1")
        .send();
    assert_eq!(response.status_code(), 200);
    assert_eq!(
        response.json::<Value>().unwrap(),
        json!({"field1": 0, "field2": 1})
    );
}

#[test]
fn every_invalid_field_is_reported_at_once() {
    let client = TestClient::new(sample_app());
    let response = client
        .get("/query-arguments/")
        .query("field1", "abc")
        .query("field2", "def")
        .send();

    assert_eq!(response.status_code(), 422);
    let report = response.json::<Value>().unwrap();
    let detail = report["detail"].as_array().unwrap();
    assert_eq!(detail.len(), 2);
    assert_eq!(detail[0]["loc"], json!(["query", "field1"]));
    assert_eq!(detail[0]["type"], json!("int_type"));
    assert_eq!(detail[0]["input"], json!("abc"));
    assert_eq!(detail[1]["loc"], json!(["query", "field2"]));
}

#[test]
fn unknown_paths_return_404() {
    let client = TestClient::new(sample_app());
    let response = client.get("/nope/").send();
    assert_eq!(response.status_code(), 404);
    assert_eq!(
        response.json::<Value>().unwrap(),
        json!({"detail": "Not Found"})
    );
}

#[test]
fn non_finite_numbers_render_as_null() {
    let client = TestClient::new(sample_app());
    let response = client.get("/numbers/").send();
    assert_eq!(response.status_code(), 200);
    assert_eq!(
        response.json::<Value>().unwrap(),
        json!({"numbers": [3.14, null, null, 2.72]})
    );
}

#[test]
fn published_defaults_round_trip_through_validation() {
    let app = sample_app();

    for route in app.routes() {
        // The forbid-extras asymmetry intentionally breaks this property:
        // a sibling entry's default would register as an extra key there.
        if route.plan().params().iter().any(ParamSource::forbids_extra) {
            continue;
        }

        let mut raw = reqparam_core::RawRequest::new();
        for entry in route.plan().entries() {
            let rendered = match entry.default() {
                Some(Value::String(s)) => s.clone(),
                Some(other) => other.to_string(),
                None => continue,
            };
            raw.insert(entry.location(), entry.name(), rendered);
        }

        let response = app.dispatch(route.path(), &raw);
        assert_eq!(response.status().as_u16(), 200, "{}", route.path());
    }
}
