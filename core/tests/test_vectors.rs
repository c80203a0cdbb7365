//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! One file per resource. Each case names an operation, its inputs, the
//! request the client must build, a simulated response and either the parsed
//! record(s) or the error it must produce. Bodies are compared as parsed JSON
//! so field order does not matter.

use std::fmt::Debug;

use fleet_core::{
    ApiClient, ApiError, HttpMethod, HttpRequest, HttpResponse, Places, Resource, Units, Users,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

const BASE_URL: &str = "http://localhost:3000";

fn client() -> ApiClient {
    ApiClient::new(BASE_URL)
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn check_request(name: &str, req: &HttpRequest, expected: &Value) {
    assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
    assert_eq!(req.url, format!("{BASE_URL}{}", expected["path"].as_str().unwrap()), "{name}: url");
    assert_eq!(
        req.headers,
        vec![("content-type".to_string(), "application/json".to_string())],
        "{name}: headers"
    );

    match &expected["body"] {
        Value::Null => assert!(req.body.is_none(), "{name}: body should be None"),
        body => {
            let sent: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
            assert_eq!(&sent, body, "{name}: body");
        }
    }
}

fn simulated(case: &Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse {
        status: sim["status"].as_u64().unwrap() as u16,
        headers: Vec::new(),
        body: sim["body"].as_str().unwrap().to_string(),
    }
}

fn check_outcome<T>(name: &str, case: &Value, result: Result<T, ApiError>)
where
    T: DeserializeOwned + PartialEq + Debug,
{
    if let Some(expected) = case.get("expected_error") {
        let err = result.unwrap_err();
        let status = expected["status"].as_u64().unwrap() as u16;
        assert_eq!(err.status(), Some(status), "{name}: status");
        assert_eq!(err.is_not_found(), status == 404, "{name}: not found");
        assert_eq!(err.message(), expected["message"].as_str(), "{name}: message");
    } else {
        let parsed = result.unwrap_or_else(|err| panic!("{name}: unexpected error {err:?}"));
        let expected: T = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(parsed, expected, "{name}: parsed result");
    }
}

fn run_vectors<R>(raw: &str)
where
    R: Resource,
    R::Record: PartialEq,
    R::Create: DeserializeOwned,
    R::Update: DeserializeOwned,
{
    let vectors: Value = serde_json::from_str(raw).unwrap();
    assert_eq!(vectors["resource"], R::PATH);

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let id = case["input_id"].as_i64();
        let expected_req = &case["expected_request"];
        let response = simulated(case);

        match case["operation"].as_str().unwrap() {
            "list" => {
                check_request(name, &c.build_list::<R>(), expected_req);
                check_outcome(name, case, c.parse_list::<R>(response));
            }
            "get" => {
                check_request(name, &c.build_get::<R>(id.unwrap()), expected_req);
                check_outcome(name, case, c.parse_record::<R>(response));
            }
            "create" => {
                let input: R::Create = serde_json::from_value(case["input"].clone()).unwrap();
                check_request(name, &c.build_create::<R>(&input).unwrap(), expected_req);
                check_outcome(name, case, c.parse_record::<R>(response));
            }
            "update" => {
                let input: R::Update = serde_json::from_value(case["input"].clone()).unwrap();
                let req = c.build_update::<R>(id.unwrap(), &input).unwrap();
                check_request(name, &req, expected_req);
                check_outcome(name, case, c.parse_record::<R>(response));
            }
            "delete" => {
                check_request(name, &c.build_delete::<R>(id.unwrap()), expected_req);
                check_outcome(name, case, c.parse_empty(response));
            }
            other => panic!("{name}: unknown operation: {other}"),
        }
    }
}

#[test]
fn user_test_vectors() {
    run_vectors::<Users>(include_str!("../../test-vectors/users.json"));
}

#[test]
fn unit_test_vectors() {
    run_vectors::<Units>(include_str!("../../test-vectors/units.json"));
}

#[test]
fn place_test_vectors() {
    run_vectors::<Places>(include_str!("../../test-vectors/places.json"));
}
