//! End-to-end tests of the user info endpoints over the memory backend.

#![cfg(feature = "memory")]

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use chrono::{TimeZone, Utc};
use serde_json::{Value, json};
use userinfo_persistence::core::UserInfoStorage;
use userinfo_persistence::types::UserInfo;
use userinfo_rest::{ServerConfig, create_app_with_shared_storage};

use common::failing::{FailingBackend, Failure};
use common::harness::RestTestHarness;

fn alice() -> Value {
    json!({
        "name": "Alice",
        "job": "Engineer",
        "childNames": ["Bob"],
        "comment": "n/a"
    })
}

fn failing_server(failure: Failure) -> TestServer {
    let app = create_app_with_shared_storage(
        Arc::new(FailingBackend(failure)),
        ServerConfig::for_testing(),
    );
    TestServer::new(app).expect("Failed to create test server")
}

async fn seed_family(harness: &RestTestHarness) {
    let created_at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    for (id, name, job, children) in [
        ("1", "Alice Smith", "Engineer", vec!["Bob"]),
        ("2", "Alice Jones", "Manager", vec![]),
        ("3", "Carol White", "Engineer", vec!["Dave", "Erin"]),
    ] {
        let children = children.into_iter().map(String::from).collect();
        harness
            .seed(UserInfo::new(id, name, job, children, "").with_created_at(created_at))
            .await;
    }
}

fn ids(body: &Value) -> Vec<String> {
    let mut ids: Vec<String> = body
        .as_array()
        .expect("search response is not an array")
        .iter()
        .map(|r| r["id"].as_str().unwrap().to_string())
        .collect();
    ids.sort();
    ids
}

// ============================================================================
// Create / Read
// ============================================================================

#[tokio::test]
async fn test_create_returns_uuid() {
    let harness = RestTestHarness::new();

    let response = harness.server.post("/users").json(&alice()).await;

    response.assert_status(StatusCode::CREATED);
    let id = response.json::<Value>()["id"].as_str().unwrap().to_string();
    assert!(uuid::Uuid::parse_str(&id).is_ok());
    assert_eq!(harness.backend.len(), 1);
}

#[tokio::test]
async fn test_read_returns_created_fields() {
    let harness = RestTestHarness::new();
    let id = harness.create_user(alice()).await;

    let response = harness
        .server
        .get("/users")
        .add_query_param("id", &id)
        .await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["id"], id);
    assert_eq!(body["name"], "Alice");
    assert_eq!(body["job"], "Engineer");
    assert_eq!(body["childNames"], json!(["Bob"]));
    assert_eq!(body["comment"], "n/a");
    assert!(body["created_at"].is_string());
}

#[tokio::test]
async fn test_create_with_missing_fields_uses_defaults() {
    let harness = RestTestHarness::new();
    let id = harness.create_user(json!({ "name": "Alice" })).await;

    let record = harness.backend.find_one(&id).await.unwrap();
    assert_eq!(record.job, "");
    assert!(record.child_names.is_empty());
}

#[tokio::test]
async fn test_create_rejects_malformed_body() {
    let harness = RestTestHarness::new();

    let response = harness
        .server
        .post("/users")
        .content_type("application/json")
        .text("{not json")
        .await;

    response.assert_status_bad_request();
    assert!(response.json::<Value>()["message"].is_string());
    assert!(harness.backend.is_empty());
}

#[tokio::test]
async fn test_create_rejects_wrong_field_type() {
    let harness = RestTestHarness::new();

    let response = harness
        .server
        .post("/users")
        .json(&json!({ "name": "Alice", "childNames": "Bob" }))
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_create_conflict_returns_409() {
    let server = failing_server(Failure::Conflict);

    let response = server.post("/users").json(&alice()).await;

    response.assert_status(StatusCode::CONFLICT);
    let message = response.json::<Value>()["message"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(message.contains("already exists"));
}

#[tokio::test]
async fn test_read_missing_returns_500() {
    let harness = RestTestHarness::new();

    let response = harness
        .server
        .get("/users")
        .add_query_param("id", "missing")
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.json::<Value>(),
        json!({ "message": "user info not found: missing" })
    );
}

#[tokio::test]
async fn test_read_without_id_returns_400() {
    let harness = RestTestHarness::new();

    harness.server.get("/users").await.assert_status_bad_request();
    harness
        .server
        .get("/users")
        .add_query_param("id", "")
        .await
        .assert_status_bad_request();
    harness
        .server
        .get("/users")
        .add_query_param("id", " ")
        .await
        .assert_status_bad_request();
}

// ============================================================================
// Update / Delete
// ============================================================================

#[tokio::test]
async fn test_update_overwrites_fields_and_keeps_timestamp() {
    let harness = RestTestHarness::new();
    let id = harness.create_user(alice()).await;
    let before = harness.backend.find_one(&id).await.unwrap();

    let response = harness
        .server
        .put(&format!("/users/{}", id))
        .json(&json!({
            "name": "Alice",
            "job": "Manager",
            "childNames": ["Bob", "Carl"],
            "comment": "promoted"
        }))
        .await;

    response.assert_status(StatusCode::NO_CONTENT);
    let after = harness.backend.find_one(&id).await.unwrap();
    assert_eq!(after.job, "Manager");
    assert_eq!(after.child_names, vec!["Bob", "Carl"]);
    assert_eq!(after.created_at, before.created_at);
}

#[tokio::test]
async fn test_update_missing_returns_500() {
    let harness = RestTestHarness::new();

    harness
        .server
        .put("/users/missing")
        .json(&alice())
        .await
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert!(harness.backend.is_empty());
}

#[tokio::test]
async fn test_delete_then_read_returns_500() {
    let harness = RestTestHarness::new();
    let id = harness.create_user(alice()).await;

    harness
        .server
        .delete(&format!("/users/{}", id))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    harness
        .server
        .get("/users")
        .add_query_param("id", &id)
        .await
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR);

    harness
        .server
        .delete(&format!("/users/{}", id))
        .await
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR);
}

// ============================================================================
// Search
// ============================================================================

#[tokio::test]
async fn test_search_by_match() {
    let harness = RestTestHarness::new();
    seed_family(&harness).await;

    let response = harness
        .server
        .get("/users-by")
        .add_query_param("queryType", "match")
        .add_query_param("key", "name")
        .add_query_param("value", "alice")
        .await;

    response.assert_status_ok();
    assert_eq!(ids(&response.json::<Value>()), vec!["1", "2"]);
}

#[tokio::test]
async fn test_search_by_prefix_on_child_names() {
    let harness = RestTestHarness::new();
    seed_family(&harness).await;

    let response = harness
        .server
        .get("/users-by")
        .add_query_param("queryType", "prefix")
        .add_query_param("key", "childNames")
        .add_query_param("value", "da")
        .await;

    response.assert_status_ok();
    assert_eq!(ids(&response.json::<Value>()), vec!["3"]);
}

#[tokio::test]
async fn test_search_by_keyword_subfield_matches_whole_value() {
    let harness = RestTestHarness::new();
    harness
        .seed(UserInfo::new("a", "Alice", "Engineer", vec![], ""))
        .await;
    harness
        .seed(UserInfo::new("b", "Alice Cooper", "Singer", vec![], ""))
        .await;

    let analyzed = harness
        .server
        .get("/users-by")
        .add_query_param("queryType", "term")
        .add_query_param("key", "name")
        .add_query_param("value", "Alice")
        .await;
    analyzed.assert_status_ok();
    assert_eq!(analyzed.json::<Value>(), json!([]));

    let response = harness
        .server
        .get("/users-by")
        .add_query_param("queryType", "term")
        .add_query_param("key", "name.keyword")
        .add_query_param("value", "Alice")
        .await;
    response.assert_status_ok();
    assert_eq!(ids(&response.json::<Value>()), vec!["a"]);
}

#[tokio::test]
async fn test_search_by_no_hits_returns_empty_array() {
    let harness = RestTestHarness::new();
    seed_family(&harness).await;

    let response = harness
        .server
        .get("/users-by")
        .add_query_param("queryType", "term")
        .add_query_param("key", "job")
        .add_query_param("value", "astronaut")
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), json!([]));
}

#[tokio::test]
async fn test_search_by_rejects_bad_parameters() {
    let harness = RestTestHarness::new();

    // missing parameter
    harness
        .server
        .get("/users-by")
        .add_query_param("queryType", "match")
        .add_query_param("key", "name")
        .await
        .assert_status_bad_request();

    // blank parameter
    let response = harness
        .server
        .get("/users-by")
        .add_query_param("queryType", "match")
        .add_query_param("key", "name")
        .add_query_param("value", " ")
        .await;
    response.assert_status_bad_request();
    assert_eq!(
        response.json::<Value>(),
        json!({ "message": "bad request: query parameter 'value' is required" })
    );

    // unknown query type
    let response = harness
        .server
        .get("/users-by")
        .add_query_param("queryType", "script")
        .add_query_param("key", "name")
        .add_query_param("value", "x")
        .await;
    response.assert_status_bad_request();
    let message = response.json::<Value>()["message"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(message.contains("script"));

    // unknown field
    harness
        .server
        .get("/users-by")
        .add_query_param("queryType", "match")
        .add_query_param("key", "salary")
        .add_query_param("value", "x")
        .await
        .assert_status_bad_request();
}

#[tokio::test]
async fn test_search_by_query() {
    let harness = RestTestHarness::new();
    seed_family(&harness).await;

    let query = json!({ "query": { "term": { "job.keyword": "Engineer" } } });
    let response = harness
        .server
        .get("/users-by-query")
        .add_query_param("jsonQuery", query.to_string())
        .await;

    response.assert_status_ok();
    assert_eq!(ids(&response.json::<Value>()), vec!["1", "3"]);
}

#[tokio::test]
async fn test_search_by_query_honors_size() {
    let harness = RestTestHarness::new();
    seed_family(&harness).await;

    let query = json!({ "query": { "match_all": {} }, "size": 2 });
    let response = harness
        .server
        .get("/users-by-query")
        .add_query_param("jsonQuery", query.to_string())
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>().as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_search_by_query_rejects_bad_documents() {
    let harness = RestTestHarness::new();

    for json_query in [
        "{not json".to_string(),
        "[1, 2]".to_string(),
        json!({ "query": { "match_all": {} }, "aggs": {} }).to_string(),
        json!({ "script_fields": {} }).to_string(),
        json!({ "query": { "script": { "script": { "source": "true" } } } }).to_string(),
        json!({
            "query": {
                "function_score": {
                    "query": { "match_all": {} },
                    "script_score": { "script": { "source": "1" } }
                }
            }
        })
        .to_string(),
        json!({ "sort": { "_script": { "type": "number", "script": { "source": "1" } } } })
            .to_string(),
    ] {
        let response = harness
            .server
            .get("/users-by-query")
            .add_query_param("jsonQuery", &json_query)
            .await;
        assert_eq!(
            response.status_code(),
            StatusCode::BAD_REQUEST,
            "expected 400 for {}",
            json_query
        );
    }

    harness
        .server
        .get("/users-by-query")
        .await
        .assert_status_bad_request();
}

// ============================================================================
// Storage failures
// ============================================================================

#[tokio::test]
async fn test_storage_timeout_returns_500() {
    let server = failing_server(Failure::Timeout);

    let response = server.get("/users").add_query_param("id", "1").await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let message = response.json::<Value>()["message"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(message.contains("timed out"));
}

#[tokio::test]
async fn test_storage_unavailable_returns_500() {
    let server = failing_server(Failure::Unavailable);

    server
        .delete("/users/1")
        .await
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR);
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_endpoints() {
    let harness = RestTestHarness::new();

    let response = harness.server.get("/health").await;
    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["backend"], "memory");
    assert_eq!(body["target"], Value::Null);
    assert_eq!(body["queryTypes"].as_array().unwrap().len(), 7);
    assert!(
        body["searchableFields"]
            .as_array()
            .unwrap()
            .contains(&json!("name.keyword"))
    );
    assert_eq!(body["maxResultWindow"], 10000);

    harness.server.get("/_liveness").await.assert_status_ok();

    let response = harness.server.get("/_readiness").await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["status"], "ready");
}

#[tokio::test]
async fn test_readiness_reports_unhealthy_backend() {
    let server = failing_server(Failure::Unavailable);

    let response = server.get("/_readiness").await;
    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let message = response.json::<Value>()["message"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(message.contains("failing not ready"));
    server.get("/_liveness").await.assert_status_ok();
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let harness = RestTestHarness::new();

    let response = harness.server.get("/_liveness").await;

    assert!(response.headers().contains_key("x-request-id"));
}
