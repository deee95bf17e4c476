mod common;

use axum::http::StatusCode;
use serde_json::json;

use api_registry::models::{EndpointState, HttpMethod, OwnerRef};
use common::{Factory, TestApp};

#[tokio::test]
async fn test_register_api() {
    let app = TestApp::new().await;

    let response = app
        .server
        .post("/apis")
        .json(&json!({
            "id": "orders-get",
            "name": "Orders",
            "groupID": "g1",
            "path": "/orders",
            "host": "localhost",
            "port": 8080,
            "allowGet": true,
            "state": "running"
        }))
        .await;

    response.assert_status(StatusCode::CREATED);

    let body: serde_json::Value = response.json();
    assert_eq!(body["id"].as_str().unwrap(), "orders-get");
    assert_eq!(body["groupID"].as_str().unwrap(), "g1");
    assert_eq!(body["charset"].as_str().unwrap(), "UTF-8");
    assert_eq!(body["requestTimeout"].as_u64().unwrap(), 60000);
    assert!(body["allowGet"].as_bool().unwrap());
    assert!(!body["allowPost"].as_bool().unwrap());

    let stored = app.state.registry.get("orders-get").unwrap();
    assert_eq!(stored.port, 8080);
    assert_eq!(stored.state, EndpointState::Running);
    assert!(stored.allows(HttpMethod::Get));
}

#[tokio::test]
async fn test_register_api_defaults() {
    let app = TestApp::new().await;

    let response = app
        .server
        .post("/apis")
        .json(&json!({ "id": "ep1", "path": "/ep1" }))
        .await;

    response.assert_status(StatusCode::CREATED);

    let body: serde_json::Value = response.json();
    assert_eq!(body["port"].as_u64().unwrap(), 80);
    assert_eq!(body["scheme"].as_str().unwrap(), "http");
    assert_eq!(body["state"].as_str().unwrap(), "init");
}

#[tokio::test]
async fn test_register_api_validation_error() {
    let app = TestApp::new().await;

    let response = app
        .server
        .post("/apis")
        .json(&json!({ "id": "", "path": "/x" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = app
        .server
        .post("/apis")
        .json(&json!({ "id": "ep1", "path": "/x", "port": 0 }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    assert!(app.state.registry.is_empty());
}

#[tokio::test]
async fn test_register_api_undecodable_body_is_validation_error() {
    let app = TestApp::new().await;

    let response = app
        .server
        .post("/apis")
        .json(&json!({ "id": "ep1", "path": "/x", "port": 70000 }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json();
    assert_eq!(body["error"].as_str().unwrap(), "Validation error");
    assert!(body["details"].as_str().unwrap().contains("port"));
    assert!(app.state.registry.is_empty());
}

#[tokio::test]
async fn test_patch_api_undecodable_body_is_validation_error() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    let record = factory.register();

    let response = app
        .server
        .patch(&format!("/apis/{}", record.id))
        .json(&json!({ "value": true }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_apis() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    factory.register_in_group("g1");
    factory.register_in_group("g1");
    factory.register_in_group("g2");

    let response = app.server.get("/apis").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["apis"].as_array().unwrap().len(), 3);

    let response = app.server.get("/apis").add_query_param("groupid", "g1").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let apis = body["apis"].as_array().unwrap();
    assert_eq!(apis.len(), 2);
    assert!(apis.iter().all(|a| a["groupID"] == "g1"));
}

#[tokio::test]
async fn test_list_apis_with_empty_group_is_empty() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    factory.register_in_group("g1");

    let response = app.server.get("/apis").add_query_param("groupid", "").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert!(body["apis"].as_array().unwrap().is_empty());

    let response = app.server.get("/apis").add_query_param("other", "1").await;
    let body: serde_json::Value = response.json();
    assert!(body["apis"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_list_apis_hides_owner() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    let record = factory
        .record()
        .with_owner(OwnerRef("controller-service-1".to_string()));
    app.state.registry.register(record.clone()).unwrap();

    let response = app.server.get(&format!("/apis/{}", record.id)).await;
    response.assert_status_ok();
    let body = response.text();
    assert!(!body.contains("controller-service-1"));

    // Still held locally
    assert!(app.state.registry.get(&record.id).unwrap().owner_ref.is_some());
}

#[tokio::test]
async fn test_get_api_not_found() {
    let app = TestApp::new().await;

    let response = app.server.get("/apis/missing").await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unregister_api() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    let record = factory.register();

    let response = app.server.delete(&format!("/apis/{}", record.id)).await;
    response.assert_status(StatusCode::NO_CONTENT);
    assert!(app.state.registry.get(&record.id).is_none());

    // Unknown ids are accepted
    let response = app.server.delete(&format!("/apis/{}", record.id)).await;
    response.assert_status(StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_patch_api() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    let record = factory.register();

    let response = app
        .server
        .patch(&format!("/apis/{}", record.id))
        .json(&json!({ "field": "allowPost", "value": true }))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert!(body["allowPost"].as_bool().unwrap());

    let response = app
        .server
        .patch(&format!("/apis/{}", record.id))
        .json(&json!({ "field": "state", "value": "stopped" }))
        .await;
    response.assert_status_ok();
    assert_eq!(
        app.state.registry.get(&record.id).unwrap().state,
        EndpointState::Stopped
    );
}

#[tokio::test]
async fn test_patch_api_unknown_field_is_ignored() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    let record = factory.register();

    let response = app
        .server
        .patch(&format!("/apis/{}", record.id))
        .json(&json!({ "field": "nonexistentField", "value": 1 }))
        .await;
    response.assert_status_ok();

    let response = app
        .server
        .patch(&format!("/apis/{}", record.id))
        .json(&json!({ "field": "port", "value": "not a number" }))
        .await;
    response.assert_status_ok();

    assert_eq!(app.state.registry.get(&record.id).unwrap(), record);
}

#[tokio::test]
async fn test_patch_api_not_found() {
    let app = TestApp::new().await;

    let response = app
        .server
        .patch("/apis/missing")
        .json(&json!({ "field": "name", "value": "x" }))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}
