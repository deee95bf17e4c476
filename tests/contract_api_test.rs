mod common;

use axum::http::StatusCode;
use serde_json::json;

use api_registry::models::EndpointState;
use common::{Factory, TestApp};

#[tokio::test]
async fn test_contract_empty_registry() {
    let app = TestApp::new().await;

    let response = app.server.get("/apis/swagger").await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["swagger"].as_str().unwrap(), "2.0");
    assert_eq!(body["info"]["title"].as_str().unwrap(), "Test APIs");
    assert!(body["paths"].as_object().unwrap().is_empty());
    assert_eq!(body["schemes"], json!(["http"]));
}

#[tokio::test]
async fn test_contract_lists_running_endpoints_only() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    let running = factory.register();
    let stopped = factory.record().with_state(EndpointState::Stopped);
    app.state.registry.register(stopped.clone()).unwrap();

    let response = app.server.get("/apis/swagger").await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    let paths = body["paths"].as_object().unwrap();
    assert!(paths.contains_key(&running.path));
    assert!(!paths.contains_key(&stopped.path));

    let operation = &body["paths"][&running.path]["get"];
    assert_eq!(operation["summary"].as_str().unwrap(), running.name);
    assert_eq!(
        operation["responses"]["200"]["description"].as_str().unwrap(),
        "OK"
    );
    assert_eq!(body["host"].as_str().unwrap(), "localhost:8080");
}

#[tokio::test]
async fn test_contract_scoped_by_id_and_group() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    let a = factory.register_in_group("g1");
    let b = factory.register_in_group("g2");

    let response = app.server.get("/apis/swagger").add_query_param("id", &a.id).await;
    let body: serde_json::Value = response.json();
    let paths = body["paths"].as_object().unwrap();
    assert_eq!(paths.len(), 1);
    assert!(paths.contains_key(&a.path));

    let response = app
        .server
        .get("/apis/swagger")
        .add_query_param("groupid", "g2")
        .await;
    let body: serde_json::Value = response.json();
    let paths = body["paths"].as_object().unwrap();
    assert_eq!(paths.len(), 1);
    assert!(paths.contains_key(&b.path));
}

#[tokio::test]
async fn test_contract_renders_metadata() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    let record = factory.register();

    let response = app
        .server
        .put(&format!("/apis/{}/metadata", record.id))
        .json(&json!({
            "description": { "get": "Find orders" },
            "parameters": {
                "get": [
                    { "name": "status", "description": "Order status", "required": false,
                      "type": "string", "position": "query" }
                ]
            },
            "respInfos": {
                "get": [
                    { "code": "200", "description": "Orders found", "type": "array", "ref": "Order" }
                ]
            },
            "respModels": [
                { "name": "Order", "contentType": ["application/xml"],
                  "properties": { "id": { "type": "integer", "format": "int64" } } }
            ]
        }))
        .await;
    response.assert_status(StatusCode::NO_CONTENT);

    let response = app.server.get("/apis/swagger").await;
    let body: serde_json::Value = response.json();
    let operation = &body["paths"][&record.path]["get"];

    assert_eq!(operation["description"].as_str().unwrap(), "Find orders");
    assert_eq!(operation["parameters"][0]["in"].as_str().unwrap(), "query");
    assert_eq!(
        operation["responses"]["200"]["schema"],
        json!({ "type": "array", "items": { "$ref": "#/definitions/Order" } })
    );
    let produces = operation["produces"].as_array().unwrap();
    assert!(produces.contains(&json!("application/xml")));
    assert_eq!(
        body["definitions"]["Order"]["properties"]["id"]["type"]
            .as_str()
            .unwrap(),
        "integer"
    );

    // Removing the metadata falls back to the defaults
    let response = app
        .server
        .delete(&format!("/apis/{}/metadata", record.id))
        .await;
    response.assert_status(StatusCode::NO_CONTENT);

    let response = app.server.get("/apis/swagger").await;
    let body: serde_json::Value = response.json();
    assert!(body["definitions"].as_object().unwrap().is_empty());
}
