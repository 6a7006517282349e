//! Integration tests for the streamable HTTP transport.
//!
//! Drives the axum router in-process (no sockets) with a fully built
//! server: registry, capability patch and session management together.

use std::sync::Arc;

use axum::body::Body;
use axum::Router;
use http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use linode_mcp_server::bootstrap::build_server;
use linode_mcp_server::config::{ServerOptions, TransportOptions};
use linode_mcp_server::mcp::transport::http::{router, SESSION_HEADER};
use linode_mcp_server::tools::ToolCategory;

fn test_app(categories: Option<Vec<ToolCategory>>) -> Router {
    let options = ServerOptions {
        token: Some("test-token".to_string()),
        enabled_categories: categories,
        transport: TransportOptions::Http {
            host: "127.0.0.1".to_string(),
            port: 8080,
            endpoint: "/mcp".to_string(),
        },
    };
    let server = build_server(&options).expect("server builds");
    router(Arc::new(server), "/mcp")
}

fn post(body: &str, session: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/mcp")
        .header("content-type", "application/json");
    if let Some(id) = session {
        builder = builder.header(SESSION_HEADER, id);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

const INIT: &str = r#"{"jsonrpc": "2.0", "id": 1, "method": "initialize",
    "params": {"protocolVersion": "2024-11-05", "capabilities": {}}}"#;
const INITIALIZED: &str = r#"{"jsonrpc": "2.0", "method": "notifications/initialized"}"#;

async fn establish_session(app: &Router) -> String {
    let response = app.clone().oneshot(post(INIT, None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let session_id = response
        .headers()
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .expect("initialize returns a session id")
        .to_string();

    let response = app
        .clone()
        .oneshot(post(INITIALIZED, Some(&session_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    session_id
}

#[tokio::test]
async fn test_initialize_reports_capabilities_and_session() {
    let app = test_app(None);
    let response = app.oneshot(post(INIT, None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key(SESSION_HEADER));

    let reply = body_json(response).await;
    assert_eq!(reply["result"]["protocolVersion"], "2024-11-05");
    assert_eq!(reply["result"]["capabilities"]["completions"], json!({}));
    assert_eq!(reply["result"]["serverInfo"]["name"], "linode-mcp-server");
}

#[tokio::test]
async fn test_tools_list_over_http() {
    let app = test_app(Some(vec![ToolCategory::Regions, ToolCategory::Tags]));
    let session_id = establish_session(&app).await;

    let list = r#"{"jsonrpc": "2.0", "id": 2, "method": "tools/list"}"#;
    let response = app.oneshot(post(list, Some(&session_id))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let reply = body_json(response).await;
    let names: Vec<&str> = reply["result"]["tools"]
        .as_array()
        .unwrap()
        .iter()
        .map(|tool| tool["name"].as_str().unwrap())
        .collect();

    assert!(names.contains(&"list_regions"));
    assert!(names.contains(&"list_tags"));
    assert!(!names.contains(&"list_volumes"));
}

#[tokio::test]
async fn test_sessions_do_not_share_lifecycle_state() {
    let app = test_app(Some(vec![ToolCategory::Regions]));
    let initialised = establish_session(&app).await;

    // A brand new session that skipped initialize is still gated...
    let response = app.clone().oneshot(post(INIT, None)).await.unwrap();
    let fresh = response
        .headers()
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();

    let list = r#"{"jsonrpc": "2.0", "id": 3, "method": "tools/list"}"#;
    let reply = body_json(
        app.clone()
            .oneshot(post(list, Some(&fresh)))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(reply["error"]["code"], json!(-32600));

    // ...while the established one serves normally.
    let reply = body_json(
        app.oneshot(post(list, Some(&initialised)))
            .await
            .unwrap(),
    )
    .await;
    assert!(reply.get("error").is_none());
}

#[tokio::test]
async fn test_terminated_session_is_gone() {
    let app = test_app(Some(vec![ToolCategory::Regions]));
    let session_id = establish_session(&app).await;

    let delete = Request::builder()
        .method("DELETE")
        .uri("/mcp")
        .header(SESSION_HEADER, &session_id)
        .body(Body::empty())
        .unwrap();
    assert_eq!(
        app.clone().oneshot(delete).await.unwrap().status(),
        StatusCode::OK
    );

    let ping = r#"{"jsonrpc": "2.0", "id": 4, "method": "ping"}"#;
    let response = app.oneshot(post(ping, Some(&session_id))).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
