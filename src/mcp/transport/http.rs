//! Streamable HTTP transport.
//!
//! One route serves the whole protocol:
//!
//! - POST: client-to-server JSON-RPC messages. An `initialize` request
//!   creates a session and the response carries its id in the
//!   `Mcp-Session-Id` header; every other request must present that
//!   header. Notifications are acknowledged with 202 and no body.
//! - DELETE: session termination.
//! - GET: 405; no server-initiated stream is offered.
//!
//! Sessions are isolated: each holds its own lifecycle state and
//! authenticated [`SessionData`], and a slow tool call in one session
//! never blocks another.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::Value;

use crate::error::TransportError;
use crate::mcp::server::McpServer;
use crate::mcp::session::{ConnectionRequest, SessionManager};

/// Header carrying the session id, issued on initialize.
pub const SESSION_HEADER: &str = "Mcp-Session-Id";

/// Shared state behind the route handlers.
#[derive(Clone)]
struct HttpState {
    server: Arc<McpServer>,
    sessions: Arc<SessionManager>,
}

/// Builds the protocol router for the given endpoint path.
#[must_use]
pub fn router(server: Arc<McpServer>, endpoint: &str) -> Router {
    let state = HttpState {
        server,
        sessions: Arc::new(SessionManager::new()),
    };

    Router::new()
        .route(
            endpoint,
            post(handle_post).get(handle_get).delete(handle_delete),
        )
        .with_state(state)
}

/// Binds `host:port` and serves the protocol until a shutdown signal.
///
/// # Errors
///
/// Returns an error if the address cannot be bound (fatal, no retry) or
/// the server fails while running.
pub async fn serve(
    server: Arc<McpServer>,
    host: &str,
    port: u16,
    endpoint: &str,
) -> Result<(), TransportError> {
    let addr = format!("{host}:{port}");
    let listener =
        tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|source| TransportError::Bind {
                addr: addr.clone(),
                source,
            })?;

    tracing::info!(%addr, endpoint, "http transport listening");

    axum::serve(listener, router(server, endpoint))
        .with_graceful_shutdown(super::shutdown_signal())
        .await
        .map_err(|source| TransportError::Serve { source })
}

async fn handle_post(
    State(state): State<HttpState>,
    headers: HeaderMap,
    Json(message): Json<Value>,
) -> Result<Response, HttpError> {
    if is_initialize(&message) {
        return handle_initialize(&state, &headers, message).await;
    }

    let session_id = headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or(HttpError::MissingSessionId)?;

    let session = state
        .sessions
        .get(session_id)
        .ok_or(HttpError::SessionNotFound)?;

    let mut session = session.lock().await;
    match state.server.handle_json(&mut session, message).await {
        Some(reply) => Ok(Json(reply).into_response()),
        // Notifications get no body, only an acknowledgement.
        None => Ok(StatusCode::ACCEPTED.into_response()),
    }
}

/// Creates a session, authenticates the connection and answers initialize.
async fn handle_initialize(
    state: &HttpState,
    headers: &HeaderMap,
    message: Value,
) -> Result<Response, HttpError> {
    let request = ConnectionRequest::with_headers(
        headers
            .iter()
            .map(|(name, value)| (name.as_str().to_string(), value.as_bytes().to_vec()))
            .collect(),
    );

    let mut session = state.server.open_session(&request);
    let reply = state.server.handle_json(&mut session, message).await;
    let session_id = state.sessions.create(session);

    tracing::info!(session = %session_id, "created session");

    let mut response = match reply {
        Some(reply) => Json(reply).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    };
    if let Ok(value) = HeaderValue::from_str(&session_id) {
        response.headers_mut().insert(SESSION_HEADER, value);
    }

    Ok(response)
}

async fn handle_get() -> Response {
    // No server-initiated stream is offered on this transport.
    (
        StatusCode::METHOD_NOT_ALLOWED,
        "server-to-client streaming is not offered; POST messages instead",
    )
        .into_response()
}

async fn handle_delete(State(state): State<HttpState>, headers: HeaderMap) -> StatusCode {
    headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map_or(StatusCode::BAD_REQUEST, |session_id| {
            if state.sessions.terminate(session_id) {
                tracing::info!(session = %session_id, "terminated session");
                StatusCode::OK
            } else {
                StatusCode::NOT_FOUND
            }
        })
}

fn is_initialize(message: &Value) -> bool {
    message
        .get("method")
        .and_then(Value::as_str)
        .is_some_and(|method| method == "initialize")
}

/// Transport-level rejections, rendered as JSON error bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HttpError {
    MissingSessionId,
    SessionNotFound,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::MissingSessionId => (StatusCode::BAD_REQUEST, "Missing Mcp-Session-Id header"),
            Self::SessionNotFound => (StatusCode::NOT_FOUND, "Session not found or expired"),
        };

        let body = serde_json::json!({
            "error": {
                "code": status.as_u16(),
                "message": message,
            }
        });

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linode::LinodeClient;
    use crate::mcp::session::HeaderSessionAuthenticator;
    use axum::body::Body;
    use http::Request;
    use tower::ServiceExt;

    fn test_router() -> Router {
        let client = LinodeClient::with_base_url(None, "http://127.0.0.1:0").unwrap();
        let server = McpServer::new(Box::new(HeaderSessionAuthenticator), client);
        router(Arc::new(server), "/mcp")
    }

    fn post_json(body: &str, session: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/mcp")
            .header("content-type", "application/json");
        if let Some(id) = session {
            builder = builder.header(SESSION_HEADER, id);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    const INIT: &str = r#"{"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {}}"#;

    #[tokio::test]
    async fn initialize_creates_session_and_returns_header() {
        let app = test_router();
        let response = app.oneshot(post_json(INIT, None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let session_id = response
            .headers()
            .get(SESSION_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap();
        assert!(!session_id.is_empty());
    }

    #[tokio::test]
    async fn non_initialize_without_session_header_is_bad_request() {
        let app = test_router();
        let list = r#"{"jsonrpc": "2.0", "id": 2, "method": "tools/list"}"#;
        let response = app.oneshot(post_json(list, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let app = test_router();
        let ping = r#"{"jsonrpc": "2.0", "id": 3, "method": "ping"}"#;
        let response = app
            .oneshot(post_json(ping, Some("no-such-session")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn full_session_round_trip() {
        let app = test_router();

        let response = app
            .clone()
            .oneshot(post_json(INIT, None))
            .await
            .unwrap();
        let session_id = response
            .headers()
            .get(SESSION_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap()
            .to_string();

        // Initialized notification: acknowledged, no body.
        let notif = r#"{"jsonrpc": "2.0", "method": "notifications/initialized"}"#;
        let response = app
            .clone()
            .oneshot(post_json(notif, Some(&session_id)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);

        // Now the session is running and answers requests.
        let ping = r#"{"jsonrpc": "2.0", "id": 4, "method": "ping"}"#;
        let response = app
            .oneshot(post_json(ping, Some(&session_id)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["result"], serde_json::json!({}));
    }

    #[tokio::test]
    async fn delete_terminates_the_session() {
        let app = test_router();

        let response = app
            .clone()
            .oneshot(post_json(INIT, None))
            .await
            .unwrap();
        let session_id = response
            .headers()
            .get(SESSION_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap()
            .to_string();

        let delete = Request::builder()
            .method("DELETE")
            .uri("/mcp")
            .header(SESSION_HEADER, &session_id)
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(delete).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // The terminated session is gone.
        let ping = r#"{"jsonrpc": "2.0", "id": 5, "method": "ping"}"#;
        let response = app
            .oneshot(post_json(ping, Some(&session_id)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn delete_without_header_is_bad_request() {
        let app = test_router();
        let delete = Request::builder()
            .method("DELETE")
            .uri("/mcp")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(delete).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn get_is_method_not_allowed() {
        let app = test_router();
        let get_req = Request::builder()
            .method("GET")
            .uri("/mcp")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(get_req).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
