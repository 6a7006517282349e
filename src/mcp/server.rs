//! MCP protocol core: per-session lifecycle and request dispatch.
//!
//! The server is transport-agnostic. Transports hand it raw JSON (a line
//! from stdin, a POST body) together with the session the message belongs
//! to, and write back whatever serialised message it returns. The server
//! itself never touches an I/O stream.
//!
//! Lifecycle per session:
//!
//! 1. **Initialisation**: capability negotiation and version agreement
//! 2. **Operation**: tools/list, tools/call, ping
//! 3. **Shutdown**: connection teardown, driven by the transport

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::linode::LinodeClient;
use crate::mcp::capabilities::ServerCapabilities;
use crate::mcp::protocol::{
    parse_message, parse_value, ErrorCode, IncomingMessage, JsonRpcError, JsonRpcErrorData,
    JsonRpcNotification, JsonRpcRequest, JsonRpcResponse, RequestId, MCP_PROTOCOL_VERSION,
    SERVER_NAME,
};
use crate::mcp::session::{ConnectionRequest, Session, SessionAuthenticator, SessionState};
use crate::tools::ToolRegistry;

/// Server information for the initialisation response.
#[derive(Debug, Clone, Serialize)]
pub struct ServerInfo {
    /// Server name.
    pub name: String,
    /// Server version.
    pub version: String,
}

impl Default for ServerInfo {
    fn default() -> Self {
        Self {
            name: SERVER_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Parameters for tools/call request.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolCallParams {
    /// Name of the tool to call.
    pub name: String,
    /// Arguments for the tool.
    #[serde(default)]
    pub arguments: Value,
}

/// Content item in a tool call response.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolContent {
    /// Text content.
    Text {
        /// The text content.
        text: String,
    },
}

/// Result of a tool call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCallResult {
    /// Content returned by the tool.
    pub content: Vec<ToolContent>,
    /// Whether the tool call resulted in an error.
    #[serde(skip_serializing_if = "is_false")]
    pub is_error: bool,
}

#[allow(clippy::trivially_copy_pass_by_ref)] // serde's skip_serializing_if requires fn(&T) -> bool
const fn is_false(b: &bool) -> bool {
    !*b
}

impl ToolCallResult {
    /// Creates a successful text result.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text { text: text.into() }],
            is_error: false,
        }
    }

    /// Creates an error text result.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text {
                text: message.into(),
            }],
            is_error: true,
        }
    }
}

/// A message the server wants sent back to the client.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum OutgoingMessage {
    /// A successful response.
    Response(JsonRpcResponse),
    /// An error response.
    Error(JsonRpcError),
}

/// The MCP server core shared by every session.
pub struct McpServer {
    capabilities: ServerCapabilities,
    authenticator: Box<dyn SessionAuthenticator>,
    registry: ToolRegistry,
    client: Arc<LinodeClient>,
}

impl std::fmt::Debug for McpServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("McpServer")
            .field("capabilities", &self.capabilities)
            .finish_non_exhaustive()
    }
}

impl McpServer {
    /// Creates a server with an empty tool registry.
    #[must_use]
    pub fn new(authenticator: Box<dyn SessionAuthenticator>, client: LinodeClient) -> Self {
        Self {
            capabilities: ServerCapabilities::default(),
            authenticator,
            registry: ToolRegistry::new(),
            client: Arc::new(client),
        }
    }

    /// The stored capability set, for startup-time augmentation.
    pub fn capabilities_mut(&mut self) -> &mut ServerCapabilities {
        &mut self.capabilities
    }

    /// The capability set as advertised to clients.
    ///
    /// Completions is ensured here as well, so every caller of this
    /// accessor observes it even if the startup patch never ran; the
    /// check-before-add inside `ensure_completions` keeps the two paths
    /// from stacking.
    #[must_use]
    pub fn advertised_capabilities(&self) -> ServerCapabilities {
        let mut capabilities = self.capabilities.clone();
        capabilities.ensure_completions();
        capabilities
    }

    /// The tool registry, for startup-time registration.
    pub fn registry_mut(&mut self) -> &mut ToolRegistry {
        &mut self.registry
    }

    /// The tool registry.
    #[must_use]
    pub const fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Opens a session for a new connection.
    ///
    /// Runs the session authenticator exactly once; the result rides on
    /// the session for its whole life.
    #[must_use]
    pub fn open_session(&self, request: &ConnectionRequest) -> Session {
        Session::new(self.authenticator.authenticate(request))
    }

    /// Handles one line of transport input, returning the serialised
    /// reply (if the message warrants one).
    pub async fn handle_line(&self, session: &mut Session, line: &str) -> Option<String> {
        let outgoing = match parse_message(line) {
            Ok(msg) => self.handle_message(session, msg).await?,
            Err(error) => OutgoingMessage::Error(error),
        };
        serialise(&outgoing)
    }

    /// Handles one decoded message value, returning the reply value (if
    /// the message warrants one).
    pub async fn handle_json(&self, session: &mut Session, value: Value) -> Option<Value> {
        let outgoing = match parse_value(value) {
            Ok(msg) => self.handle_message(session, msg).await?,
            Err(error) => OutgoingMessage::Error(error),
        };
        match serde_json::to_value(&outgoing) {
            Ok(value) => Some(value),
            Err(error) => {
                tracing::error!(error = %error, "failed to serialise outgoing message");
                None
            }
        }
    }

    /// Handles a parsed incoming message.
    pub async fn handle_message(
        &self,
        session: &mut Session,
        msg: IncomingMessage,
    ) -> Option<OutgoingMessage> {
        match msg {
            IncomingMessage::Request(req) => Some(self.handle_request(session, req).await),
            IncomingMessage::Notification(ref notif) => {
                Self::handle_notification(session, notif);
                None
            }
        }
    }

    async fn handle_request(&self, session: &mut Session, req: JsonRpcRequest) -> OutgoingMessage {
        let response = match req.method.as_str() {
            "initialize" => self.handle_initialize(session, &req),
            "tools/list" => self.handle_tools_list(session, &req),
            "tools/call" => self.handle_tools_call(session, &req).await,
            "ping" => Ok(Self::handle_ping(&req)),
            _ => Err(JsonRpcError::method_not_found(req.id.clone(), &req.method)),
        };

        match response {
            Ok(resp) => OutgoingMessage::Response(resp),
            Err(error) => OutgoingMessage::Error(error),
        }
    }

    fn handle_notification(session: &mut Session, notif: &JsonRpcNotification) {
        if notif.method == "notifications/initialized"
            && session.state == SessionState::Initialising
        {
            session.state = SessionState::Running;
            tracing::debug!("session initialised");
        }
    }

    fn handle_initialize(
        &self,
        session: &mut Session,
        req: &JsonRpcRequest,
    ) -> Result<JsonRpcResponse, JsonRpcError> {
        if session.state != SessionState::AwaitingInit {
            return Err(JsonRpcError::new(
                Some(req.id.clone()),
                JsonRpcErrorData::with_message(
                    ErrorCode::InvalidRequest,
                    "Server already initialised",
                ),
            ));
        }

        let negotiated_version = MCP_PROTOCOL_VERSION.to_string();
        session.protocol_version = Some(negotiated_version.clone());
        session.state = SessionState::Initialising;

        let result = json!({
            "protocolVersion": negotiated_version,
            "capabilities": self.advertised_capabilities(),
            "serverInfo": ServerInfo::default(),
        });

        Ok(JsonRpcResponse::success(req.id.clone(), result))
    }

    fn handle_tools_list(
        &self,
        session: &Session,
        req: &JsonRpcRequest,
    ) -> Result<JsonRpcResponse, JsonRpcError> {
        Self::require_running(session, &req.id)?;

        let tools: Vec<_> = self.registry.definitions().collect();
        Ok(JsonRpcResponse::success(
            req.id.clone(),
            json!({ "tools": tools }),
        ))
    }

    async fn handle_tools_call(
        &self,
        session: &Session,
        req: &JsonRpcRequest,
    ) -> Result<JsonRpcResponse, JsonRpcError> {
        Self::require_running(session, &req.id)?;

        let params: ToolCallParams = req
            .params
            .as_ref()
            .map(|p| serde_json::from_value(p.clone()))
            .transpose()
            .map_err(|e| {
                JsonRpcError::invalid_params(req.id.clone(), format!("Invalid tool call params: {e}"))
            })?
            .ok_or_else(|| {
                JsonRpcError::invalid_params(req.id.clone(), "Missing tool call params")
            })?;

        let result = match self
            .registry
            .call(&params.name, Arc::clone(&self.client), params.arguments)
            .await
        {
            None => ToolCallResult::error(format!("Unknown tool: {}", params.name)),
            Some(Ok(value)) => match serde_json::to_string_pretty(&value) {
                Ok(text) => ToolCallResult::text(text),
                Err(e) => {
                    tracing::error!(error = %e, tool = %params.name, "failed to render tool output");
                    ToolCallResult::error("Internal error: failed to render tool output")
                }
            },
            Some(Err(e)) => {
                // Tool failures are isolated to this call; the session
                // and the process keep serving.
                tracing::warn!(tool = %params.name, error = %e, "tool call failed");
                ToolCallResult::error(e.to_string())
            }
        };

        let result_value = serde_json::to_value(&result).map_err(|e| {
            tracing::error!(error = %e, "failed to serialise tool call result");
            JsonRpcError::new(
                Some(req.id.clone()),
                JsonRpcErrorData::with_message(
                    ErrorCode::InternalError,
                    "Internal error: failed to serialise result",
                ),
            )
        })?;

        Ok(JsonRpcResponse::success(req.id.clone(), result_value))
    }

    fn handle_ping(req: &JsonRpcRequest) -> JsonRpcResponse {
        JsonRpcResponse::success(req.id.clone(), json!({}))
    }

    fn require_running(session: &Session, id: &RequestId) -> Result<(), JsonRpcError> {
        if session.state != SessionState::Running {
            return Err(JsonRpcError::new(
                Some(id.clone()),
                JsonRpcErrorData::with_message(ErrorCode::InvalidRequest, "Server not initialised"),
            ));
        }
        Ok(())
    }
}

fn serialise(outgoing: &OutgoingMessage) -> Option<String> {
    match serde_json::to_string(outgoing) {
        Ok(json) => Some(json),
        Err(error) => {
            tracing::error!(error = %error, "failed to serialise outgoing message");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::session::HeaderSessionAuthenticator;
    use crate::tools::{register_tools, ToolCategory};

    fn test_server() -> McpServer {
        let client = LinodeClient::with_base_url(None, "http://127.0.0.1:0").unwrap();
        let mut server = McpServer::new(Box::new(HeaderSessionAuthenticator), client);
        register_tools(server.registry_mut(), Some(&[ToolCategory::Regions])).unwrap();
        server
    }

    fn fresh_session(server: &McpServer) -> Session {
        server.open_session(&ConnectionRequest::without_headers())
    }

    async fn initialised_session(server: &McpServer) -> Session {
        let mut session = fresh_session(server);
        let init = r#"{"jsonrpc": "2.0", "id": 1, "method": "initialize",
            "params": {"protocolVersion": "2024-11-05", "capabilities": {}}}"#;
        server.handle_line(&mut session, init).await.unwrap();
        let notif = r#"{"jsonrpc": "2.0", "method": "notifications/initialized"}"#;
        assert!(server.handle_line(&mut session, notif).await.is_none());
        assert_eq!(session.state, SessionState::Running);
        session
    }

    #[tokio::test]
    async fn initialize_negotiates_version_and_capabilities() {
        let server = test_server();
        let mut session = fresh_session(&server);

        let init = r#"{"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {}}"#;
        let reply = server.handle_line(&mut session, init).await.unwrap();
        let value: Value = serde_json::from_str(&reply).unwrap();

        assert_eq!(value["result"]["protocolVersion"], MCP_PROTOCOL_VERSION);
        assert_eq!(value["result"]["serverInfo"]["name"], SERVER_NAME);
        assert_eq!(value["result"]["capabilities"]["completions"], json!({}));
        assert_eq!(session.state, SessionState::Initialising);
    }

    #[tokio::test]
    async fn initialize_twice_is_rejected() {
        let server = test_server();
        let mut session = initialised_session(&server).await;

        let init = r#"{"jsonrpc": "2.0", "id": 9, "method": "initialize", "params": {}}"#;
        let reply = server.handle_line(&mut session, init).await.unwrap();
        let value: Value = serde_json::from_str(&reply).unwrap();
        assert_eq!(value["error"]["code"], ErrorCode::InvalidRequest.code());
    }

    #[tokio::test]
    async fn tools_list_before_initialised_is_rejected() {
        let server = test_server();
        let mut session = fresh_session(&server);

        let list = r#"{"jsonrpc": "2.0", "id": 2, "method": "tools/list"}"#;
        let reply = server.handle_line(&mut session, list).await.unwrap();
        let value: Value = serde_json::from_str(&reply).unwrap();
        assert_eq!(value["error"]["code"], ErrorCode::InvalidRequest.code());
    }

    #[tokio::test]
    async fn tools_list_returns_registered_tools() {
        let server = test_server();
        let mut session = initialised_session(&server).await;

        let list = r#"{"jsonrpc": "2.0", "id": 3, "method": "tools/list"}"#;
        let reply = server.handle_line(&mut session, list).await.unwrap();
        let value: Value = serde_json::from_str(&reply).unwrap();

        let tools = value["result"]["tools"].as_array().unwrap();
        assert!(tools.iter().any(|t| t["name"] == "list_regions"));
        assert!(tools.iter().all(|t| t["inputSchema"]["type"] == "object"));
    }

    #[tokio::test]
    async fn unknown_method_yields_method_not_found() {
        let server = test_server();
        let mut session = initialised_session(&server).await;

        let req = r#"{"jsonrpc": "2.0", "id": 4, "method": "resources/list"}"#;
        let reply = server.handle_line(&mut session, req).await.unwrap();
        let value: Value = serde_json::from_str(&reply).unwrap();
        assert_eq!(value["error"]["code"], ErrorCode::MethodNotFound.code());
    }

    #[tokio::test]
    async fn unknown_tool_yields_error_result_not_protocol_error() {
        let server = test_server();
        let mut session = initialised_session(&server).await;

        let call = r#"{"jsonrpc": "2.0", "id": 5, "method": "tools/call",
            "params": {"name": "launch_rocket", "arguments": {}}}"#;
        let reply = server.handle_line(&mut session, call).await.unwrap();
        let value: Value = serde_json::from_str(&reply).unwrap();

        assert!(value.get("error").is_none());
        assert_eq!(value["result"]["isError"], json!(true));
        let text = value["result"]["content"][0]["text"].as_str().unwrap();
        assert!(text.contains("launch_rocket"));
    }

    #[tokio::test]
    async fn tool_argument_failure_is_isolated() {
        let server = test_server();
        let mut session = initialised_session(&server).await;

        // get_region requires a string id.
        let call = r#"{"jsonrpc": "2.0", "id": 6, "method": "tools/call",
            "params": {"name": "get_region", "arguments": {"id": 17}}}"#;
        let reply = server.handle_line(&mut session, call).await.unwrap();
        let value: Value = serde_json::from_str(&reply).unwrap();

        assert_eq!(value["result"]["isError"], json!(true));
        // The session keeps working afterwards.
        let ping = r#"{"jsonrpc": "2.0", "id": 7, "method": "ping"}"#;
        let reply = server.handle_line(&mut session, ping).await.unwrap();
        let value: Value = serde_json::from_str(&reply).unwrap();
        assert_eq!(value["result"], json!({}));
    }

    #[tokio::test]
    async fn tools_call_without_params_is_invalid_params() {
        let server = test_server();
        let mut session = initialised_session(&server).await;

        let call = r#"{"jsonrpc": "2.0", "id": 8, "method": "tools/call"}"#;
        let reply = server.handle_line(&mut session, call).await.unwrap();
        let value: Value = serde_json::from_str(&reply).unwrap();
        assert_eq!(value["error"]["code"], ErrorCode::InvalidParams.code());
    }

    #[tokio::test]
    async fn parse_error_is_replied_not_swallowed() {
        let server = test_server();
        let mut session = fresh_session(&server);

        let reply = server.handle_line(&mut session, "{garbage").await.unwrap();
        let value: Value = serde_json::from_str(&reply).unwrap();
        assert_eq!(value["error"]["code"], ErrorCode::ParseError.code());
    }

    #[tokio::test]
    async fn handle_json_mirrors_handle_line() {
        let server = test_server();
        let mut session = fresh_session(&server);

        let init = json!({
            "jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {}
        });
        let reply = server.handle_json(&mut session, init).await.unwrap();
        assert_eq!(reply["result"]["protocolVersion"], MCP_PROTOCOL_VERSION);
    }

    #[test]
    fn advertised_capabilities_always_include_completions() {
        let server = test_server();
        // No patch was applied; the accessor still reports completions.
        let value = serde_json::to_value(server.advertised_capabilities()).unwrap();
        assert_eq!(value["completions"], json!({}));
    }
}
