//! Server lifecycle controller.
//!
//! Startup runs a fixed sequence, each step wrapped with its own error
//! context:
//!
//! 1. Construct the API client and the protocol server (name, version,
//!    session authenticator).
//! 2. Apply the completions capability patch (idempotent; its one-shot
//!    flag is owned here, not hidden in module state).
//! 3. Register tools for the enabled categories; a failure here aborts
//!    startup.
//! 4. Start the selected transport, which blocks until shutdown.
//!
//! Everything before the transport starts is fail-fast; afterwards,
//! faults are isolated per connection and only logged.

use std::sync::Arc;

use tracing::info;

use crate::config::ServerOptions;
use crate::error::StartupError;
use crate::linode::LinodeClient;
use crate::mcp::capabilities::CompletionsPatch;
use crate::mcp::server::McpServer;
use crate::mcp::session::HeaderSessionAuthenticator;
use crate::mcp::transport;
use crate::tools::register_tools;

/// Builds the protocol server: client, capability patch, tool registry.
///
/// # Errors
///
/// Returns an error if the client cannot be constructed or tool
/// registration fails.
pub fn build_server(options: &ServerOptions) -> Result<McpServer, StartupError> {
    let client = LinodeClient::new(options.token.as_deref())
        .map_err(|source| StartupError::Client { source })?;
    let mut server = McpServer::new(Box::new(HeaderSessionAuthenticator), client);

    let mut completions_patch = CompletionsPatch::new();
    completions_patch.apply(server.capabilities_mut());

    let categories_label = options.enabled_categories.as_ref().map_or_else(
        || "all".to_string(),
        |categories| {
            categories
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        },
    );
    info!(categories = %categories_label, "registering tool categories");

    register_tools(server.registry_mut(), options.enabled_categories.as_deref())
        .map_err(|source| StartupError::Registration { source })?;

    info!(tools = server.registry().len(), "registered tools");

    Ok(server)
}

/// Runs the full startup sequence and serves until shutdown.
///
/// # Errors
///
/// Returns an error if any startup step fails; the caller logs it and
/// exits with status 1.
pub async fn start_server(options: ServerOptions) -> Result<(), StartupError> {
    let server = build_server(&options)?;

    let transport_name = options.transport.name();
    info!(transport = transport_name, "starting transport");

    transport::serve(Arc::new(server), options.transport)
        .await
        .map_err(|source| StartupError::Transport {
            transport: transport_name,
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TransportOptions;
    use crate::tools::ToolCategory;

    fn options(token: Option<&str>, categories: Option<Vec<ToolCategory>>) -> ServerOptions {
        ServerOptions {
            token: token.map(ToString::to_string),
            enabled_categories: categories,
            transport: TransportOptions::Stdio,
        }
    }

    #[test]
    fn build_registers_all_categories_by_default() {
        let server = build_server(&options(Some("token"), None)).unwrap();
        assert_eq!(
            server.registry().categories().len(),
            ToolCategory::ALL.len()
        );
    }

    #[test]
    fn build_honours_category_filter() {
        let server = build_server(&options(
            Some("token"),
            Some(vec![ToolCategory::Instances, ToolCategory::Domains]),
        ))
        .unwrap();
        assert_eq!(
            server.registry().categories(),
            vec![ToolCategory::Instances, ToolCategory::Domains]
        );
    }

    #[test]
    fn build_applies_completions_patch() {
        let server = build_server(&options(Some("token"), None)).unwrap();
        let value = serde_json::to_value(server.advertised_capabilities()).unwrap();
        assert_eq!(value["completions"], serde_json::json!({}));
    }

    #[test]
    fn bad_token_fails_at_client_construction() {
        let err = build_server(&options(Some("bad\ntoken"), None)).unwrap_err();
        assert!(matches!(err, StartupError::Client { .. }));
    }
}
