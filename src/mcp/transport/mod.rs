//! MCP transport layer.
//!
//! Exactly one transport is started per process; [`serve`] consumes the
//! validated selection and only returns at shutdown. Available bindings:
//!
//! | Transport | Channel | Sessions |
//! |-----------|---------|----------|
//! | [`stdio`] | newline-delimited JSON-RPC on stdin/stdout | one, for the process lifetime |
//! | [`http`]  | streamable HTTP endpoint (default `/mcp`)  | one per `Mcp-Session-Id` |
//!
//! Diagnostics always go to stderr; stdout belongs to the stdio protocol
//! channel and is never written by the logging layer.

pub mod http;
pub mod stdio;

use std::sync::Arc;

use crate::config::TransportOptions;
use crate::error::TransportError;
use crate::mcp::server::McpServer;

/// Starts the selected transport and blocks until shutdown.
///
/// # Errors
///
/// Returns an error if the transport fails to bind or its I/O breaks.
/// Bind failures are fatal; there is no retry.
pub async fn serve(server: Arc<McpServer>, transport: TransportOptions) -> Result<(), TransportError> {
    match transport {
        TransportOptions::Stdio => stdio::serve(server).await,
        TransportOptions::Http {
            host,
            port,
            endpoint,
        } => http::serve(server, &host, port, &endpoint).await,
    }
}

/// Resolves when the process receives a shutdown signal.
#[cfg(unix)]
pub(crate) async fn shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let Ok(mut sigint) = signal(SignalKind::interrupt()) else {
        return std::future::pending().await;
    };
    let Ok(mut sigterm) = signal(SignalKind::terminate()) else {
        return std::future::pending().await;
    };

    tokio::select! {
        _ = sigint.recv() => tracing::info!("Received SIGINT, initiating graceful shutdown"),
        _ = sigterm.recv() => tracing::info!("Received SIGTERM, initiating graceful shutdown"),
    }
}

/// Resolves when the process receives a shutdown signal.
#[cfg(windows)]
pub(crate) async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("Received Ctrl+C, initiating graceful shutdown");
    } else {
        std::future::pending::<()>().await;
    }
}
