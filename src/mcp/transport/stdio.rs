//! stdio transport.
//!
//! Framing rules:
//!
//! - Messages are UTF-8 encoded JSON-RPC
//! - Messages are delimited by newlines
//! - Messages must not contain embedded newlines
//! - stdin: receives messages from the client
//! - stdout: sends messages to the client
//! - stderr: diagnostics only, never protocol messages
//!
//! The process carries exactly one session, opened without headers (there
//! is no connection metadata on a pipe). The loop runs until stdin closes
//! or a shutdown signal arrives.

use std::io;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::error::TransportError;
use crate::mcp::server::McpServer;
use crate::mcp::session::{ConnectionRequest, Session, SessionState};

/// Buffered stdin/stdout framing for newline-delimited JSON-RPC.
pub struct StdioTransport {
    reader: BufReader<tokio::io::Stdin>,
    writer: tokio::io::Stdout,
}

impl StdioTransport {
    /// Creates a transport over the process streams.
    #[must_use]
    pub fn new() -> Self {
        Self {
            reader: BufReader::new(tokio::io::stdin()),
            writer: tokio::io::stdout(),
        }
    }

    /// Reads the next message line from stdin.
    ///
    /// Returns `None` on EOF (client hung up).
    ///
    /// # Errors
    ///
    /// Returns an error if reading from stdin fails.
    pub async fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        let bytes_read = self.reader.read_line(&mut line).await?;

        if bytes_read == 0 {
            return Ok(None);
        }

        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }

        Ok(Some(line))
    }

    /// Writes one serialised message, newline-terminated.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to stdout fails.
    pub async fn write_line(&mut self, json: &str) -> io::Result<()> {
        // Protocol framing: messages must not contain embedded newlines.
        debug_assert!(
            !json.contains('\n'),
            "JSON message must not contain embedded newlines"
        );

        self.writer.write_all(json.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;

        Ok(())
    }
}

impl Default for StdioTransport {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs the stdio transport until EOF or a shutdown signal.
///
/// # Errors
///
/// Returns an error if transport I/O fails.
pub async fn serve(server: Arc<McpServer>) -> Result<(), TransportError> {
    let mut transport = StdioTransport::new();
    let mut session = server.open_session(&ConnectionRequest::without_headers());

    tracing::info!("stdio transport ready, waiting for client");

    run_loop(&server, &mut transport, &mut session)
        .await
        .map_err(|source| TransportError::Stdio { source })
}

async fn run_loop(
    server: &McpServer,
    transport: &mut StdioTransport,
    session: &mut Session,
) -> io::Result<()> {
    let shutdown = super::shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            () = &mut shutdown => {
                session.state = SessionState::ShuttingDown;
                return Ok(());
            }

            line_result = transport.read_line() => {
                let Some(line) = line_result? else {
                    // EOF: the client closed our stdin.
                    session.state = SessionState::ShuttingDown;
                    return Ok(());
                };

                if line.trim().is_empty() {
                    continue;
                }

                if let Some(reply) = server.handle_line(session, &line).await {
                    transport.write_line(&reply).await?;
                }
            }
        }
    }
}
