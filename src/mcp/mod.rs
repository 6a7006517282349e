//! Model Context Protocol (MCP) server implementation.
//!
//! Exposes Linode API operations as tools to AI agents over JSON-RPC 2.0
//! messages, carried by either the stdio or the streamable HTTP
//! transport.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          MCP Server                          │
//! │                                                              │
//! │   ┌──────────────┐    ┌─────────────┐    ┌──────────────┐    │
//! │   │  Transport   │───▶│   Server    │───▶│   Registry   │    │
//! │   │ (stdio/http) │    │ (dispatch)  │    │ (tool calls) │    │
//! │   └──────────────┘    └─────────────┘    └──────────────┘    │
//! │          │                  │                   │            │
//! │          ▼                  ▼                   ▼            │
//! │   ┌──────────────────────────────────────────────────┐       │
//! │   │          JSON-RPC messages / Linode API          │       │
//! │   └──────────────────────────────────────────────────┘       │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each connection gets its own [`session::Session`]; the server core is
//! shared and stateless between messages apart from the sealed registry
//! and capability set.
//!
//! # Protocol Version
//!
//! This implementation targets MCP protocol version 2024-11-05.

pub mod capabilities;
pub mod protocol;
pub mod server;
pub mod session;
pub mod transport;

pub use capabilities::{CompletionsPatch, ServerCapabilities};
pub use protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, MCP_PROTOCOL_VERSION};
pub use server::McpServer;
pub use session::{HeaderSessionAuthenticator, SessionAuthenticator, SessionData};
