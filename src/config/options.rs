//! Validated server option types.
//!
//! `ServerOptions` is assembled once at startup by [`crate::config::resolve_options`]
//! and is immutable for the life of the process.

use crate::tools::ToolCategory;

/// Environment variable consulted when `--token` is not supplied.
pub const TOKEN_ENV_VAR: &str = "LINODE_API_TOKEN";

/// Default port for the http transport.
pub const DEFAULT_HTTP_PORT: u16 = 8080;

/// Default bind address for the http transport.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default endpoint path for the http transport.
pub const DEFAULT_HTTP_ENDPOINT: &str = "/mcp";

/// The transport binding selected at the validation boundary.
///
/// The raw CLI string is normalised and parsed exactly once; downstream
/// code only ever sees this closed enumeration. stdio carries no network
/// parameters at all, so a port or endpoint for it is unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportOptions {
    /// Newline-delimited JSON-RPC over the process stdin/stdout streams.
    Stdio,
    /// Streamable HTTP endpoint bound to `host:port` at `endpoint`.
    Http {
        /// Bind address.
        host: String,
        /// Bind port.
        port: u16,
        /// Endpoint path, always beginning with `/`.
        endpoint: String,
    },
}

impl TransportOptions {
    /// Returns the transport name used in diagnostics.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Stdio => "stdio",
            Self::Http { .. } => "http",
        }
    }
}

/// Validated server configuration.
#[derive(Debug, Clone)]
pub struct ServerOptions {
    /// Linode API token. Guaranteed present when `transport` is stdio.
    pub token: Option<String>,
    /// Category filter. `None` means all known categories.
    pub enabled_categories: Option<Vec<ToolCategory>>,
    /// The selected transport binding.
    pub transport: TransportOptions,
}
