//! Error types for linode-mcp-server.
//!
//! # Security Note
//!
//! Error messages are carefully crafted to NEVER include the API token.
//! Variants that relate to authentication describe the problem without
//! echoing credential material.

use thiserror::Error;

use crate::tools::{RegistryError, ToolCategory};

/// Errors produced while resolving and validating server options.
///
/// Every variant is fatal at startup: the entry point prints the message
/// to stderr and exits with status 1.
#[derive(Error, Debug)]
pub enum OptionsError {
    /// One or more supplied categories are not in the known set.
    #[error(
        "invalid tool categories: {}. available categories: {}",
        invalid.join(", "),
        ToolCategory::known_names().join(", ")
    )]
    InvalidCategories {
        /// The offending category names, in the order supplied.
        invalid: Vec<String>,
    },

    /// The transport value is not a supported identifier.
    #[error("invalid transport type: {value}. available transport types: stdio, http")]
    InvalidTransport {
        /// The raw value supplied on the command line.
        value: String,
    },

    /// The sse transport was removed and selecting it is a deliberate,
    /// explicit failure rather than a silent fallback.
    #[error("the sse transport is no longer supported; use stdio or http")]
    DeprecatedTransport,

    /// The HTTP endpoint path does not begin with `/`.
    #[error("invalid endpoint path: {value} (must begin with '/')")]
    InvalidEndpoint {
        /// The raw endpoint value supplied on the command line.
        value: String,
    },

    /// stdio transport requires a token and none was resolved.
    #[error(
        "a Linode API token is required for stdio transport. \
         provide one with --token or set LINODE_API_TOKEN"
    )]
    MissingToken,
}

/// Errors raised while starting a transport binding.
#[derive(Error, Debug)]
pub enum TransportError {
    /// The HTTP listener could not bind its address.
    #[error("failed to bind {addr}")]
    Bind {
        /// The `host:port` address that failed to bind.
        addr: String,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The HTTP server failed while serving connections.
    #[error("http server error")]
    Serve {
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The stdio transport failed reading or writing the process streams.
    #[error("stdio transport error")]
    Stdio {
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

/// Errors crossing the startup boundary.
///
/// Each variant wraps one ordered startup step with context; the entry
/// point logs the chain and exits with status 1.
#[derive(Error, Debug)]
pub enum StartupError {
    /// The Linode API client could not be constructed.
    #[error("failed to construct Linode API client")]
    Client {
        /// The underlying client error.
        #[source]
        source: crate::linode::ClientError,
    },

    /// Tool registration failed; startup is aborted.
    #[error("failed to register tools")]
    Registration {
        /// The underlying registry error.
        #[source]
        source: RegistryError,
    },

    /// The selected transport could not be started.
    #[error("failed to start {transport} transport")]
    Transport {
        /// Name of the transport that failed (`stdio` or `http`).
        transport: &'static str,
        /// The underlying transport error.
        #[source]
        source: TransportError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_categories_lists_offenders_and_known_set() {
        let error = OptionsError::InvalidCategories {
            invalid: vec!["x".to_string(), "y".to_string()],
        };
        let msg = error.to_string();
        assert!(msg.contains("x, y"));
        for category in ToolCategory::ALL {
            assert!(msg.contains(category.name()), "missing {category}");
        }
    }

    #[test]
    fn deprecated_transport_names_alternatives() {
        let msg = OptionsError::DeprecatedTransport.to_string();
        assert!(msg.contains("stdio"));
        assert!(msg.contains("http"));
    }

    #[test]
    fn missing_token_is_distinct_from_transport_errors() {
        let token = OptionsError::MissingToken.to_string();
        let transport = OptionsError::InvalidTransport {
            value: "carrier-pigeon".to_string(),
        }
        .to_string();
        assert_ne!(token, transport);
        assert!(token.contains("LINODE_API_TOKEN"));
    }

    #[test]
    fn bind_error_display() {
        let error = TransportError::Bind {
            addr: "127.0.0.1:8080".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::AddrInUse, "in use"),
        };
        assert!(error.to_string().contains("127.0.0.1:8080"));
    }
}
