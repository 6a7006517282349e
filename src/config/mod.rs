//! Option resolution and validation.
//!
//! Raw CLI input is checked in a fixed order and assembled into a
//! [`ServerOptions`] value, or rejected with a typed [`OptionsError`].
//! Validation ordering matters for diagnostics:
//!
//! 1. Category names are checked against the known enumeration.
//! 2. The transport string is normalised and parsed into a closed enum
//!    (the removed `sse` value gets its own terminal diagnostic).
//! 3. Transport-dependent defaults are applied (http: port 8080, host
//!    `127.0.0.1`, endpoint `/mcp`).
//! 4. stdio requires a resolved token.
//!
//! The `--list-categories` fast path bypasses this module entirely and is
//! handled by the entry point before any validation runs.

mod options;

pub use options::{
    ServerOptions, TransportOptions, DEFAULT_HOST, DEFAULT_HTTP_ENDPOINT, DEFAULT_HTTP_PORT,
    TOKEN_ENV_VAR,
};

use crate::error::OptionsError;
use crate::tools::ToolCategory;

/// Raw, unvalidated option input as collected by the CLI layer.
#[derive(Debug, Clone, Default)]
pub struct RawOptions {
    /// Token supplied via `--token`, if any.
    pub token: Option<String>,
    /// Category names supplied via `--categories`, already split on commas.
    pub categories: Option<Vec<String>>,
    /// Raw transport identifier (defaults to `stdio` at the CLI layer).
    pub transport: String,
    /// Port supplied via `--port`, if any.
    pub port: Option<u16>,
    /// Bind address supplied via `--host`, if any.
    pub host: Option<String>,
    /// Endpoint path supplied via `--endpoint`, if any.
    pub endpoint: Option<String>,
}

/// Resolves and validates raw CLI input into [`ServerOptions`].
///
/// `env_token` is the value of [`TOKEN_ENV_VAR`] captured by the caller;
/// an explicit `--token` always wins over it.
///
/// # Errors
///
/// Returns an [`OptionsError`] describing the first failed validation
/// rule. All failures are fatal at startup.
pub fn resolve_options(
    raw: RawOptions,
    env_token: Option<String>,
) -> Result<ServerOptions, OptionsError> {
    let token = raw.token.or(env_token).filter(|t| !t.is_empty());

    let enabled_categories = match raw.categories {
        Some(names) => Some(validate_categories(&names)?),
        None => None,
    };

    let transport = match raw.transport.to_ascii_lowercase().as_str() {
        "stdio" => TransportOptions::Stdio,
        "http" => TransportOptions::Http {
            host: raw.host.unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: raw.port.unwrap_or(DEFAULT_HTTP_PORT),
            endpoint: validate_endpoint(raw.endpoint)?,
        },
        "sse" => return Err(OptionsError::DeprecatedTransport),
        _ => {
            return Err(OptionsError::InvalidTransport {
                value: raw.transport,
            })
        }
    };

    if transport == TransportOptions::Stdio && token.is_none() {
        return Err(OptionsError::MissingToken);
    }

    Ok(ServerOptions {
        token,
        enabled_categories,
        transport,
    })
}

/// Checks every supplied category name against the known enumeration.
fn validate_categories(names: &[String]) -> Result<Vec<ToolCategory>, OptionsError> {
    let mut enabled = Vec::with_capacity(names.len());
    let mut invalid = Vec::new();

    for name in names {
        let trimmed = name.trim();
        match ToolCategory::from_name(trimmed) {
            Some(category) => {
                if !enabled.contains(&category) {
                    enabled.push(category);
                }
            }
            None => invalid.push(trimmed.to_string()),
        }
    }

    if invalid.is_empty() {
        Ok(enabled)
    } else {
        Err(OptionsError::InvalidCategories { invalid })
    }
}

/// Applies the endpoint default and rejects paths without a leading slash.
fn validate_endpoint(endpoint: Option<String>) -> Result<String, OptionsError> {
    match endpoint {
        None => Ok(DEFAULT_HTTP_ENDPOINT.to_string()),
        Some(value) if value.starts_with('/') => Ok(value),
        Some(value) => Err(OptionsError::InvalidEndpoint { value }),
    }
}
