//! Linode API client errors.
//!
//! Messages never include the API token; authentication problems are
//! described without echoing credential material.

use thiserror::Error;

/// Errors from the Linode API client.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The underlying HTTP client could not be constructed.
    #[error("failed to construct HTTP client")]
    Build {
        /// The underlying reqwest error.
        #[source]
        source: reqwest::Error,
    },

    /// The API token contains bytes that cannot appear in an HTTP header.
    #[error("the API token contains characters that are not valid in an HTTP header")]
    InvalidToken,

    /// The request could not be sent or the response body not read.
    #[error("request failed: {method} {path}")]
    Transport {
        /// HTTP method of the failed request.
        method: &'static str,
        /// API path of the failed request.
        path: String,
        /// The underlying reqwest error.
        #[source]
        source: reqwest::Error,
    },

    /// The API answered with a non-success status.
    #[error("Linode API error ({status}) for {path}: {reason}")]
    Api {
        /// API path of the failed request.
        path: String,
        /// HTTP status code.
        status: u16,
        /// Reason extracted from the Linode error envelope.
        reason: String,
    },

    /// The response body was not valid JSON.
    #[error("failed to decode response from {path}")]
    Decode {
        /// API path of the request.
        path: String,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_display() {
        let error = ClientError::Api {
            path: "/linode/instances".to_string(),
            status: 401,
            reason: "Invalid token.".to_string(),
        };
        let msg = error.to_string();
        assert!(msg.contains("401"));
        assert!(msg.contains("/linode/instances"));
        assert!(msg.contains("Invalid token."));
    }

    #[test]
    fn invalid_token_does_not_echo_token() {
        let msg = ClientError::InvalidToken.to_string();
        assert!(!msg.contains("Bearer"));
    }
}
