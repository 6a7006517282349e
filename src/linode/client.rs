//! Authenticated JSON client for the Linode API.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Method;
use serde::Deserialize;
use serde_json::{Map, Value};

use super::error::ClientError;

/// Production Linode API base URL.
pub const API_BASE_URL: &str = "https://api.linode.com/v4";

/// Upper bound on any single API call. There is no retry: a tool call
/// either completes within this window or reports the failure.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Linode API v4 client.
///
/// Cheap to share behind an `Arc`; reqwest pools connections internally.
pub struct LinodeClient {
    http: reqwest::Client,
    base_url: String,
}

impl LinodeClient {
    /// Creates a client against the production API.
    ///
    /// A `None` token builds an unauthenticated client; every call will
    /// then fail with the API's 401 response at call time rather than
    /// here.
    ///
    /// # Errors
    ///
    /// Returns an error if the token cannot be used as a header value or
    /// the HTTP client cannot be constructed.
    pub fn new(token: Option<&str>) -> Result<Self, ClientError> {
        Self::with_base_url(token, API_BASE_URL)
    }

    /// Creates a client against an alternative base URL (tests).
    ///
    /// # Errors
    ///
    /// Same failure modes as [`LinodeClient::new`].
    pub fn with_base_url(token: Option<&str>, base_url: &str) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();

        if let Some(token) = token {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| ClientError::InvalidToken)?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(concat!("linode-mcp-server/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ClientError::Build { source: e })?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// GET a resource.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success status, or an
    /// undecodable body.
    pub async fn get(&self, path: &str) -> Result<Value, ClientError> {
        self.execute(Method::GET, path, None, &[]).await
    }

    /// GET a collection with Linode's standard pagination parameters.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`LinodeClient::get`].
    pub async fn get_paged(
        &self,
        path: &str,
        page: Option<u32>,
        page_size: Option<u32>,
    ) -> Result<Value, ClientError> {
        let mut query = Vec::new();
        if let Some(page) = page {
            query.push(("page", page.to_string()));
        }
        if let Some(page_size) = page_size {
            query.push(("page_size", page_size.to_string()));
        }
        self.execute(Method::GET, path, None, &query).await
    }

    /// POST a JSON body.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`LinodeClient::get`].
    pub async fn post(&self, path: &str, body: &Value) -> Result<Value, ClientError> {
        self.execute(Method::POST, path, Some(body), &[]).await
    }

    /// PUT a JSON body.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`LinodeClient::get`].
    pub async fn put(&self, path: &str, body: &Value) -> Result<Value, ClientError> {
        self.execute(Method::PUT, path, Some(body), &[]).await
    }

    /// DELETE a resource.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`LinodeClient::get`].
    pub async fn delete(&self, path: &str) -> Result<Value, ClientError> {
        self.execute(Method::DELETE, path, None, &[]).await
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        query: &[(&str, String)],
    ) -> Result<Value, ClientError> {
        let method_name = method_name(&method);
        let url = format!("{}{path}", self.base_url);

        let mut request = self.http.request(method, url);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| ClientError::Transport {
            method: method_name,
            path: path.to_string(),
            source: e,
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| ClientError::Transport {
            method: method_name,
            path: path.to_string(),
            source: e,
        })?;

        if !status.is_success() {
            return Err(ClientError::Api {
                path: path.to_string(),
                status: status.as_u16(),
                reason: extract_reason(&text, status.as_u16()),
            });
        }

        // DELETE and some actions answer with an empty body.
        if text.trim().is_empty() {
            return Ok(Value::Object(Map::new()));
        }

        serde_json::from_str(&text).map_err(|e| ClientError::Decode {
            path: path.to_string(),
            source: e,
        })
    }
}

fn method_name(method: &Method) -> &'static str {
    if *method == Method::GET {
        "GET"
    } else if *method == Method::POST {
        "POST"
    } else if *method == Method::PUT {
        "PUT"
    } else if *method == Method::DELETE {
        "DELETE"
    } else {
        "HTTP"
    }
}

/// Linode error envelope: `{"errors": [{"reason": "...", "field": "..."}]}`.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    errors: Vec<ErrorEntry>,
}

#[derive(Debug, Deserialize)]
struct ErrorEntry {
    reason: String,
    #[serde(default)]
    field: Option<String>,
}

/// Pulls a human-readable reason out of an error response body.
fn extract_reason(body: &str, status: u16) -> String {
    if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) {
        let reasons: Vec<String> = envelope
            .errors
            .iter()
            .map(|entry| match &entry.field {
                Some(field) => format!("{field}: {}", entry.reason),
                None => entry.reason.clone(),
            })
            .collect();

        if !reasons.is_empty() {
            return reasons.join("; ");
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("HTTP status {status}")
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_builds_with_and_without_token() {
        assert!(LinodeClient::new(Some("abc123")).is_ok());
        assert!(LinodeClient::new(None).is_ok());
    }

    #[test]
    fn token_with_control_bytes_is_rejected() {
        let result = LinodeClient::new(Some("bad\ntoken"));
        assert!(matches!(result, Err(ClientError::InvalidToken)));
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = LinodeClient::with_base_url(None, "http://localhost:1234/").unwrap();
        assert_eq!(client.base_url, "http://localhost:1234");
    }

    #[test]
    fn extract_reason_reads_envelope() {
        let body = r#"{"errors": [{"reason": "Invalid token."}]}"#;
        assert_eq!(extract_reason(body, 401), "Invalid token.");
    }

    #[test]
    fn extract_reason_includes_field() {
        let body = r#"{"errors": [{"reason": "must be provided", "field": "region"}]}"#;
        assert_eq!(extract_reason(body, 400), "region: must be provided");
    }

    #[test]
    fn extract_reason_joins_multiple_entries() {
        let body = r#"{"errors": [
            {"reason": "must be provided", "field": "region"},
            {"reason": "too short", "field": "label"}
        ]}"#;
        assert_eq!(
            extract_reason(body, 400),
            "region: must be provided; label: too short"
        );
    }

    #[test]
    fn extract_reason_falls_back_to_body_then_status() {
        assert_eq!(extract_reason("upstream exploded", 502), "upstream exploded");
        assert_eq!(extract_reason("   ", 502), "HTTP status 502");
    }
}
