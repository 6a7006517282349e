//! Per-connection session state and authentication.
//!
//! A session is created once per connection (once per process for stdio,
//! once per `Mcp-Session-Id` for http) and owns the connection's protocol
//! lifecycle state plus the [`SessionData`] derived by the authenticator.
//! Sessions are never shared across connections.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use serde::Serialize;
use serde_json::Value;

/// Raw connection attributes captured by a transport before
/// authentication runs.
///
/// Header values are kept as raw bytes here; whether they are usable
/// text is the authenticator's problem, not the transport's.
#[derive(Debug, Default)]
pub struct ConnectionRequest {
    /// Inbound header pairs, if the transport carries any.
    pub headers: Option<Vec<(String, Vec<u8>)>>,
}

impl ConnectionRequest {
    /// A request with no header information (stdio connections).
    #[must_use]
    pub const fn without_headers() -> Self {
        Self { headers: None }
    }

    /// A request carrying the given header pairs.
    #[must_use]
    pub fn with_headers(headers: Vec<(String, Vec<u8>)>) -> Self {
        Self {
            headers: Some(headers),
        }
    }
}

/// Context attached to a connection for its whole lifetime.
///
/// `headers` always echoes the inbound header mapping; `extra` is
/// open-ended room for context added later in the pipeline. The value is
/// not mutated after authentication.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionData {
    /// The inbound header mapping, possibly empty.
    pub headers: HashMap<String, String>,

    /// Additional arbitrary key/value context.
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub extra: HashMap<String, Value>,
}

/// Derives a [`SessionData`] from an inbound connection request.
///
/// Implementations must be total: whatever the request looks like, they
/// return a usable session context rather than failing the connection.
pub trait SessionAuthenticator: Send + Sync {
    /// Produces the session context for one new connection.
    fn authenticate(&self, request: &ConnectionRequest) -> SessionData;
}

/// Default authenticator: copies the inbound headers into the session.
///
/// Absent headers yield an empty mapping. A header value that is not
/// valid UTF-8 is dropped; the rest of the mapping survives.
#[derive(Debug, Default)]
pub struct HeaderSessionAuthenticator;

impl SessionAuthenticator for HeaderSessionAuthenticator {
    fn authenticate(&self, request: &ConnectionRequest) -> SessionData {
        let mut headers = HashMap::new();

        if let Some(pairs) = &request.headers {
            for (name, value) in pairs {
                if let Ok(text) = std::str::from_utf8(value) {
                    headers.insert(name.clone(), text.to_string());
                }
            }
        }

        SessionData {
            headers,
            extra: HashMap::new(),
        }
    }
}

/// Connection state in the MCP lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for the initialize request.
    AwaitingInit,
    /// Initialize received, waiting for the initialized notification.
    Initialising,
    /// Ready for normal operation.
    Running,
    /// Shutdown in progress.
    ShuttingDown,
}

/// One connected client's state.
#[derive(Debug)]
pub struct Session {
    /// Current lifecycle state.
    pub state: SessionState,
    /// Negotiated protocol version (set by initialize).
    pub protocol_version: Option<String>,
    /// Context produced by the session authenticator.
    pub data: SessionData,
}

impl Session {
    /// Creates a fresh session carrying the authenticated context.
    #[must_use]
    pub const fn new(data: SessionData) -> Self {
        Self {
            state: SessionState::AwaitingInit,
            protocol_version: None,
            data,
        }
    }
}

/// Id-addressed session store for the http transport.
///
/// The outer lock is held only for map operations; each session has its
/// own async mutex so one session's slow tool call never blocks another
/// session's messages, while messages within a session stay ordered.
#[derive(Default)]
pub struct SessionManager {
    sessions: Mutex<HashMap<String, std::sync::Arc<tokio::sync::Mutex<Session>>>>,
}

impl SessionManager {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a new session and returns its generated id.
    pub fn create(&self, session: Session) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id.clone(), std::sync::Arc::new(tokio::sync::Mutex::new(session)));
        id
    }

    /// Looks up a session by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<std::sync::Arc<tokio::sync::Mutex<Session>>> {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    /// Removes a session. Returns whether it existed.
    pub fn terminate(&self, id: &str) -> bool {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id)
            .is_some()
    }

    /// Number of live sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_are_echoed_exactly() {
        let request = ConnectionRequest::with_headers(vec![
            ("authorization".to_string(), b"Bearer abc".to_vec()),
            ("x-request-id".to_string(), b"r-1".to_vec()),
        ]);

        let data = HeaderSessionAuthenticator.authenticate(&request);

        assert_eq!(data.headers.len(), 2);
        assert_eq!(
            data.headers.get("authorization").map(String::as_str),
            Some("Bearer abc")
        );
        assert_eq!(
            data.headers.get("x-request-id").map(String::as_str),
            Some("r-1")
        );
    }

    #[test]
    fn absent_headers_yield_empty_mapping() {
        let data = HeaderSessionAuthenticator.authenticate(&ConnectionRequest::without_headers());
        assert!(data.headers.is_empty());
        assert!(data.extra.is_empty());
    }

    #[test]
    fn malformed_header_value_is_dropped_not_fatal() {
        let request = ConnectionRequest::with_headers(vec![(
            "x-binary".to_string(),
            vec![0xff, 0xfe, 0xfd],
        )]);

        let data = HeaderSessionAuthenticator.authenticate(&request);
        assert!(data.headers.is_empty());
    }

    #[test]
    fn malformed_value_does_not_poison_the_rest() {
        let request = ConnectionRequest::with_headers(vec![
            ("good".to_string(), b"value".to_vec()),
            ("bad".to_string(), vec![0xff]),
        ]);

        let data = HeaderSessionAuthenticator.authenticate(&request);
        assert_eq!(data.headers.len(), 1);
        assert!(data.headers.contains_key("good"));
    }

    #[test]
    fn new_session_awaits_init() {
        let session = Session::new(SessionData::default());
        assert_eq!(session.state, SessionState::AwaitingInit);
        assert!(session.protocol_version.is_none());
    }

    #[test]
    fn manager_create_get_terminate() {
        let manager = SessionManager::new();
        assert!(manager.is_empty());

        let id = manager.create(Session::new(SessionData::default()));
        assert_eq!(manager.len(), 1);
        assert!(manager.get(&id).is_some());

        assert!(manager.terminate(&id));
        assert!(manager.get(&id).is_none());
        assert!(!manager.terminate(&id));
    }

    #[test]
    fn manager_ids_are_unique() {
        let manager = SessionManager::new();
        let a = manager.create(Session::new(SessionData::default()));
        let b = manager.create(Session::new(SessionData::default()));
        assert_ne!(a, b);
    }
}
