//! Transport seam between the typed client and the wire.
//!
//! Request signing, timeouts and connection reuse live behind this trait.
//! The client performs exactly one [`Transport::do_request`] per operation
//! and never retries.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

/// HTTP methods used by the alert responder API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Failure of a single request/response exchange.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The remote answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// No response was obtained (connect, timeout, TLS, body read).
    #[error("Connection error: {message}")]
    Connection { message: String },
}

impl TransportError {
    #[must_use]
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Returns `true` for the remote's resource-not-found condition.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }
}

/// One request/response exchange with the remote service.
///
/// `path` is relative to the API root, e.g. `/alert-responders/ar_1`.
/// On success the raw response body is returned, possibly empty.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn do_request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Vec<u8>, TransportError>;
}

/// Shared, type-erased transport.
pub type DynTransport = Arc<dyn Transport>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_detection() {
        assert!(TransportError::status(404, "missing").is_not_found());
        assert!(!TransportError::status(410, "gone").is_not_found());
        assert!(!TransportError::connection("refused").is_not_found());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            TransportError::status(502, "bad gateway").to_string(),
            "HTTP 502: bad gateway"
        );
        assert_eq!(Method::Delete.to_string(), "DELETE");
    }
}
