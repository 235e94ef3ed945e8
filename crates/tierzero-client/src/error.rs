//! Error types for the alert responder client.

use crate::transport::TransportError;

/// Errors raised by [`TierZeroClient`](crate::TierZeroClient) operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The remote reported that the addressed responder does not exist.
    #[error("Alert responder not found: {id}")]
    NotFound {
        /// Identifier that was addressed.
        id: String,
    },

    /// Any other remote or transport failure.
    #[error("Failed to {operation}: {message}")]
    Remote {
        /// Operation that failed, e.g. "create alert responder".
        operation: &'static str,
        /// Underlying failure as reported by the transport.
        message: String,
    },

    /// The response body could not be decoded.
    #[error("Failed to {operation}: invalid response body: {source}")]
    Decode {
        /// Operation whose response failed to decode.
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl ClientError {
    #[must_use]
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    #[must_use]
    pub fn remote(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Remote {
            operation,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn decode(operation: &'static str, source: serde_json::Error) -> Self {
        Self::Decode { operation, source }
    }

    /// Map a transport failure for an operation addressing `id`.
    ///
    /// A 404 becomes [`ClientError::NotFound`] only when a concrete id was
    /// addressed; for collection calls it stays a generic remote error.
    pub(crate) fn from_transport(
        operation: &'static str,
        id: Option<&str>,
        err: TransportError,
    ) -> Self {
        match id {
            Some(id) if err.is_not_found() => Self::not_found(id),
            _ => Self::remote(operation, err.to_string()),
        }
    }

    /// Returns `true` if the remote signalled that the resource is absent.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Errors raised while loading or validating [`ClientConfig`](crate::ClientConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config load error: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

impl ConfigError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
