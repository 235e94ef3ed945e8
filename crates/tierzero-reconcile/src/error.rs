//! Error types for reconciliation passes.

use tierzero_client::ClientError;

use crate::state::AlertResponderState;
use crate::store::StoreError;

/// Errors that abort a reconciliation pass.
#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    /// The declared configuration is structurally invalid. Raised before any
    /// remote call is made.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// A remote call failed at the named step of the pass.
    #[error("{step}: {source}")]
    Remote {
        /// Stage of the pass, e.g. "disable after create".
        step: &'static str,
        #[source]
        source: ClientError,
    },

    /// The responder was created remotely but a follow-up step failed.
    ///
    /// `state` is the best known record of what now exists remotely, so the
    /// next pass can pick it up instead of creating a second responder.
    #[error("{step} failed after alert responder {} was created: {source}", .state.id)]
    Incomplete {
        step: &'static str,
        state: Box<AlertResponderState>,
        #[source]
        source: ClientError,
    },

    /// The recorded-state store failed.
    #[error("State store error: {0}")]
    Store(#[from] StoreError),
}

impl ReconcileError {
    #[must_use]
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn remote(step: &'static str, source: ClientError) -> Self {
        Self::Remote { step, source }
    }

    #[must_use]
    pub fn is_invalid_config(&self) -> bool {
        matches!(self, Self::InvalidConfig { .. })
    }

    /// Returns `true` if a remote call reported the responder as absent.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Remote { source, .. } | Self::Incomplete { source, .. } => source.is_not_found(),
            _ => false,
        }
    }

    /// State to record despite the failure, if the pass got that far.
    #[must_use]
    pub fn recovered_state(&self) -> Option<&AlertResponderState> {
        match self {
            Self::Incomplete { state, .. } => Some(state.as_ref()),
            _ => None,
        }
    }
}

/// Attach the pass step to a client error.
pub(crate) trait RemoteStep<T> {
    fn at_step(self, step: &'static str) -> Result<T, ReconcileError>;
}

impl<T> RemoteStep<T> for Result<T, ClientError> {
    fn at_step(self, step: &'static str) -> Result<T, ReconcileError> {
        self.map_err(|e| ReconcileError::remote(step, e))
    }
}
