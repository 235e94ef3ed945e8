//! # tierzero-client
//!
//! Typed access to the TierZero alert responder API.
//!
//! The crate is split into three layers:
//! - [`model`]: wire types for alert responders and request payloads
//! - [`Transport`]: the single request/response seam, with [`HttpTransport`]
//!   as the reqwest-backed implementation
//! - [`TierZeroClient`]: one typed method per remote operation (create, get,
//!   list, update, delete, enable, disable)
//!
//! ## Example
//!
//! ```ignore
//! use tierzero_client::{load_config, HttpTransport, TierZeroClient};
//!
//! let config = load_config(None)?;
//! let client = TierZeroClient::from_transport(HttpTransport::from_config(&config)?);
//! let responders = client.list(Some("ops")).await?;
//! ```

mod client;
pub mod config;
mod error;
mod http;
pub mod model;
mod transport;

pub use client::TierZeroClient;
pub use config::{ClientConfig, load_config, load_config_with_env};
pub use error::{ClientError, ConfigError};
pub use http::{API_PREFIX, HttpTransport};
pub use model::{
    AlertResponder, CreateAlertResponderRequest, ListAlertRespondersResponse, MatchingCriteria,
    ResponderStatus, Runbook, UpdateAlertResponderRequest, WebhookSource, WebhookSourceType,
};
pub use transport::{DynTransport, Method, Transport, TransportError};
