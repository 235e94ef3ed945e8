//! # tierzero-reconcile
//!
//! Reconciles a declared alert responder configuration against the remote
//! service and keeps a recorded state consistent with both.
//!
//! ## Overview
//!
//! - [`state`]: declared configuration and recorded state shapes, plus the
//!   delivery-target exclusivity check
//! - [`mapper`]: pure conversion between those shapes and the wire model
//! - [`diff`]: field-group change detection ([`ChangeSet`])
//! - [`Reconciler`]: the create / read / update / delete / import paths and
//!   [`Reconciler::apply`], one full pass against a [`StateStore`]
//!
//! ## Example
//!
//! ```ignore
//! use tierzero_client::{load_config, HttpTransport, TierZeroClient};
//! use tierzero_reconcile::{FileStateStore, Reconciler};
//!
//! let config = load_config(None)?;
//! let client = TierZeroClient::from_transport(HttpTransport::from_config(&config)?);
//! let reconciler = Reconciler::new(client);
//! let store = FileStateStore::new(".tierzero/state");
//!
//! let outcome = reconciler.apply(&store, "ops-outage", Some(&declared)).await?;
//! ```

pub mod diff;
mod engine;
mod error;
pub mod mapper;
mod pass;
pub mod state;
mod store;

pub use diff::{ChangeSet, FieldGroup, StatusChange, requires_replacement};
pub use engine::Reconciler;
pub use error::ReconcileError;
pub use pass::ReconcileOutcome;
pub use state::{
    AlertResponderConfig, AlertResponderState, DeliveryTarget, MatchingCriteriaConfig,
    RunbookConfig, WebhookSourceConfig,
};
pub use store::{DynStateStore, FileStateStore, MemoryStateStore, StateStore, StoreError};
