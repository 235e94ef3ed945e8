//! One reconciliation pass against a recorded-state store.
//!
//! Chooses the path for a responder from (declared configuration, recorded
//! state) and writes the store only after the remote sequence succeeded.

use std::fmt;

use tracing::info;

use crate::diff::requires_replacement;
use crate::engine::Reconciler;
use crate::error::ReconcileError;
use crate::state::{AlertResponderConfig, AlertResponderState};
use crate::store::StateStore;

/// What a pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Nothing recorded and nothing declared.
    Absent,
    Created,
    /// Recorded state was stale (deleted remotely) and the responder was
    /// created again.
    Recreated,
    /// `team_name` changed: deleted and created again.
    Replaced,
    Updated,
    Unchanged,
    Deleted,
}

impl fmt::Display for ReconcileOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Absent => "absent",
            Self::Created => "created",
            Self::Recreated => "recreated",
            Self::Replaced => "replaced",
            Self::Updated => "updated",
            Self::Unchanged => "unchanged",
            Self::Deleted => "deleted",
        };
        f.write_str(s)
    }
}

impl Reconciler {
    /// Reconcile the responder recorded under `key` towards `declared`.
    ///
    /// `None` for `declared` means the responder should not exist.
    #[tracing::instrument(skip(self, store, declared))]
    pub async fn apply(
        &self,
        store: &dyn StateStore,
        key: &str,
        declared: Option<&AlertResponderConfig>,
    ) -> Result<ReconcileOutcome, ReconcileError> {
        let recorded = store.get(key).await?;

        let outcome = match (recorded, declared) {
            (None, None) => ReconcileOutcome::Absent,
            (None, Some(config)) => {
                self.create_and_record(store, key, config).await?;
                ReconcileOutcome::Created
            }
            (Some(state), None) => {
                self.delete(&state).await?;
                store.remove(key).await?;
                ReconcileOutcome::Deleted
            }
            (Some(state), Some(config)) => {
                // Structural errors abort before the refresh read.
                config.delivery_target()?;
                self.converge(store, key, config, &state).await?
            }
        };

        info!(%outcome, "Reconciliation pass finished");
        Ok(outcome)
    }

    /// Read path against the store. Returns whether the responder still
    /// exists; a vanished responder has its record removed.
    #[tracing::instrument(skip(self, store))]
    pub async fn refresh(&self, store: &dyn StateStore, key: &str) -> Result<bool, ReconcileError> {
        let Some(state) = store.get(key).await? else {
            return Ok(false);
        };

        match self.read(&state).await? {
            Some(current) => {
                store.set(key, &current).await?;
                Ok(true)
            }
            None => {
                store.remove(key).await?;
                Ok(false)
            }
        }
    }

    async fn converge(
        &self,
        store: &dyn StateStore,
        key: &str,
        config: &AlertResponderConfig,
        state: &AlertResponderState,
    ) -> Result<ReconcileOutcome, ReconcileError> {
        let Some(current) = self.read(state).await? else {
            store.remove(key).await?;
            self.create_and_record(store, key, config).await?;
            return Ok(ReconcileOutcome::Recreated);
        };
        store.set(key, &current).await?;

        if requires_replacement(config, &current) {
            info!(
                from = %current.config.team_name,
                to = %config.team_name,
                "team_name changed, replacing alert responder"
            );
            self.delete(&current).await?;
            store.remove(key).await?;
            self.create_and_record(store, key, config).await?;
            return Ok(ReconcileOutcome::Replaced);
        }

        match self.write_changes(config, &current).await? {
            Some(updated) => {
                store.set(key, &updated).await?;
                Ok(ReconcileOutcome::Updated)
            }
            None => Ok(ReconcileOutcome::Unchanged),
        }
    }

    async fn create_and_record(
        &self,
        store: &dyn StateStore,
        key: &str,
        config: &AlertResponderConfig,
    ) -> Result<AlertResponderState, ReconcileError> {
        match self.create(config).await {
            Ok(state) => {
                store.set(key, &state).await?;
                Ok(state)
            }
            Err(err) => {
                if let Some(state) = err.recovered_state() {
                    store.set(key, state).await?;
                }
                Err(err)
            }
        }
    }
}
