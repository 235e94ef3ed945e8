//! Create / read / update / delete paths for a single alert responder.
//!
//! Every remote call within a path is sequential: each later call depends on
//! the outcome of the one before it. A confirming read after writes, not the
//! write responses, is what gets recorded.

use tierzero_client::{ClientError, ResponderStatus, TierZeroClient};
use tracing::{debug, info, warn};

use crate::diff::{ChangeSet, StatusChange};
use crate::error::{ReconcileError, RemoteStep};
use crate::mapper;
use crate::state::{AlertResponderConfig, AlertResponderState};

/// Runs reconciliation paths against the remote service.
///
/// Holds no per-resource state; distinct responders may be reconciled
/// concurrently with clones of the same reconciler.
#[derive(Clone)]
pub struct Reconciler {
    client: TierZeroClient,
}

impl Reconciler {
    pub fn new(client: TierZeroClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &TierZeroClient {
        &self.client
    }

    /// Create path: validate, create, optionally pause, then read back.
    ///
    /// Creation cannot start paused, so a declared `enabled = false` costs an
    /// extra `disable` call. If a step after `create` fails, the error is
    /// [`ReconcileError::Incomplete`] carrying what is known about the new
    /// responder.
    #[tracing::instrument(skip_all, fields(team_name = %config.team_name, name = %config.name))]
    pub async fn create(
        &self,
        config: &AlertResponderConfig,
    ) -> Result<AlertResponderState, ReconcileError> {
        let request = mapper::create_request(config)?;

        let mut created = self.client.create(&request).await.at_step("create")?;
        let id = created.id.clone();
        debug!(responder_id = %id, "Alert responder created remotely");

        if !config.enabled {
            if let Err(source) = self.client.disable(&id).await {
                return Err(incomplete("disable after create", &created, source));
            }
            // Not confirmed until the read below.
            created.status = Some(ResponderStatus::Paused);
        }

        let fetched = match self.client.get(&id).await {
            Ok(fetched) => fetched,
            Err(source) => return Err(incomplete("read after create", &created, source)),
        };

        // get never returns url; the create response does.
        let state = mapper::state_from_remote(&fetched, created.url.as_deref());
        info!(
            responder_id = %state.id,
            enabled = state.config.enabled,
            "Alert responder created"
        );
        Ok(state)
    }

    /// Read path. `Ok(None)` means the responder no longer exists remotely
    /// and its recorded state should be dropped.
    #[tracing::instrument(skip_all, fields(responder_id = %state.id))]
    pub async fn read(
        &self,
        state: &AlertResponderState,
    ) -> Result<Option<AlertResponderState>, ReconcileError> {
        match self.client.get(&state.id).await {
            Ok(remote) => Ok(Some(mapper::state_from_remote(&remote, state.url.as_deref()))),
            Err(e) if e.is_not_found() => {
                warn!("Alert responder was deleted outside of reconciliation");
                Ok(None)
            }
            Err(e) => Err(ReconcileError::remote("read", e)),
        }
    }

    /// Update path.
    ///
    /// Status changes go through enable / disable first; all other changed
    /// field groups follow in a single partial update. `team_name` is never
    /// sent. Without any write, `state` is returned as is.
    pub async fn update(
        &self,
        config: &AlertResponderConfig,
        state: &AlertResponderState,
    ) -> Result<AlertResponderState, ReconcileError> {
        let updated = self.write_changes(config, state).await?;
        Ok(updated.unwrap_or_else(|| state.clone()))
    }

    /// Update path returning `None` when no remote write was issued.
    #[tracing::instrument(skip_all, fields(responder_id = %state.id))]
    pub(crate) async fn write_changes(
        &self,
        config: &AlertResponderConfig,
        state: &AlertResponderState,
    ) -> Result<Option<AlertResponderState>, ReconcileError> {
        config.delivery_target()?;

        let id = state.id.as_str();
        let changes = ChangeSet::between(config, state);
        if changes.is_empty() {
            debug!("No changes to apply");
            return Ok(None);
        }

        let mut wrote = false;
        match changes.status {
            Some(StatusChange::Enable) => {
                self.client.enable(id).await.at_step("enable")?;
                wrote = true;
            }
            Some(StatusChange::Disable) => {
                self.client.disable(id).await.at_step("disable")?;
                wrote = true;
            }
            None => {}
        }

        let mut url = state.url.clone();
        if changes.has_field_changes() {
            let request = mapper::update_request(config, &changes);
            if request.is_empty() {
                warn!(
                    groups = %changes.describe(),
                    "Changes clear values the remote cannot clear, skipping update call"
                );
            } else {
                let updated = self.client.update(id, &request).await.at_step("update")?;
                wrote = true;
                if let Some(fresh) = updated.url.filter(|u| !u.is_empty()) {
                    url = Some(fresh);
                }
            }
        }

        if !wrote {
            return Ok(None);
        }

        let fetched = self.client.get(id).await.at_step("read after update")?;
        let updated = mapper::state_from_remote(&fetched, url.as_deref());
        info!(
            groups = %changes.describe(),
            status = ?changes.status,
            enabled = updated.config.enabled,
            "Alert responder updated"
        );
        Ok(Some(updated))
    }

    /// Delete path. An already missing responder counts as deleted.
    #[tracing::instrument(skip_all, fields(responder_id = %state.id))]
    pub async fn delete(&self, state: &AlertResponderState) -> Result<(), ReconcileError> {
        match self.client.delete(&state.id).await {
            Ok(()) => {
                info!("Alert responder deleted");
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                debug!("Alert responder already absent");
                Ok(())
            }
            Err(e) => Err(ReconcileError::remote("delete", e)),
        }
    }

    /// Adopt an existing responder by id.
    ///
    /// Unlike [`read`](Self::read), a missing responder is an error here.
    #[tracing::instrument(skip(self))]
    pub async fn import(&self, id: &str) -> Result<AlertResponderState, ReconcileError> {
        let remote = self.client.get(id).await.at_step("import")?;
        info!(team_name = %remote.team_name, "Alert responder imported");
        Ok(mapper::state_from_remote(&remote, None))
    }
}

fn incomplete(
    step: &'static str,
    created: &tierzero_client::AlertResponder,
    source: ClientError,
) -> ReconcileError {
    tracing::error!(responder_id = %created.id, step, error = %source, "Alert responder created but not finalized");
    ReconcileError::Incomplete {
        step,
        state: Box::new(mapper::state_from_remote(created, None)),
        source,
    }
}
