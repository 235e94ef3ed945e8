//! Conversion between the wire model and the declared / recorded shape.
//!
//! Empty declared lists and empty strings never go on the wire; absent
//! wire lists come back as empty lists. This keeps a pass over unchanged
//! configuration from seeing spurious differences.

use tierzero_client::{
    AlertResponder, CreateAlertResponderRequest, MatchingCriteria, ResponderStatus, Runbook,
    UpdateAlertResponderRequest, WebhookSource,
};

use crate::diff::{ChangeSet, FieldGroup};
use crate::error::ReconcileError;
use crate::state::{
    AlertResponderConfig, AlertResponderState, DeliveryTarget, MatchingCriteriaConfig,
    RunbookConfig, WebhookSourceConfig,
};

/// Creation payload for a declared configuration.
///
/// Fails with an invalid-configuration error when the delivery target is
/// not exactly one of webhook sources or channel id.
pub fn create_request(
    config: &AlertResponderConfig,
) -> Result<CreateAlertResponderRequest, ReconcileError> {
    let (webhook_sources, slack_channel_id) = match config.delivery_target()? {
        DeliveryTarget::WebhookSources(sources) => (Some(webhook_sources_to_wire(sources)), None),
        DeliveryTarget::SlackChannel(channel) => (None, Some(channel.to_string())),
    };

    Ok(CreateAlertResponderRequest {
        team_name: config.team_name.clone(),
        name: config.name.clone(),
        webhook_sources,
        slack_channel_id,
        matching_criteria: matching_criteria_to_wire(&config.matching_criteria),
        runbook: config.runbook.as_ref().map(runbook_to_wire),
        notification_integration_ids: non_empty(&config.notification_integration_ids),
    })
}

/// Partial update payload carrying only the groups in `changes`.
///
/// A changed group whose declared value is empty is omitted, since the
/// remote treats an omitted field as "leave unchanged" and cannot clear it.
pub fn update_request(
    config: &AlertResponderConfig,
    changes: &ChangeSet,
) -> UpdateAlertResponderRequest {
    let mut req = UpdateAlertResponderRequest::default();

    for group in &changes.fields {
        match group {
            FieldGroup::Name => req.name = Some(config.name.clone()),
            FieldGroup::WebhookSources => {
                if !config.webhook_sources.is_empty() {
                    req.webhook_sources = Some(webhook_sources_to_wire(&config.webhook_sources));
                }
            }
            FieldGroup::SlackChannelId => {
                req.slack_channel_id = config.slack_channel().map(str::to_string);
            }
            FieldGroup::MatchingCriteria => {
                req.matching_criteria = Some(matching_criteria_to_wire(&config.matching_criteria));
            }
            FieldGroup::Runbook => req.runbook = config.runbook.as_ref().map(runbook_to_wire),
            FieldGroup::NotificationIntegrationIds => {
                req.notification_integration_ids = non_empty(&config.notification_integration_ids);
            }
        }
    }

    req
}

/// Recorded state for a remote record.
///
/// `enabled` is derived from `status`; `previous_url` fills in the url when
/// the response did not carry one.
pub fn state_from_remote(
    remote: &AlertResponder,
    previous_url: Option<&str>,
) -> AlertResponderState {
    let mut merged = remote.clone();
    merged.merge_missing_url(previous_url);

    let config = AlertResponderConfig {
        team_name: merged.team_name,
        name: merged.name,
        webhook_sources: merged
            .webhook_sources
            .as_deref()
            .map(webhook_sources_from_wire)
            .unwrap_or_default(),
        slack_channel_id: non_blank(merged.slack_channel_id),
        matching_criteria: merged
            .matching_criteria
            .map(matching_criteria_from_wire)
            .unwrap_or_default(),
        runbook: merged.runbook.map(runbook_from_wire),
        notification_integration_ids: merged.notification_integration_ids.unwrap_or_default(),
        enabled: merged.status.is_some_and(ResponderStatus::is_active),
    };

    AlertResponderState {
        id: merged.id,
        config,
        url: merged.url,
        created_at: non_blank(merged.created_at),
        updated_at: non_blank(merged.updated_at),
    }
}

pub fn webhook_sources_to_wire(sources: &[WebhookSourceConfig]) -> Vec<WebhookSource> {
    sources
        .iter()
        .map(|s| WebhookSource {
            source_type: s.source_type,
            remote_id: s.remote_id.clone(),
        })
        .collect()
}

pub fn webhook_sources_from_wire(sources: &[WebhookSource]) -> Vec<WebhookSourceConfig> {
    sources
        .iter()
        .map(|s| WebhookSourceConfig {
            source_type: s.source_type,
            remote_id: s.remote_id.clone(),
        })
        .collect()
}

pub fn matching_criteria_to_wire(criteria: &MatchingCriteriaConfig) -> MatchingCriteria {
    MatchingCriteria {
        text_matches: criteria.text_matches.clone(),
        slack_bot_app_user_id: non_blank(criteria.slack_bot_app_user_id.clone()),
    }
}

pub fn matching_criteria_from_wire(criteria: MatchingCriteria) -> MatchingCriteriaConfig {
    MatchingCriteriaConfig {
        text_matches: criteria.text_matches,
        slack_bot_app_user_id: non_blank(criteria.slack_bot_app_user_id),
    }
}

pub fn runbook_to_wire(runbook: &RunbookConfig) -> Runbook {
    Runbook {
        investigation_prompt: non_blank(runbook.prompt.clone()),
        impact_and_severity_prompt: non_blank(runbook.fast_prompt.clone()),
    }
}

pub fn runbook_from_wire(runbook: Runbook) -> RunbookConfig {
    RunbookConfig {
        prompt: non_blank(runbook.investigation_prompt),
        fast_prompt: non_blank(runbook.impact_and_severity_prompt),
    }
}

fn non_empty(list: &[String]) -> Option<Vec<String>> {
    (!list.is_empty()).then(|| list.to_vec())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
