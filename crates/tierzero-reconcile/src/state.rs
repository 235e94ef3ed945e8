//! Declared configuration and recorded state of one alert responder.

use serde::{Deserialize, Serialize};
use tierzero_client::WebhookSourceType;

use crate::error::ReconcileError;

/// Configuration as declared by the user.
///
/// `status` is not part of this shape; it surfaces as `enabled`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertResponderConfig {
    /// Owning team. Fixed at creation; a change means replacement.
    pub team_name: String,

    pub name: String,

    /// Mutually exclusive with `slack_channel_id`.
    #[serde(default)]
    pub webhook_sources: Vec<WebhookSourceConfig>,

    /// Mutually exclusive with `webhook_sources`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slack_channel_id: Option<String>,

    pub matching_criteria: MatchingCriteriaConfig,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runbook: Option<RunbookConfig>,

    #[serde(default)]
    pub notification_integration_ids: Vec<String>,

    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookSourceConfig {
    #[serde(rename = "type")]
    pub source_type: WebhookSourceType,
    pub remote_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchingCriteriaConfig {
    #[serde(default)]
    pub text_matches: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slack_bot_app_user_id: Option<String>,
}

/// Investigation prompts; `None` fields fall back to the service default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunbookConfig {
    /// Thorough investigation prompt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,

    /// Fast triage prompt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fast_prompt: Option<String>,
}

impl MatchingCriteriaConfig {
    /// Same criteria with a blank bot user id treated as absent, the way it
    /// reads back from the remote.
    pub fn normalized(&self) -> Self {
        Self {
            text_matches: self.text_matches.clone(),
            slack_bot_app_user_id: non_blank(self.slack_bot_app_user_id.as_deref()),
        }
    }
}

impl RunbookConfig {
    /// Same runbook with blank prompts treated as absent.
    pub fn normalized(&self) -> Self {
        Self {
            prompt: non_blank(self.prompt.as_deref()),
            fast_prompt: non_blank(self.fast_prompt.as_deref()),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

/// Where alerts are delivered from. Exactly one variant is valid per
/// responder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryTarget<'a> {
    WebhookSources(&'a [WebhookSourceConfig]),
    SlackChannel(&'a str),
}

impl AlertResponderConfig {
    /// Non-empty channel id, if one is declared.
    pub fn slack_channel(&self) -> Option<&str> {
        self.slack_channel_id.as_deref().filter(|id| !id.is_empty())
    }

    /// Validate and return the single declared delivery target.
    ///
    /// Checked against the declared configuration before any remote call.
    pub fn delivery_target(&self) -> Result<DeliveryTarget<'_>, ReconcileError> {
        let has_sources = !self.webhook_sources.is_empty();
        let channel = self.slack_channel();

        let target = match (has_sources, channel) {
            (false, None) => {
                return Err(ReconcileError::invalid_config(
                    "must specify either webhook_sources or slack_channel_id",
                ));
            }
            (true, Some(_)) => {
                return Err(ReconcileError::invalid_config(
                    "cannot specify both webhook_sources and slack_channel_id; they are mutually exclusive",
                ));
            }
            (true, None) => DeliveryTarget::WebhookSources(&self.webhook_sources),
            (false, Some(channel)) => DeliveryTarget::SlackChannel(channel),
        };

        for (idx, source) in self.webhook_sources.iter().enumerate() {
            if !source.source_type.is_declarable() {
                return Err(ReconcileError::invalid_config(format!(
                    "webhook_sources[{idx}].type {} is not supported; expected one of PAGERDUTY, OPSGENIE, FIREHYDRANT, ROOTLY",
                    source.source_type
                )));
            }
            if source.remote_id.trim().is_empty() {
                return Err(ReconcileError::invalid_config(format!(
                    "webhook_sources[{idx}].remote_id must not be empty"
                )));
            }
        }

        Ok(target)
    }
}

/// Last known state of a responder, persisted between passes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertResponderState {
    pub id: String,

    #[serde(flatten)]
    pub config: AlertResponderConfig,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl AlertResponderState {
    pub fn enabled(&self) -> bool {
        self.config.enabled
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn webhook_config() -> AlertResponderConfig {
        AlertResponderConfig {
            team_name: "ops".to_string(),
            name: "A".to_string(),
            webhook_sources: vec![WebhookSourceConfig {
                source_type: WebhookSourceType::Pagerduty,
                remote_id: "pd1".to_string(),
            }],
            slack_channel_id: None,
            matching_criteria: MatchingCriteriaConfig {
                text_matches: vec!["outage".to_string()],
                slack_bot_app_user_id: None,
            },
            runbook: None,
            notification_integration_ids: Vec::new(),
            enabled: true,
        }
    }

    pub fn recorded(config: AlertResponderConfig) -> AlertResponderState {
        AlertResponderState {
            id: "ar_1".to_string(),
            config,
            url: Some("https://app.tierzero.com/responders/ar_1".to_string()),
            created_at: Some("2025-01-01T00:00:00Z".to_string()),
            updated_at: Some("2025-01-01T00:00:00Z".to_string()),
        }
    }
}
