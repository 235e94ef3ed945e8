//! Change detection between declared configuration and recorded state.
//!
//! The result is a plain value so that what changed can be tested
//! independently of how the changes are sent.

use std::collections::BTreeSet;
use std::fmt;

use crate::state::{AlertResponderConfig, AlertResponderState, RunbookConfig};

/// Independently updatable field groups. `team_name` is absent on purpose:
/// it is immutable once created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldGroup {
    Name,
    WebhookSources,
    SlackChannelId,
    MatchingCriteria,
    Runbook,
    NotificationIntegrationIds,
}

impl FieldGroup {
    pub const ALL: [Self; 6] = [
        Self::Name,
        Self::WebhookSources,
        Self::SlackChannelId,
        Self::MatchingCriteria,
        Self::Runbook,
        Self::NotificationIntegrationIds,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::WebhookSources => "webhook_sources",
            Self::SlackChannelId => "slack_channel_id",
            Self::MatchingCriteria => "matching_criteria",
            Self::Runbook => "runbook",
            Self::NotificationIntegrationIds => "notification_integration_ids",
        }
    }

    fn differs(self, declared: &AlertResponderConfig, recorded: &AlertResponderConfig) -> bool {
        match self {
            Self::Name => declared.name != recorded.name,
            Self::WebhookSources => declared.webhook_sources != recorded.webhook_sources,
            Self::SlackChannelId => declared.slack_channel() != recorded.slack_channel(),
            Self::MatchingCriteria => {
                declared.matching_criteria.normalized() != recorded.matching_criteria.normalized()
            }
            Self::Runbook => {
                declared.runbook.as_ref().map(RunbookConfig::normalized)
                    != recorded.runbook.as_ref().map(RunbookConfig::normalized)
            }
            Self::NotificationIntegrationIds => {
                declared.notification_integration_ids != recorded.notification_integration_ids
            }
        }
    }
}

impl fmt::Display for FieldGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Side-channel status transition, applied through enable / disable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusChange {
    Enable,
    Disable,
}

impl StatusChange {
    fn between(declared: bool, recorded: bool) -> Option<Self> {
        match (declared, recorded) {
            (true, false) => Some(Self::Enable),
            (false, true) => Some(Self::Disable),
            _ => None,
        }
    }
}

/// What an update pass has to change remotely.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    pub status: Option<StatusChange>,
    pub fields: BTreeSet<FieldGroup>,
}

impl ChangeSet {
    /// Compare declared configuration to recorded state, group by group.
    ///
    /// Ordered collections compare element-wise in order; optional blocks
    /// are unchanged when both are absent and changed when only one is.
    pub fn between(declared: &AlertResponderConfig, recorded: &AlertResponderState) -> Self {
        let fields = FieldGroup::ALL
            .into_iter()
            .filter(|group| group.differs(declared, &recorded.config))
            .collect();

        Self {
            status: StatusChange::between(declared.enabled, recorded.config.enabled),
            fields,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.fields.is_empty()
    }

    pub fn has_field_changes(&self) -> bool {
        !self.fields.is_empty()
    }

    pub fn contains(&self, group: FieldGroup) -> bool {
        self.fields.contains(&group)
    }

    /// Comma separated group names, for logging.
    pub fn describe(&self) -> String {
        self.fields
            .iter()
            .map(|g| g.as_str())
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// A `team_name` change cannot be applied in place.
pub fn requires_replacement(declared: &AlertResponderConfig, recorded: &AlertResponderState) -> bool {
    declared.team_name != recorded.config.team_name
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::fixtures::{recorded, webhook_config};
    use crate::state::WebhookSourceConfig;
    use tierzero_client::WebhookSourceType;

    #[test]
    fn test_identical_is_empty() {
        let cfg = webhook_config();
        let changes = ChangeSet::between(&cfg, &recorded(cfg.clone()));
        assert!(changes.is_empty());
        assert!(!changes.has_field_changes());
    }

    #[test]
    fn test_enabled_only() {
        let cfg = webhook_config();
        let mut declared = cfg.clone();
        declared.enabled = false;
        let changes = ChangeSet::between(&declared, &recorded(cfg));
        assert_eq!(changes.status, Some(StatusChange::Disable));
        assert!(!changes.has_field_changes());
    }

    #[test]
    fn test_team_name_never_a_field_change() {
        let cfg = webhook_config();
        let mut declared = cfg.clone();
        declared.team_name = "platform".to_string();
        let state = recorded(cfg);
        assert!(ChangeSet::between(&declared, &state).is_empty());
        assert!(requires_replacement(&declared, &state));
    }

    #[test]
    fn test_order_sensitive_lists() {
        let mut cfg = webhook_config();
        cfg.webhook_sources.push(WebhookSourceConfig {
            source_type: WebhookSourceType::Rootly,
            remote_id: "r1".to_string(),
        });
        cfg.notification_integration_ids = vec!["n1".to_string(), "n2".to_string()];
        let state = recorded(cfg.clone());

        let mut declared = cfg.clone();
        declared.webhook_sources.reverse();
        declared.notification_integration_ids.reverse();
        let changes = ChangeSet::between(&declared, &state);
        assert!(changes.contains(FieldGroup::WebhookSources));
        assert!(changes.contains(FieldGroup::NotificationIntegrationIds));
        assert_eq!(changes.fields.len(), 2);
    }

    #[test]
    fn test_optional_block_presence() {
        let cfg = webhook_config();
        let state = recorded(cfg.clone());

        let mut declared = cfg.clone();
        declared.runbook = Some(RunbookConfig::default());
        assert!(ChangeSet::between(&declared, &state).contains(FieldGroup::Runbook));

        let mut with_runbook = cfg.clone();
        with_runbook.runbook = Some(RunbookConfig {
            prompt: Some("dig".to_string()),
            fast_prompt: None,
        });
        let state = recorded(with_runbook.clone());
        assert!(ChangeSet::between(&cfg, &state).contains(FieldGroup::Runbook));
        assert!(ChangeSet::between(&with_runbook, &state).is_empty());
    }

    #[test]
    fn test_matching_criteria_nested_fields() {
        let cfg = webhook_config();
        let state = recorded(cfg.clone());

        let mut declared = cfg.clone();
        declared.matching_criteria.slack_bot_app_user_id = Some("U123".to_string());
        let changes = ChangeSet::between(&declared, &state);
        assert_eq!(
            changes.fields.iter().copied().collect::<Vec<_>>(),
            vec![FieldGroup::MatchingCriteria]
        );
    }

    #[test]
    fn test_delivery_switch_and_name() {
        let cfg = webhook_config();
        let state = recorded(cfg.clone());

        let mut declared = cfg.clone();
        declared.name = "B".to_string();
        declared.webhook_sources.clear();
        declared.slack_channel_id = Some("C1".to_string());
        declared.enabled = false;

        let changes = ChangeSet::between(&declared, &state);
        assert_eq!(changes.status, Some(StatusChange::Disable));
        assert_eq!(changes.describe(), "name,webhook_sources,slack_channel_id");
    }

    #[test]
    fn test_blank_strings_equal_absent() {
        let cfg = webhook_config();
        let mut with_runbook = cfg.clone();
        with_runbook.runbook = Some(RunbookConfig {
            prompt: None,
            fast_prompt: Some("triage".to_string()),
        });
        let state = recorded(with_runbook.clone());

        let mut declared = with_runbook;
        declared.matching_criteria.slack_bot_app_user_id = Some(String::new());
        if let Some(runbook) = declared.runbook.as_mut() {
            runbook.prompt = Some(String::new());
        }
        assert!(ChangeSet::between(&declared, &state).is_empty());

        // A blank prompt against a recorded one is still a change.
        let mut prompted = cfg.clone();
        prompted.runbook = Some(RunbookConfig {
            prompt: Some("dig".to_string()),
            fast_prompt: None,
        });
        let state = recorded(prompted);
        let mut declared = cfg;
        declared.runbook = Some(RunbookConfig {
            prompt: Some(String::new()),
            fast_prompt: None,
        });
        assert!(ChangeSet::between(&declared, &state).contains(FieldGroup::Runbook));
    }

    #[test]
    fn test_empty_channel_equals_absent() {
        let cfg = webhook_config();
        let state = recorded(cfg.clone());
        let mut declared = cfg.clone();
        declared.slack_channel_id = Some(String::new());
        assert!(ChangeSet::between(&declared, &state).is_empty());
    }
}
