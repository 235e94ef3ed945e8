//! Wire model for the alert responder API.
//!
//! Optional fields are `Option<_>` throughout so that "not provided" and
//! "provided empty" stay distinguishable after decoding.

use serde::{Deserialize, Serialize};

/// Alert responder as returned by the remote service.
///
/// Not every operation returns every field: `url` comes back from create,
/// update and list, but never from get, enable or disable. Enable and
/// disable may answer with a partial record, so identity fields decode as
/// empty when missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertResponder {
    #[serde(default)]
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_name: Option<String>,

    #[serde(default)]
    pub team_name: String,

    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runbook: Option<Runbook>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matching_criteria: Option<MatchingCriteria>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_sources: Option<Vec<WebhookSource>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slack_channel_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification_integration_ids: Option<Vec<String>>,

    /// Absent in some responses; a responder without a reported status is
    /// not considered active.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ResponderStatus>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl AlertResponder {
    /// Keep a previously known `url` when this response carries none.
    ///
    /// A known value is never replaced by an absent or empty one.
    pub fn merge_missing_url(&mut self, previous: Option<&str>) {
        let missing = self.url.as_deref().is_none_or(str::is_empty);
        if missing {
            self.url = previous
                .filter(|url| !url.is_empty())
                .map(str::to_string);
        }
    }

    /// Whether the responder is currently processing alerts.
    pub fn is_active(&self) -> bool {
        self.status.is_some_and(ResponderStatus::is_active)
    }
}

/// Server-owned lifecycle flag. Changed only through enable / disable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponderStatus {
    Active,
    Paused,
}

impl ResponderStatus {
    pub fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }

    pub fn from_enabled(enabled: bool) -> Self {
        if enabled { Self::Active } else { Self::Paused }
    }
}

/// Investigation prompts. Absent means the service default runbook.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Runbook {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub investigation_prompt: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact_and_severity_prompt: Option<String>,
}

/// How incoming alerts are matched to this responder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchingCriteria {
    #[serde(default)]
    pub text_matches: Vec<String>,

    /// Only meaningful for Slack-delivered alerts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slack_bot_app_user_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookSource {
    #[serde(rename = "type")]
    pub source_type: WebhookSourceType,

    pub remote_id: String,
}

/// Webhook source kinds known to the remote service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WebhookSourceType {
    Pagerduty,
    Opsgenie,
    Firehydrant,
    Rootly,
    /// Reported by the service for channel-delivered responders; not
    /// accepted as a declared webhook source.
    Slack,
}

impl WebhookSourceType {
    /// Types that may be declared as a webhook delivery target.
    pub const DECLARABLE: [Self; 4] = [
        Self::Pagerduty,
        Self::Opsgenie,
        Self::Firehydrant,
        Self::Rootly,
    ];

    pub fn is_declarable(self) -> bool {
        Self::DECLARABLE.contains(&self)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pagerduty => "PAGERDUTY",
            Self::Opsgenie => "OPSGENIE",
            Self::Firehydrant => "FIREHYDRANT",
            Self::Rootly => "ROOTLY",
            Self::Slack => "SLACK",
        }
    }
}

impl std::fmt::Display for WebhookSourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of `POST /alert-responders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateAlertResponderRequest {
    pub team_name: String,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_sources: Option<Vec<WebhookSource>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slack_channel_id: Option<String>,

    pub matching_criteria: MatchingCriteria,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runbook: Option<Runbook>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification_integration_ids: Option<Vec<String>>,
}

/// Body of `PUT /alert-responders/{id}`.
///
/// Partial: the service leaves every omitted field untouched. `team_name`
/// and `status` are deliberately not representable here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateAlertResponderRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matching_criteria: Option<MatchingCriteria>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_sources: Option<Vec<WebhookSource>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slack_channel_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runbook: Option<Runbook>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification_integration_ids: Option<Vec<String>>,
}

impl UpdateAlertResponderRequest {
    /// True when the payload would not change anything remotely.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.matching_criteria.is_none()
            && self.webhook_sources.is_none()
            && self.slack_channel_id.is_none()
            && self.runbook.is_none()
            && self.notification_integration_ids.is_none()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListAlertRespondersResponse {
    #[serde(default)]
    pub alert_responders: Vec<AlertResponder>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn get_response() -> serde_json::Value {
        json!({
            "id": "ar_123",
            "organization_name": "acme",
            "team_name": "ops",
            "name": "Outage responder",
            "matching_criteria": { "text_matches": ["outage"] },
            "webhook_sources": [{ "type": "PAGERDUTY", "remote_id": "pd1" }],
            "status": "PAUSED",
            "created_at": "2025-01-01T00:00:00Z",
            "updated_at": "2025-01-02T00:00:00Z"
        })
    }

    #[test]
    fn test_decode_get_response_without_url() {
        let responder: AlertResponder = serde_json::from_value(get_response()).unwrap();
        assert_eq!(responder.id, "ar_123");
        assert_eq!(responder.status, Some(ResponderStatus::Paused));
        assert!(!responder.is_active());
        assert!(responder.url.is_none());
        assert!(responder.runbook.is_none());
        assert!(responder.slack_channel_id.is_none());
        assert_eq!(
            responder.webhook_sources.unwrap()[0].source_type,
            WebhookSourceType::Pagerduty
        );
    }

    #[test]
    fn test_decode_rejects_unknown_status() {
        let mut value = get_response();
        value["status"] = json!("ARCHIVED");
        assert!(serde_json::from_value::<AlertResponder>(value).is_err());
    }

    #[test]
    fn test_missing_status_is_not_active() {
        let mut value = get_response();
        value.as_object_mut().unwrap().remove("status");
        let responder: AlertResponder = serde_json::from_value(value).unwrap();
        assert!(responder.status.is_none());
        assert!(!responder.is_active());

        let mut value = get_response();
        value["status"] = json!("ACTIVE");
        let responder: AlertResponder = serde_json::from_value(value).unwrap();
        assert!(responder.is_active());
    }

    #[test]
    fn test_decode_partial_status_response() {
        let responder: AlertResponder =
            serde_json::from_value(json!({ "status": "PAUSED" })).unwrap();
        assert!(responder.id.is_empty());
        assert!(responder.team_name.is_empty());
        assert!(!responder.is_active());
    }

    #[test]
    fn test_merge_missing_url_keeps_known_value() {
        let mut responder: AlertResponder = serde_json::from_value(get_response()).unwrap();
        responder.merge_missing_url(Some("https://app.tierzero.com/ar_123"));
        assert_eq!(
            responder.url.as_deref(),
            Some("https://app.tierzero.com/ar_123")
        );

        responder.url = Some(String::new());
        responder.merge_missing_url(Some("https://app.tierzero.com/ar_123"));
        assert_eq!(
            responder.url.as_deref(),
            Some("https://app.tierzero.com/ar_123")
        );
    }

    #[test]
    fn test_merge_missing_url_prefers_fresh_value() {
        let mut responder: AlertResponder = serde_json::from_value(get_response()).unwrap();
        responder.url = Some("https://new".to_string());
        responder.merge_missing_url(Some("https://old"));
        assert_eq!(responder.url.as_deref(), Some("https://new"));

        responder.url = None;
        responder.merge_missing_url(None);
        assert!(responder.url.is_none());
    }

    #[test]
    fn test_update_request_omits_unset_fields() {
        let req = UpdateAlertResponderRequest {
            name: Some("renamed".to_string()),
            ..Default::default()
        };
        assert!(!req.is_empty());
        assert_eq!(serde_json::to_value(&req).unwrap(), json!({ "name": "renamed" }));
        assert!(UpdateAlertResponderRequest::default().is_empty());
    }

    #[test]
    fn test_create_request_always_carries_required_fields() {
        let req = CreateAlertResponderRequest {
            team_name: "ops".to_string(),
            name: "A".to_string(),
            webhook_sources: None,
            slack_channel_id: Some("C0123".to_string()),
            matching_criteria: MatchingCriteria::default(),
            runbook: None,
            notification_integration_ids: None,
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({
                "team_name": "ops",
                "name": "A",
                "slack_channel_id": "C0123",
                "matching_criteria": { "text_matches": [] }
            })
        );
    }

    #[test]
    fn test_webhook_type_declarable() {
        assert!(WebhookSourceType::Rootly.is_declarable());
        assert!(!WebhookSourceType::Slack.is_declarable());
        assert_eq!(WebhookSourceType::Firehydrant.to_string(), "FIREHYDRANT");
    }
}
