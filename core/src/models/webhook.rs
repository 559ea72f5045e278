use serde::{Deserialize, Serialize};

use super::lenient;

/// Delivery health reported by ClickUp, also used to re-enable a webhook.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WebhookStatus {
    #[default]
    Active,
    Failing,
    Suspended,
}

impl WebhookStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WebhookStatus::Active => "active",
            WebhookStatus::Failing => "failing",
            WebhookStatus::Suspended => "suspended",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebhookHealth {
    pub status: Option<WebhookStatus>,
    #[serde(default, deserialize_with = "lenient::integer")]
    pub fail_count: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Webhook {
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub userid: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub team_id: Option<String>,
    pub endpoint: Option<String>,
    pub client_id: Option<String>,
    #[serde(default)]
    pub events: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub task_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub list_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub folder_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub space_id: Option<String>,
    pub health: Option<WebhookHealth>,
    pub secret: Option<String>,
}

/// Body of a webhook registration. Unset scopes are left out of the request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateWebhook {
    pub endpoint: String,
    pub events: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub space_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
}

impl CreateWebhook {
    /// Subscribe `endpoint` to every event (`"*"`).
    pub fn all_events(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            events: vec!["*".to_string()],
            space_id: None,
            folder_id: None,
            list_id: None,
            task_id: None,
        }
    }
}
