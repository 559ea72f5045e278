use serde::{Deserialize, Serialize};

use super::to_body;
use crate::client::ClickUpClient;
use crate::error::{ClientError, Result};
use crate::http::ApiRequest;
use crate::models::{CreateWebhook, Webhook, WebhookStatus};

#[derive(Deserialize)]
struct Webhooks {
    #[serde(default)]
    webhooks: Vec<Webhook>,
}

#[derive(Deserialize)]
struct Envelope {
    webhook: Webhook,
}

/// New endpoint, event filter and status for an existing webhook.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateWebhook {
    pub endpoint: String,
    /// `"*"` or a comma separated list of event names.
    pub events: String,
    pub status: WebhookStatus,
}

impl UpdateWebhook {
    /// All events, marked active.
    pub fn endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            events: "*".to_string(),
            status: WebhookStatus::Active,
        }
    }
}

impl ClickUpClient {
    pub fn get_webhooks(&self, team_id: &str) -> Result<Vec<Webhook>> {
        let webhooks: Webhooks = self.fetch(ApiRequest::get(format!("team/{team_id}/webhook")))?;
        Ok(webhooks.webhooks)
    }

    pub fn create_webhook(&self, team_id: &str, webhook: &CreateWebhook) -> Result<Webhook> {
        if webhook.events.is_empty() {
            return Err(ClientError::validation("Webhook needs at least one event"));
        }
        let envelope: Envelope =
            self.fetch(ApiRequest::post(format!("team/{team_id}/webhook")).json(to_body(webhook)?))?;
        Ok(envelope.webhook)
    }

    pub fn update_webhook(&self, webhook_id: &str, update: &UpdateWebhook) -> Result<Webhook> {
        if update.events.trim().is_empty() {
            return Err(ClientError::validation("Webhook needs at least one event"));
        }
        let envelope: Envelope = self.fetch(ApiRequest::put(format!("webhook/{webhook_id}")).json(to_body(update)?))?;
        Ok(envelope.webhook)
    }

    pub fn delete_webhook(&self, webhook_id: &str) -> Result<()> {
        self.send(ApiRequest::delete(format!("webhook/{webhook_id}")))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::testing::{json_response, ManualClock, ScriptedTransport, NOW};

    fn client(transport: &ScriptedTransport) -> ClickUpClient {
        ClickUpClient::builder("pk_test")
            .transport(transport.clone())
            .clock(ManualClock::new(NOW))
            .build()
    }

    #[test]
    fn create_webhook_unwraps_envelope() {
        let transport = ScriptedTransport::new(vec![json_response(
            200,
            json!({"id": "4b67ac88", "webhook": {"id": "4b67ac88", "endpoint": "https://example.com/hook", "events": ["*"]}}),
        )]);
        let created = client(&transport)
            .create_webhook("108", &CreateWebhook::all_events("https://example.com/hook"))
            .unwrap();
        assert_eq!(created.id.as_deref(), Some("4b67ac88"));
        assert_eq!(
            transport.json_body(0),
            json!({"endpoint": "https://example.com/hook", "events": ["*"]})
        );
    }

    #[test]
    fn update_webhook_serializes_status() {
        let transport = ScriptedTransport::new(vec![json_response(
            200,
            json!({"id": "4b67ac88", "webhook": {"id": "4b67ac88", "health": {"status": "active", "fail_count": 0}}}),
        )]);
        let updated = client(&transport)
            .update_webhook("4b67ac88", &UpdateWebhook::endpoint("https://example.com/new"))
            .unwrap();
        assert_eq!(updated.health.unwrap().status, Some(WebhookStatus::Active));
        assert_eq!(
            transport.json_body(0),
            json!({"endpoint": "https://example.com/new", "events": "*", "status": "active"})
        );
    }

    #[test]
    fn webhook_without_events_is_rejected_locally() {
        let transport = ScriptedTransport::new(Vec::new());
        let mut webhook = CreateWebhook::all_events("https://example.com/hook");
        webhook.events.clear();
        let err = client(&transport).create_webhook("108", &webhook).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Validation);
        assert_eq!(transport.calls(), 0);
    }

    #[test]
    fn list_webhooks() {
        let transport = ScriptedTransport::new(vec![json_response(200, json!({"webhooks": [{"id": "a"}, {"id": "b"}]}))]);
        assert_eq!(client(&transport).get_webhooks("108").unwrap().len(), 2);
    }
}
