use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::to_body;
use crate::client::ClickUpClient;
use crate::error::Result;
use crate::http::ApiRequest;
use crate::models::Checklist;

/// Checklist endpoints answer `{"checklist": {...}}`.
#[derive(Deserialize)]
struct Envelope {
    checklist: Checklist,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateChecklistItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved: Option<bool>,
    /// Nest the item under another item of the same checklist.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

impl ClickUpClient {
    pub fn create_checklist(&self, task_id: &str, name: &str) -> Result<Checklist> {
        self.checklist(ApiRequest::post(format!("task/{task_id}/checklist")).json(json!({ "name": name })))
    }

    /// Add an item; returns the whole checklist.
    pub fn create_checklist_item(&self, checklist_id: &str, name: &str, assignee: Option<i64>) -> Result<Checklist> {
        let mut body = Map::new();
        body.insert("name".to_string(), json!(name));
        if let Some(assignee) = assignee {
            body.insert("assignee".to_string(), json!(assignee));
        }
        self.checklist(ApiRequest::post(format!("checklist/{checklist_id}/checklist_item")).json(Value::Object(body)))
    }

    /// Rename or reorder a checklist. With nothing to change no request is
    /// made and `None` is returned.
    pub fn update_checklist(
        &self,
        checklist_id: &str,
        name: Option<&str>,
        position: Option<u32>,
    ) -> Result<Option<Checklist>> {
        let mut body = Map::new();
        if let Some(name) = name.filter(|name| !name.is_empty()) {
            body.insert("name".to_string(), json!(name));
        }
        if let Some(position) = position {
            body.insert("position".to_string(), json!(position));
        }
        if body.is_empty() {
            return Ok(None);
        }
        self.checklist(ApiRequest::put(format!("checklist/{checklist_id}")).json(Value::Object(body)))
            .map(Some)
    }

    pub fn delete_checklist(&self, checklist_id: &str) -> Result<()> {
        self.send(ApiRequest::delete(format!("checklist/{checklist_id}")))
    }

    pub fn delete_checklist_item(&self, checklist_id: &str, checklist_item_id: &str) -> Result<()> {
        self.send(ApiRequest::delete(format!(
            "checklist/{checklist_id}/checklist_item/{checklist_item_id}"
        )))
    }

    pub fn update_checklist_item(
        &self,
        checklist_id: &str,
        checklist_item_id: &str,
        update: &UpdateChecklistItem,
    ) -> Result<Checklist> {
        self.checklist(
            ApiRequest::put(format!("checklist/{checklist_id}/checklist_item/{checklist_item_id}"))
                .json(to_body(update)?),
        )
    }

    fn checklist(&self, request: ApiRequest) -> Result<Checklist> {
        let envelope: Envelope = self.fetch(request)?;
        Ok(envelope.checklist)
    }
}
