use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{millis, to_body, validate_priority};
use crate::client::ClickUpClient;
use crate::error::Result;
use crate::http::ApiRequest;
use crate::models::{List, User};

#[derive(Deserialize)]
struct Lists {
    #[serde(default)]
    lists: Vec<List>,
}

#[derive(Deserialize)]
pub(super) struct Members {
    #[serde(default)]
    pub(super) members: Vec<User>,
}

/// Body for `create_list` and `create_folderless_list`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateList {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(with = "millis", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl CreateList {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateList {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(with = "millis", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date_time: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unset_status: Option<bool>,
}

impl ClickUpClient {
    pub fn get_list(&self, list_id: &str) -> Result<List> {
        self.fetch(ApiRequest::get(format!("list/{list_id}")))
    }

    /// Lists that sit directly in a space, outside any folder.
    pub fn get_folderless_lists(&self, space_id: &str) -> Result<Vec<List>> {
        let lists: Lists = self.fetch(ApiRequest::get(format!("space/{space_id}/list")))?;
        Ok(lists.lists)
    }

    /// Lists inside a folder.
    pub fn get_lists(&self, folder_id: &str) -> Result<Vec<List>> {
        let lists: Lists = self.fetch(ApiRequest::get(format!("folder/{folder_id}/list")))?;
        Ok(lists.lists)
    }

    pub fn create_list(&self, folder_id: &str, list: &CreateList) -> Result<List> {
        validate_priority(list.priority)?;
        self.fetch(ApiRequest::post(format!("folder/{folder_id}/list")).json(to_body(list)?))
    }

    pub fn create_folderless_list(&self, space_id: &str, list: &CreateList) -> Result<List> {
        validate_priority(list.priority)?;
        self.fetch(ApiRequest::post(format!("space/{space_id}/list")).json(to_body(list)?))
    }

    pub fn update_list(&self, list_id: &str, update: &UpdateList) -> Result<List> {
        validate_priority(update.priority)?;
        self.fetch(ApiRequest::put(format!("list/{list_id}")).json(to_body(update)?))
    }

    pub fn delete_list(&self, list_id: &str) -> Result<()> {
        self.send(ApiRequest::delete(format!("list/{list_id}")))
    }

    /// Add a task to an additional list (Tasks in Multiple Lists).
    pub fn add_task_to_list(&self, task_id: &str, list_id: &str) -> Result<()> {
        self.send(ApiRequest::post(format!("list/{list_id}/task/{task_id}")))
    }

    pub fn remove_task_from_list(&self, task_id: &str, list_id: &str) -> Result<()> {
        self.send(ApiRequest::delete(format!("list/{list_id}/task/{task_id}")))
    }

    /// Users with explicit access to a list.
    pub fn get_list_members(&self, list_id: &str) -> Result<Vec<User>> {
        let members: Members = self.fetch(ApiRequest::get(format!("list/{list_id}/member")))?;
        Ok(members.members)
    }
}
