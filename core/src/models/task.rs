use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::lenient;
use super::user::User;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskStatus {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: Option<String>,
    pub status: Option<String>,
    pub color: Option<String>,
    #[serde(default, deserialize_with = "lenient::integer")]
    pub orderindex: Option<i64>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskPriority {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: Option<String>,
    pub priority: Option<String>,
    pub color: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub orderindex: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub name: Option<String>,
    pub tag_fg: Option<String>,
    pub tag_bg: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub creator: Option<String>,
}

/// Reference to the list, folder or space a task lives in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskRef {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: Option<String>,
    pub name: Option<String>,
    pub access: Option<bool>,
    pub hidden: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomFieldOption {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: Option<String>,
    pub name: Option<String>,
    pub color: Option<String>,
    #[serde(default, deserialize_with = "lenient::integer")]
    pub orderindex: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomFieldTypeConfig {
    pub default: Option<Value>,
    pub placeholder: Option<String>,
    pub new_drop_down: Option<bool>,
    #[serde(default)]
    pub options: Vec<CustomFieldOption>,
    pub include_guests: Option<bool>,
    pub include_team_members: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomField {
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub type_config: Option<CustomFieldTypeConfig>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub date_created: Option<String>,
    pub hide_from_guests: Option<bool>,
    pub value: Option<Value>,
    pub required: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: Option<String>,
    pub custom_id: Option<String>,
    pub name: Option<String>,
    pub text_content: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub orderindex: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub date_created: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub date_updated: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub date_closed: Option<String>,
    pub archived: Option<bool>,
    pub creator: Option<User>,
    #[serde(default)]
    pub assignees: Vec<User>,
    #[serde(default)]
    pub watchers: Vec<User>,
    #[serde(default)]
    pub checklists: Vec<Value>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    pub parent: Option<String>,
    pub priority: Option<TaskPriority>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub due_date: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub start_date: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub time_estimate: Option<String>,
    #[serde(default, deserialize_with = "lenient::integer")]
    pub time_spent: Option<i64>,
    #[serde(default)]
    pub custom_fields: Vec<CustomField>,
    pub list: Option<TaskRef>,
    pub folder: Option<TaskRef>,
    pub space: Option<TaskRef>,
    #[serde(default)]
    pub subtasks: Vec<Task>,
    pub url: Option<String>,
}

impl Task {
    pub fn due_date_at(&self) -> Option<DateTime<Utc>> {
        self.due_date.as_deref().and_then(super::timestamp)
    }

    pub fn date_created_at(&self) -> Option<DateTime<Utc>> {
        self.date_created.as_deref().and_then(super::timestamp)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::integer")]
    pub version: Option<i64>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub date: Option<String>,
    pub title: Option<String>,
    pub extension: Option<String>,
    pub thumbnail_small: Option<String>,
    pub thumbnail_large: Option<String>,
    pub url: Option<String>,
}

/// Comparison operator for custom field task filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterOperator {
    #[serde(rename = "=")]
    Equals,
    #[serde(rename = "<")]
    LessThan,
    #[serde(rename = "<=")]
    LessThanOrEquals,
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = ">=")]
    GreaterThanOrEquals,
    #[serde(rename = "!=")]
    NotEquals,
    #[serde(rename = "IS NULL")]
    IsNull,
    #[serde(rename = "IS NOT NULL")]
    IsNotNull,
    #[serde(rename = "RANGE")]
    Range,
    #[serde(rename = "ANY")]
    Any,
    #[serde(rename = "NOT ANY")]
    NotAny,
    #[serde(rename = "NOT ALL")]
    NotAll,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomFieldFilter {
    pub field_id: String,
    pub operator: FilterOperator,
    pub value: Value,
}

/// Custom field value set at task creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTaskCustomField {
    pub id: String,
    pub value: Value,
}
