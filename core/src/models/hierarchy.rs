use serde::{Deserialize, Serialize};

use super::lenient;
use super::task::{TaskPriority, TaskStatus};
use super::user::User;

/// Status definition attached to a list or space.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusElement {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: Option<String>,
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient::integer")]
    pub orderindex: Option<i64>,
    pub color: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListFolderRef {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: Option<String>,
    pub name: Option<String>,
    pub hidden: Option<bool>,
    pub access: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListSpaceRef {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: Option<String>,
    pub name: Option<String>,
    pub access: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct List {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: Option<String>,
    pub name: Option<String>,
    pub deleted: Option<bool>,
    pub archived: Option<bool>,
    #[serde(default, deserialize_with = "lenient::integer")]
    pub orderindex: Option<i64>,
    pub override_statuses: Option<bool>,
    pub priority: Option<TaskPriority>,
    pub assignee: Option<User>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub due_date: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub start_date: Option<String>,
    pub folder: Option<ListFolderRef>,
    pub space: Option<ListSpaceRef>,
    #[serde(default)]
    pub statuses: Vec<StatusElement>,
    pub inbound_address: Option<String>,
    pub permission_level: Option<String>,
    pub content: Option<String>,
    pub status: Option<TaskStatus>,
    #[serde(default, deserialize_with = "lenient::integer")]
    pub task_count: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::integer")]
    pub orderindex: Option<i64>,
    pub override_statuses: Option<bool>,
    pub hidden: Option<bool>,
    pub space: Option<ListSpaceRef>,
    #[serde(default, deserialize_with = "lenient::integer")]
    pub task_count: Option<i64>,
    #[serde(default)]
    pub lists: Vec<List>,
}

/// `{"enabled": bool}` flag used throughout space features.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureToggle {
    #[serde(default)]
    pub enabled: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpaceFeatures {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_dates: Option<FeatureToggle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_tracking: Option<FeatureToggle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<FeatureToggle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_estimates: Option<FeatureToggle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checklists: Option<FeatureToggle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_fields: Option<FeatureToggle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remap_dependencies: Option<FeatureToggle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dependency_warning: Option<FeatureToggle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub portfolios: Option<FeatureToggle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiple_assignees: Option<FeatureToggle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sprints: Option<FeatureToggle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<FeatureToggle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_items: Option<FeatureToggle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zoom: Option<FeatureToggle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestones: Option<FeatureToggle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emails: Option<FeatureToggle>,
}

impl SpaceFeatures {
    /// Every toggle set to `enabled`, the shape `create_space` sends.
    pub fn all(enabled: bool) -> Self {
        let on = Some(FeatureToggle { enabled });
        Self {
            due_dates: on,
            time_tracking: on,
            tags: on,
            time_estimates: on,
            checklists: on,
            custom_fields: on,
            remap_dependencies: on,
            dependency_warning: on,
            portfolios: on,
            multiple_assignees: on,
            sprints: on,
            points: on,
            custom_items: on,
            zoom: on,
            milestones: on,
            emails: on,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Space {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: Option<String>,
    pub name: Option<String>,
    pub access: Option<bool>,
    pub private: Option<bool>,
    pub multiple_assignees: Option<bool>,
    pub archived: Option<bool>,
    pub features: Option<SpaceFeatures>,
    #[serde(default)]
    pub statuses: Vec<StatusElement>,
}

/// Tasks, lists and folders shared with the authenticated user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SharedHierarchy {
    #[serde(default)]
    pub tasks: Vec<String>,
    #[serde(default)]
    pub lists: Vec<List>,
    #[serde(default)]
    pub folders: Vec<Folder>,
}
