//! Response and request models for the ClickUp API.
//!
//! # Design
//! ClickUp omits fields freely and is inconsistent about scalar types: IDs,
//! order indexes and millisecond timestamps arrive as strings in one
//! endpoint and numbers in the next. Every field is therefore optional, and
//! the `lenient` helpers accept either shape and normalise to `String`.

mod checklist;
mod comment;
mod goal;
mod hierarchy;
mod task;
mod time_tracking;
mod user;
mod view;
mod webhook;

pub use checklist::{Checklist, ChecklistItem};
pub use comment::{Comment, CommentBlock};
pub use goal::Goal;
pub use hierarchy::{
    FeatureToggle, Folder, List, ListFolderRef, ListSpaceRef, SharedHierarchy, Space, SpaceFeatures, StatusElement,
};
pub use task::{
    Attachment, CreateTaskCustomField, CustomField, CustomFieldFilter, CustomFieldOption, CustomFieldTypeConfig,
    FilterOperator, Tag, Task, TaskPriority, TaskRef, TaskStatus,
};
pub use time_tracking::TimeEntry;
pub use user::{Member, Team, User};
pub use view::{ConversationView, StandardView, View};
pub use webhook::{CreateWebhook, Webhook, WebhookHealth, WebhookStatus};

use chrono::{DateTime, TimeZone, Utc};

/// Convert a ClickUp millisecond timestamp string into a UTC instant.
pub fn timestamp(millis: &str) -> Option<DateTime<Utc>> {
    let millis: i64 = millis.trim().parse().ok()?;
    Utc.timestamp_millis_opt(millis).single()
}

pub(crate) mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    /// String, number or bool as `Option<String>`; null reads as `None`.
    pub fn string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<Value>::deserialize(deserializer)? {
            None | Some(Value::Null) => None,
            Some(Value::String(text)) => Some(text),
            Some(other) => Some(other.to_string()),
        })
    }

    /// Number or numeric string as `Option<i64>`.
    pub fn integer<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<Value>::deserialize(deserializer)? {
            Some(Value::Number(number)) => number.as_i64().or_else(|| number.as_f64().map(|f| f as i64)),
            Some(Value::String(text)) => text.trim().parse::<f64>().ok().map(|f| f as i64),
            _ => None,
        })
    }
}
