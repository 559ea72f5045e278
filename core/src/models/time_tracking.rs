use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::lenient;
use super::task::{Tag, Task};
use super::user::User;

/// A tracked time interval. A running timer has no `end` and a negative
/// `duration`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeEntry {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: Option<String>,
    pub task: Option<Task>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub wid: Option<String>,
    pub user: Option<User>,
    pub billable: Option<bool>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub start: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub end: Option<String>,
    #[serde(default, deserialize_with = "lenient::integer")]
    pub duration: Option<i64>,
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    pub source: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub at: Option<String>,
}

impl TimeEntry {
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.start.as_deref().and_then(super::timestamp)
    }

    pub fn is_running(&self) -> bool {
        self.end.is_none() && self.duration.is_some_and(|duration| duration < 0)
    }
}
