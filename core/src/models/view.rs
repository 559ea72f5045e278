use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::lenient;

/// Board, list, calendar and other task views.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StandardView {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub parent: Option<Value>,
    pub grouping: Option<Value>,
    pub divide: Option<Value>,
    pub sorting: Option<Value>,
    pub filters: Option<Value>,
    pub columns: Option<Value>,
    pub team_sidebar: Option<Value>,
    pub settings: Option<Value>,
}

/// Chat view, which carries comments instead of task layout settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationView {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub parent: Option<Value>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub date_created: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub creator: Option<String>,
    pub visibility: Option<String>,
    pub protected: Option<bool>,
    pub protected_note: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub protected_by: Option<String>,
    #[serde(default, deserialize_with = "lenient::integer")]
    pub orderindex: Option<i64>,
}

/// A list view, discriminated by its `type` field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum View {
    Conversation(ConversationView),
    Standard(StandardView),
}

impl View {
    pub fn id(&self) -> Option<&str> {
        match self {
            View::Conversation(view) => view.id.as_deref(),
            View::Standard(view) => view.id.as_deref(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            View::Conversation(view) => view.name.as_deref(),
            View::Standard(view) => view.name.as_deref(),
        }
    }
}

impl<'de> Deserialize<'de> for View {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let conversation = value.get("type").and_then(Value::as_str) == Some("conversation");
        if conversation {
            ConversationView::deserialize(value)
                .map(View::Conversation)
                .map_err(de::Error::custom)
        } else {
            StandardView::deserialize(value).map(View::Standard).map_err(de::Error::custom)
        }
    }
}
