use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::lenient;
use super::user::User;

/// One rich-text block of a comment.
///
/// ClickUp attaches a different payload per block type (image, attachment,
/// task mention, emoticon, ...); only the text is modelled, the rest is kept
/// in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommentBlock {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CommentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: Option<String>,
    #[serde(default)]
    pub comment: Vec<CommentBlock>,
    pub comment_text: Option<String>,
    pub user: Option<User>,
    pub resolved: Option<bool>,
    pub assignee: Option<User>,
    pub assigned_by: Option<User>,
    #[serde(default)]
    pub reactions: Vec<Value>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub date: Option<String>,
    pub hist_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::integer")]
    pub reply_count: Option<i64>,
}
