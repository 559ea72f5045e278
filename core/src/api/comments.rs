use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{to_body, Query};
use crate::client::ClickUpClient;
use crate::error::{ClientError, Result};
use crate::http::ApiRequest;
use crate::models::{Comment, CommentBlock};

#[derive(Deserialize)]
struct Comments {
    #[serde(default)]
    comments: Vec<Comment>,
}

/// A comment to post. Needs plain text, rich blocks, or both.
#[derive(Debug, Clone, Serialize)]
pub struct NewComment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment_text: Option<String>,
    #[serde(rename = "comment", skip_serializing_if = "Vec::is_empty")]
    pub blocks: Vec<CommentBlock>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_assignee: Option<String>,
    pub notify_all: bool,
}

impl NewComment {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            comment_text: Some(text.into()),
            ..Self::blocks(Vec::new())
        }
    }

    pub fn blocks(blocks: Vec<CommentBlock>) -> Self {
        Self {
            comment_text: None,
            blocks,
            assignee: None,
            group_assignee: None,
            notify_all: true,
        }
    }

    fn validate(&self) -> Result<()> {
        let has_text = self.comment_text.as_deref().is_some_and(|text| !text.is_empty());
        if has_text || !self.blocks.is_empty() {
            Ok(())
        } else {
            Err(ClientError::validation("Either comment_text or comment blocks must be supplied"))
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateComment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment_text: Option<String>,
    #[serde(rename = "comment", skip_serializing_if = "Vec::is_empty")]
    pub blocks: Vec<CommentBlock>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved: Option<bool>,
}

impl ClickUpClient {
    pub fn get_task_comments(&self, task_id: &str) -> Result<Vec<Comment>> {
        self.comments(format!("task/{task_id}/comment"))
    }

    pub fn get_list_comments(&self, list_id: &str) -> Result<Vec<Comment>> {
        self.comments(format!("list/{list_id}/comment"))
    }

    /// Chat view comments, newest first. ClickUp returns 25 per call; pass
    /// the oldest comment's date and id to page backwards.
    pub fn get_chat_comments(
        &self,
        view_id: &str,
        start: Option<DateTime<Utc>>,
        start_id: Option<&str>,
    ) -> Result<Vec<Comment>> {
        let uri = Query::new()
            .time("start", start)
            .opt("start_id", start_id)
            .apply(format!("view/{view_id}/comment"));
        self.comments(uri)
    }

    /// Replies to a comment.
    pub fn get_threaded_comments(&self, comment_id: &str) -> Result<Vec<Comment>> {
        self.comments(format!("comment/{comment_id}/reply"))
    }

    pub fn create_task_comment(&self, task_id: &str, comment: &NewComment) -> Result<Comment> {
        self.post_comment(format!("task/{task_id}/comment"), comment)
    }

    pub fn create_chat_comment(&self, view_id: &str, comment: &NewComment) -> Result<Comment> {
        self.post_comment(format!("view/{view_id}/comment"), comment)
    }

    pub fn create_threaded_comment(&self, comment_id: &str, comment: &NewComment) -> Result<Comment> {
        self.post_comment(format!("comment/{comment_id}/reply"), comment)
    }

    pub fn update_comment(&self, comment_id: &str, update: &UpdateComment) -> Result<()> {
        self.send(ApiRequest::put(format!("comment/{comment_id}")).json(to_body(update)?))
    }

    pub fn delete_comment(&self, comment_id: &str) -> Result<()> {
        self.send(ApiRequest::delete(format!("comment/{comment_id}")))
    }

    fn comments(&self, uri: String) -> Result<Vec<Comment>> {
        let comments: Comments = self.fetch(ApiRequest::get(uri))?;
        Ok(comments.comments)
    }

    fn post_comment(&self, uri: String, comment: &NewComment) -> Result<Comment> {
        comment.validate()?;
        self.fetch(ApiRequest::post(uri).json(to_body(comment)?))
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;
    use crate::error::ErrorKind;
    use crate::testing::{json_response, ManualClock, ScriptedTransport, NOW};

    fn client(transport: &ScriptedTransport) -> ClickUpClient {
        ClickUpClient::builder("pk_test")
            .transport(transport.clone())
            .clock(ManualClock::new(NOW))
            .build()
    }

    #[test]
    fn comment_without_content_is_rejected_before_sending() {
        let transport = ScriptedTransport::new(vec![]);
        let client = client(&transport);
        let empty = NewComment::blocks(Vec::new());
        for result in [
            client.create_task_comment("9hz", &empty),
            client.create_chat_comment("3c-105", &empty),
            client.create_threaded_comment("458", &NewComment::text("")),
        ] {
            assert_eq!(result.unwrap_err().kind(), ErrorKind::Validation);
        }
        assert_eq!(transport.calls(), 0);
    }

    #[test]
    fn create_task_comment_body_and_response() {
        let transport = ScriptedTransport::new(vec![json_response(
            200,
            json!({"id": 458, "hist_id": "26508", "date": 1568036964079i64}),
        )]);
        let created = client(&transport)
            .create_task_comment("9hz", &NewComment::text("Task comment content"))
            .unwrap();
        assert_eq!(created.id.as_deref(), Some("458"));
        assert_eq!(created.date.as_deref(), Some("1568036964079"));
        assert_eq!(
            transport.json_body(0),
            json!({"comment_text": "Task comment content", "notify_all": true})
        );
    }

    #[test]
    fn rich_blocks_are_sent_as_comment() {
        let transport = ScriptedTransport::new(vec![json_response(200, json!({"id": "1"}))]);
        let comment = NewComment {
            assignee: Some(183),
            ..NewComment::blocks(vec![CommentBlock::text("hello "), CommentBlock::text("world")])
        };
        client(&transport).create_threaded_comment("458", &comment).unwrap();
        assert!(transport.requests()[0].url.ends_with("/comment/458/reply"));
        assert_eq!(
            transport.json_body(0),
            json!({"comment": [{"text": "hello "}, {"text": "world"}], "assignee": 183, "notify_all": true})
        );
    }

    #[test]
    fn chat_comments_page_from_start() {
        let transport = ScriptedTransport::new(vec![json_response(200, json!({"comments": [{"id": "1"}]}))]);
        let start = Utc.timestamp_millis_opt(1_568_036_964_079).unwrap();
        let comments = client(&transport)
            .get_chat_comments("3c-105", Some(start), Some("458"))
            .unwrap();
        assert_eq!(comments.len(), 1);
        assert!(transport.requests()[0]
            .url
            .ends_with("/view/3c-105/comment?start=1568036964079&start_id=458"));
    }

    #[test]
    fn update_comment_resolves() {
        let transport = ScriptedTransport::new(vec![json_response(200, json!({}))]);
        let update = UpdateComment {
            resolved: Some(true),
            ..UpdateComment::default()
        };
        client(&transport).update_comment("458", &update).unwrap();
        assert_eq!(transport.json_body(0), json!({"resolved": true}));
    }
}
