//! Resource operations, one module per ClickUp entity.
//!
//! # Design
//! Every operation is a method on `ClickUpClient` that builds an
//! `ApiRequest`, runs it through `execute`, and maps the JSON into a model.
//! Operations whose only useful answer is "it worked" return `Result<()>`.
//! Calls with many optional inputs take a parameter struct implementing
//! `Default` and `Serialize`; unset fields are skipped so the request only
//! carries what the caller chose to change.
//!
//! Validation failures (priority outside 1..=4, a comment without content)
//! are returned before any request is sent.

mod checklists;
mod comments;
mod folders;
mod goals;
mod lists;
mod spaces;
mod tasks;
mod time_tracking;
mod views;
mod webhooks;

pub use checklists::UpdateChecklistItem;
pub use comments::{NewComment, UpdateComment};
pub use goals::{CreateGoal, UpdateGoal};
pub use lists::{CreateList, UpdateList};
pub use tasks::{AssigneeChanges, CreateTask, OrderBy, TaskQuery, TeamTaskQuery, UpdateTask};
pub use time_tracking::TimeEntryQuery;
pub use webhooks::UpdateWebhook;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use url::form_urlencoded;

use crate::error::{ClientError, Result};

/// Serialize an operation body, surfacing failures as `Serialization` errors.
pub(crate) fn to_body(body: &impl Serialize) -> Result<Value> {
    serde_json::to_value(body).map_err(ClientError::serialization)
}

pub(crate) fn validate_priority(priority: Option<u8>) -> Result<()> {
    match priority {
        Some(priority) if !(1..=4).contains(&priority) => Err(ClientError::validation(format!(
            "Priority must be in range of 1-4, got {priority}"
        ))),
        _ => Ok(()),
    }
}

/// Percent-encode a caller-supplied value for use as one URI path segment.
pub(crate) fn path_segment(value: &str) -> String {
    // form encoding writes spaces as '+' and escapes a literal '+', so the
    // swap yields a valid path segment.
    form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// Serde helper: `Option<DateTime<Utc>>` as Unix milliseconds.
pub(crate) mod millis {
    use chrono::{DateTime, Utc};
    use serde::Serializer;

    pub fn serialize<S>(at: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match at {
            Some(at) => serializer.serialize_i64(at.timestamp_millis()),
            None => serializer.serialize_none(),
        }
    }
}

/// Query string builder for GET operations.
///
/// Array parameters are repeated with a `[]` suffix (`statuses[]=a&statuses[]=b`).
#[derive(Debug, Default)]
pub(crate) struct Query {
    pairs: Vec<(String, String)>,
}

impl Query {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(mut self, key: &str, value: impl ToString) -> Self {
        self.pairs.push((key.to_string(), value.to_string()));
        self
    }

    pub(crate) fn opt(self, key: &str, value: Option<impl ToString>) -> Self {
        match value {
            Some(value) => self.push(key, value),
            None => self,
        }
    }

    /// Only emit `key=true`; false is ClickUp's default.
    pub(crate) fn flag(self, key: &str, on: bool) -> Self {
        if on {
            self.push(key, true)
        } else {
            self
        }
    }

    pub(crate) fn time(self, key: &str, at: Option<DateTime<Utc>>) -> Self {
        self.opt(key, at.map(|at| at.timestamp_millis()))
    }

    pub(crate) fn list<T: ToString>(mut self, key: &str, values: &[T]) -> Self {
        let key = format!("{key}[]");
        for value in values {
            self.pairs.push((key.clone(), value.to_string()));
        }
        self
    }

    /// `uri` with the encoded query appended, or unchanged when empty.
    pub(crate) fn apply(self, uri: impl Into<String>) -> String {
        let uri = uri.into();
        if self.pairs.is_empty() {
            return uri;
        }
        let encoded = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(&self.pairs)
            .finish();
        format!("{uri}?{encoded}")
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn query_encodes_arrays_and_skips_unset() {
        let uri = Query::new()
            .push("page", 0)
            .flag("reverse", false)
            .flag("subtasks", true)
            .opt("order_by", None::<&str>)
            .list("statuses", &["to do", "in progress"])
            .apply("list/1/task");
        assert_eq!(
            uri,
            "list/1/task?page=0&subtasks=true&statuses%5B%5D=to+do&statuses%5B%5D=in+progress"
        );
    }

    #[test]
    fn empty_query_leaves_uri_alone() {
        assert_eq!(Query::new().apply("team"), "team");
    }

    #[test]
    fn time_params_are_millis() {
        let at = Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(
            Query::new().time("due_date_gt", Some(at)).apply("x"),
            "x?due_date_gt=1609459200000"
        );
    }

    #[test]
    fn path_segment_escapes_spaces_and_slashes() {
        assert_eq!(path_segment("needs review"), "needs%20review");
        assert_eq!(path_segment("a/b+c"), "a%2Fb%2Bc");
        assert_eq!(path_segment("plain"), "plain");
    }

    #[test]
    fn priority_bounds() {
        assert!(validate_priority(None).is_ok());
        assert!(validate_priority(Some(1)).is_ok());
        assert!(validate_priority(Some(4)).is_ok());
        let err = validate_priority(Some(5)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.status_code(), None);
        assert!(validate_priority(Some(0)).is_err());
    }
}
