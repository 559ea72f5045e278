//! Task queries and mutations, attachments and task membership.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::lists::Members;
use super::{millis, to_body, validate_priority, Query};
use crate::client::ClickUpClient;
use crate::error::{ClientError, Result};
use crate::http::{ApiRequest, FileAttachment};
use crate::models::{Attachment, CreateTaskCustomField, CustomFieldFilter, Task, User};

#[derive(Deserialize)]
struct Tasks {
    #[serde(default)]
    tasks: Vec<Task>,
}

/// Sort key for task listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrderBy {
    Id,
    #[default]
    Created,
    Updated,
    DueDate,
}

impl OrderBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderBy::Id => "id",
            OrderBy::Created => "created",
            OrderBy::Updated => "updated",
            OrderBy::DueDate => "due_date",
        }
    }
}

/// Filters for `get_tasks`. ClickUp pages at 100 tasks; a shorter page is
/// the last one.
#[derive(Debug, Clone, Default)]
pub struct TaskQuery {
    pub archived: bool,
    pub page: u32,
    pub order_by: OrderBy,
    pub reverse: bool,
    pub subtasks: bool,
    pub statuses: Vec<String>,
    pub include_closed: bool,
    pub assignees: Vec<String>,
    pub due_date_gt: Option<DateTime<Utc>>,
    pub due_date_lt: Option<DateTime<Utc>>,
    pub date_created_gt: Option<DateTime<Utc>>,
    pub date_created_lt: Option<DateTime<Utc>>,
    pub date_updated_gt: Option<DateTime<Utc>>,
    pub date_updated_lt: Option<DateTime<Utc>>,
    pub custom_fields: Vec<CustomFieldFilter>,
}

/// Filters for `get_team_tasks`, which searches a whole workspace.
#[derive(Debug, Clone, Default)]
pub struct TeamTaskQuery {
    pub page: u32,
    pub order_by: OrderBy,
    pub reverse: bool,
    pub subtasks: bool,
    pub space_ids: Vec<String>,
    pub project_ids: Vec<String>,
    pub list_ids: Vec<String>,
    pub statuses: Vec<String>,
    pub include_closed: bool,
    pub assignees: Vec<String>,
    pub tags: Vec<String>,
    pub due_date_gt: Option<DateTime<Utc>>,
    pub due_date_lt: Option<DateTime<Utc>>,
    pub date_created_gt: Option<DateTime<Utc>>,
    pub date_created_lt: Option<DateTime<Utc>>,
    pub date_updated_gt: Option<DateTime<Utc>>,
    pub date_updated_lt: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateTask {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u8>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub assignees: Vec<i64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(with = "millis", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(with = "millis", skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    pub notify_all: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub custom_fields: Vec<CreateTaskCustomField>,
}

impl CreateTask {
    /// A task with only a name; everyone is notified.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            priority: None,
            assignees: Vec::new(),
            tags: Vec::new(),
            status: None,
            due_date: None,
            start_date: None,
            parent: None,
            notify_all: true,
            custom_fields: Vec::new(),
        }
    }
}

/// Users to add to and remove from a task's assignees or watchers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AssigneeChanges {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub add: Vec<i64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rem: Vec<i64>,
}

impl AssigneeChanges {
    fn is_empty(&self) -> bool {
        self.add.is_empty() && self.rem.is_empty()
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateTask {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u8>,
    /// Milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_estimate: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archived: Option<bool>,
    #[serde(skip_serializing_if = "AssigneeChanges::is_empty")]
    pub assignees: AssigneeChanges,
    #[serde(skip_serializing_if = "AssigneeChanges::is_empty")]
    pub watchers: AssigneeChanges,
}

impl ClickUpClient {
    pub fn get_task(&self, task_id: &str, include_subtasks: bool) -> Result<Task> {
        let uri = Query::new()
            .flag("include_subtasks", include_subtasks)
            .apply(format!("task/{task_id}"));
        self.fetch(ApiRequest::get(uri))
    }

    /// One page of tasks from a list.
    pub fn get_tasks(&self, list_id: &str, query: &TaskQuery) -> Result<Vec<Task>> {
        let mut params = Query::new()
            .push("archived", query.archived)
            .push("page", query.page)
            .push("order_by", query.order_by.as_str())
            .push("reverse", query.reverse)
            .push("include_closed", query.include_closed)
            .flag("subtasks", query.subtasks)
            .list("statuses", &query.statuses)
            .list("assignees", &query.assignees)
            .time("due_date_gt", query.due_date_gt)
            .time("due_date_lt", query.due_date_lt)
            .time("date_created_gt", query.date_created_gt)
            .time("date_created_lt", query.date_created_lt)
            .time("date_updated_gt", query.date_updated_gt)
            .time("date_updated_lt", query.date_updated_lt);
        if !query.custom_fields.is_empty() {
            let filters = serde_json::to_string(&query.custom_fields).map_err(ClientError::serialization)?;
            params = params.push("custom_fields", filters);
        }
        let tasks: Tasks = self.fetch(ApiRequest::get(params.apply(format!("list/{list_id}/task"))))?;
        Ok(tasks.tasks)
    }

    /// One page of tasks matching `query` across a workspace.
    pub fn get_team_tasks(&self, team_id: &str, query: &TeamTaskQuery) -> Result<Vec<Task>> {
        let params = Query::new()
            .push("page", query.page)
            .push("order_by", query.order_by.as_str())
            .push("reverse", query.reverse)
            .flag("subtasks", query.subtasks)
            .flag("include_closed", query.include_closed)
            .list("space_ids", &query.space_ids)
            .list("project_ids", &query.project_ids)
            .list("list_ids", &query.list_ids)
            .list("statuses", &query.statuses)
            .list("assignees", &query.assignees)
            .list("tags", &query.tags)
            .time("due_date_gt", query.due_date_gt)
            .time("due_date_lt", query.due_date_lt)
            .time("date_created_gt", query.date_created_gt)
            .time("date_created_lt", query.date_created_lt)
            .time("date_updated_gt", query.date_updated_gt)
            .time("date_updated_lt", query.date_updated_lt);
        let tasks: Tasks = self.fetch(ApiRequest::get(params.apply(format!("team/{team_id}/task"))))?;
        Ok(tasks.tasks)
    }

    pub fn create_task(&self, list_id: &str, task: &CreateTask) -> Result<Task> {
        validate_priority(task.priority)?;
        self.fetch(ApiRequest::post(format!("list/{list_id}/task")).json(to_body(task)?))
    }

    pub fn update_task(&self, task_id: &str, update: &UpdateTask) -> Result<Task> {
        validate_priority(update.priority)?;
        self.fetch(ApiRequest::put(format!("task/{task_id}")).json(to_body(update)?))
    }

    pub fn delete_task(&self, task_id: &str) -> Result<()> {
        self.send(ApiRequest::delete(format!("task/{task_id}")))
    }

    /// Link `task_id` to `links_to`.
    pub fn add_task_link(&self, task_id: &str, links_to: &str) -> Result<()> {
        self.send(ApiRequest::post(format!("task/{task_id}/link/{links_to}")))
    }

    /// The value's JSON shape depends on the field type: text, number,
    /// option id, millisecond date, label ids, ...
    pub fn set_custom_field_value(&self, task_id: &str, field_id: &str, value: Value) -> Result<()> {
        self.send(ApiRequest::post(format!("task/{task_id}/field/{field_id}")).json(json!({ "value": value })))
    }

    /// Upload a file as a task attachment (multipart form).
    pub fn upload_attachment(&self, task_id: &str, file: FileAttachment) -> Result<Attachment> {
        let fields = json!({ "filename": file.file_name });
        self.fetch(
            ApiRequest::post(format!("task/{task_id}/attachment"))
                .json(fields)
                .attachment(file),
        )
    }

    /// Users who can see a task.
    pub fn get_task_members(&self, task_id: &str) -> Result<Vec<User>> {
        let members: Members = self.fetch(ApiRequest::get(format!("task/{task_id}/member")))?;
        Ok(members.members)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::error::ErrorKind;
    use crate::http::HttpMethod;
    use crate::models::FilterOperator;
    use crate::testing::{json_response, ManualClock, ScriptedTransport, NOW};

    fn client(transport: &ScriptedTransport) -> ClickUpClient {
        ClickUpClient::builder("pk_test")
            .transport(transport.clone())
            .clock(ManualClock::new(NOW))
            .build()
    }

    fn query_of(url: &str) -> Vec<(String, String)> {
        let (_, query) = url.split_once('?').unwrap_or((url, ""));
        url::form_urlencoded::parse(query.as_bytes()).into_owned().collect()
    }

    #[test]
    fn get_task_parses_minimal_body() {
        let transport = ScriptedTransport::new(vec![json_response(
            200,
            json!({"id": "000000000", "name": "TEST", "status": {"status": "TODO"}}),
        )]);
        let task = client(&transport).get_task("000000000", false).unwrap();
        assert_eq!(task.name.as_deref(), Some("TEST"));
        assert_eq!(task.status.unwrap().status.as_deref(), Some("TODO"));
        assert!(transport.requests()[0].url.ends_with("/task/000000000"));
    }

    #[test]
    fn get_task_with_subtasks_adds_flag() {
        let transport = ScriptedTransport::new(vec![json_response(200, json!({"id": "x"}))]);
        client(&transport).get_task("x", true).unwrap();
        assert!(transport.requests()[0].url.ends_with("/task/x?include_subtasks=true"));
    }

    #[test]
    fn get_tasks_encodes_filters() {
        let transport = ScriptedTransport::new(vec![json_response(200, json!({"tasks": [{"id": "a"}, {"id": "b"}]}))]);
        let query = TaskQuery {
            page: 2,
            order_by: OrderBy::DueDate,
            statuses: vec!["to do".to_string(), "done".to_string()],
            due_date_gt: Some(Utc.timestamp_millis_opt(1_600_000_000_000).unwrap()),
            custom_fields: vec![CustomFieldFilter {
                field_id: "de761538".to_string(),
                operator: FilterOperator::Equals,
                value: json!("1"),
            }],
            ..TaskQuery::default()
        };
        let tasks = client(&transport).get_tasks("124", &query).unwrap();
        assert_eq!(tasks.len(), 2);

        let url = transport.requests()[0].url.clone();
        assert!(url.contains("/list/124/task?"));
        let params = query_of(&url);
        let get = |key: &str| -> Vec<&str> {
            params.iter().filter(|(k, _)| k == key).map(|(_, v)| v.as_str()).collect()
        };
        assert_eq!(get("archived"), ["false"]);
        assert_eq!(get("page"), ["2"]);
        assert_eq!(get("order_by"), ["due_date"]);
        assert_eq!(get("statuses[]"), ["to do", "done"]);
        assert_eq!(get("due_date_gt"), ["1600000000000"]);
        assert!(get("subtasks").is_empty());
        let filters: Value = serde_json::from_str(get("custom_fields")[0]).unwrap();
        assert_eq!(filters, json!([{"field_id": "de761538", "operator": "=", "value": "1"}]));
    }

    #[test]
    fn team_tasks_carry_scope_ids() {
        let transport = ScriptedTransport::new(vec![json_response(200, json!({"tasks": []}))]);
        let query = TeamTaskQuery {
            space_ids: vec!["1".to_string()],
            list_ids: vec!["2".to_string(), "3".to_string()],
            tags: vec!["urgent".to_string()],
            ..TeamTaskQuery::default()
        };
        assert!(client(&transport).get_team_tasks("512", &query).unwrap().is_empty());

        let params = query_of(&transport.requests()[0].url);
        assert!(params.contains(&("space_ids[]".to_string(), "1".to_string())));
        assert!(params.contains(&("list_ids[]".to_string(), "3".to_string())));
        assert!(params.contains(&("tags[]".to_string(), "urgent".to_string())));
        assert!(params.contains(&("order_by".to_string(), "created".to_string())));
    }

    #[test]
    fn create_task_with_out_of_range_priority_sends_nothing() {
        let transport = ScriptedTransport::new(vec![]);
        let task = CreateTask {
            priority: Some(5),
            ..CreateTask::named("Fix the build")
        };
        let err = client(&transport).create_task("124", &task).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(transport.calls(), 0);
    }

    #[test]
    fn create_task_body() {
        let transport = ScriptedTransport::new(vec![json_response(200, json!({"id": "9hx", "name": "New Task Name"}))]);
        let task = CreateTask {
            priority: Some(3),
            assignees: vec![183],
            custom_fields: vec![CreateTaskCustomField {
                id: "0a52c486".to_string(),
                value: json!(23),
            }],
            ..CreateTask::named("New Task Name")
        };
        let created = client(&transport).create_task("124", &task).unwrap();
        assert_eq!(created.id.as_deref(), Some("9hx"));
        assert_eq!(
            transport.json_body(0),
            json!({
                "name": "New Task Name",
                "priority": 3,
                "assignees": [183],
                "notify_all": true,
                "custom_fields": [{"id": "0a52c486", "value": 23}]
            })
        );
    }

    #[test]
    fn update_task_sends_assignee_changes() {
        let transport = ScriptedTransport::new(vec![json_response(200, json!({"id": "9hx"}))]);
        let update = UpdateTask {
            status: Some("in progress".to_string()),
            assignees: AssigneeChanges {
                add: vec![182],
                rem: vec![183],
            },
            watchers: AssigneeChanges {
                add: vec![],
                rem: vec![7],
            },
            ..UpdateTask::default()
        };
        client(&transport).update_task("9hx", &update).unwrap();
        assert_eq!(transport.requests()[0].method, HttpMethod::Put);
        assert_eq!(
            transport.json_body(0),
            json!({
                "status": "in progress",
                "assignees": {"add": [182], "rem": [183]},
                "watchers": {"rem": [7]}
            })
        );
    }

    #[test]
    fn set_custom_field_value_posts_value() {
        let transport = ScriptedTransport::new(vec![json_response(200, json!({}))]);
        client(&transport)
            .set_custom_field_value("9hx", "5dc86497", json!(["label-1"]))
            .unwrap();
        assert!(transport.requests()[0].url.ends_with("/task/9hx/field/5dc86497"));
        assert_eq!(transport.json_body(0), json!({"value": ["label-1"]}));
    }

    #[test]
    fn upload_attachment_is_multipart() {
        let transport = ScriptedTransport::new(vec![json_response(
            200,
            json!({"id": "ac434d4e-8b1c-4571-951b-866b6d9f2ee6.png", "version": "0", "title": "image.png"}),
        )]);
        let file = FileAttachment::new("image.png", b"\x89PNG".to_vec()).content_type("image/png");
        let attachment = client(&transport).upload_attachment("9hx", file).unwrap();
        assert_eq!(attachment.title.as_deref(), Some("image.png"));
        assert_eq!(attachment.version, Some(0));

        let sent = &transport.requests()[0];
        assert!(sent.url.ends_with("/task/9hx/attachment"));
        assert!(sent.header("Content-Type").unwrap().starts_with("multipart/form-data; boundary="));
        let body = String::from_utf8_lossy(sent.body.as_deref().unwrap()).into_owned();
        assert!(body.contains("name=\"filename\""));
        assert!(body.contains("name=\"attachment\"; filename=\"image.png\""));
    }

    #[test]
    fn task_members_unwrap_envelope() {
        let transport = ScriptedTransport::new(vec![json_response(
            200,
            json!({"members": [{"id": 812, "username": "John Doe"}]}),
        )]);
        let members = client(&transport).get_task_members("9hz").unwrap();
        assert_eq!(members[0].id.as_deref(), Some("812"));
    }
}
