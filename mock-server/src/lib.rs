//! In-process stand-in for the slice of the ClickUp API the client tests use.
//!
//! # Design
//! Every route sits behind one `gate` middleware that imitates ClickUp's
//! cross-cutting behaviour, in this order:
//!
//! 1. token check (`Authorization` must equal the configured token),
//! 2. scripted gateway hiccups: the first `gateway_hiccups` requests get a
//!    non-JSON 502 page,
//! 3. a fixed-window request quota reported through `x-ratelimit-remaining`
//!    and `x-ratelimit-reset` (epoch seconds), with a 429 once it is spent.
//!
//! Entities live in memory for the lifetime of the router.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Multipart, Path, Request, State},
    http::{header, HeaderName, HeaderValue, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{
    net::TcpListener,
    sync::{Mutex, RwLock},
};
use uuid::Uuid;

pub const DEFAULT_TOKEN: &str = "pk_mock_token";

const REMAINING: HeaderName = HeaderName::from_static("x-ratelimit-remaining");
const RESET: HeaderName = HeaderName::from_static("x-ratelimit-reset");

#[derive(Clone, Debug)]
pub struct MockConfig {
    pub token: String,
    /// Requests allowed per window.
    pub quota: i64,
    pub window_secs: i64,
    /// Leading requests answered with a non-JSON 502.
    pub gateway_hiccups: u32,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            token: DEFAULT_TOKEN.to_string(),
            quota: 100,
            window_secs: 60,
            gateway_hiccups: 0,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TaskStatus {
    pub status: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ListRef {
    pub id: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: Option<Value>,
    pub archived: bool,
    pub date_created: String,
    pub date_updated: String,
    pub list: ListRef,
    pub url: String,
}

#[derive(Deserialize)]
pub struct CreateTask {
    pub name: String,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<u8>,
}

#[derive(Deserialize)]
pub struct UpdateTask {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<u8>,
    pub archived: Option<bool>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub comment_text: String,
    pub date: String,
    pub resolved: bool,
}

#[derive(Deserialize)]
pub struct CreateComment {
    pub comment_text: Option<String>,
}

#[derive(Default)]
struct Store {
    tasks: HashMap<String, Task>,
    comments: HashMap<String, Vec<Comment>>,
    next_comment_id: u64,
}

struct Gate {
    used: i64,
    reset: i64,
    hiccups_left: u32,
}

#[derive(Clone)]
pub struct AppState {
    config: Arc<MockConfig>,
    store: Arc<RwLock<Store>>,
    gate: Arc<Mutex<Gate>>,
}

impl AppState {
    fn new(config: MockConfig) -> Self {
        let gate = Gate {
            used: 0,
            reset: Utc::now().timestamp() + config.window_secs,
            hiccups_left: config.gateway_hiccups,
        };
        Self {
            config: Arc::new(config),
            store: Arc::new(RwLock::new(Store::default())),
            gate: Arc::new(Mutex::new(gate)),
        }
    }
}

pub fn app() -> Router {
    app_with(MockConfig::default())
}

pub fn app_with(config: MockConfig) -> Router {
    let state = AppState::new(config);
    let api = Router::new()
        .route("/team", get(get_teams))
        .route("/list/{list_id}/task", get(list_tasks).post(create_task))
        .route("/task/{task_id}", get(get_task).put(update_task).delete(delete_task))
        .route("/task/{task_id}/comment", get(list_comments).post(create_comment))
        .route("/task/{task_id}/attachment", post(upload_attachment))
        .layer(middleware::from_fn_with_state(state.clone(), gate))
        .with_state(state);
    Router::new().nest("/api/v2", api)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with(listener, MockConfig::default()).await
}

pub async fn run_with(listener: TcpListener, config: MockConfig) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(config)).await
}

fn clickup_error(status: StatusCode, err: &str, ecode: &str) -> Response {
    (status, Json(json!({ "err": err, "ECODE": ecode }))).into_response()
}

fn task_not_found() -> Response {
    clickup_error(StatusCode::NOT_FOUND, "Task not found, deleted", "ITEM_013")
}

fn now_millis() -> String {
    Utc::now().timestamp_millis().to_string()
}

fn priority(level: u8) -> Value {
    let (name, color) = match level {
        1 => ("urgent", "#f50000"),
        2 => ("high", "#ffcc00"),
        3 => ("normal", "#6fddff"),
        _ => ("low", "#d8d8d8"),
    };
    json!({ "id": level.to_string(), "priority": name, "color": color, "orderindex": level.to_string() })
}

async fn gate(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        == Some(state.config.token.as_str());
    if !authorized {
        tracing::debug!(uri = %request.uri(), "rejecting request with bad token");
        return clickup_error(StatusCode::UNAUTHORIZED, "Token invalid", "OAUTH_025");
    }

    let (remaining, reset) = {
        let mut gate = state.gate.lock().await;
        if gate.hiccups_left > 0 {
            gate.hiccups_left -= 1;
            tracing::debug!(left = gate.hiccups_left, "serving gateway hiccup");
            return (
                StatusCode::BAD_GATEWAY,
                [(header::CONTENT_TYPE, "text/html")],
                "<html><body><h1>502 Bad Gateway</h1></body></html>",
            )
                .into_response();
        }

        let now = Utc::now().timestamp();
        if now >= gate.reset {
            gate.used = 0;
            gate.reset = now + state.config.window_secs;
        }
        if gate.used >= state.config.quota {
            tracing::debug!(reset = gate.reset, "quota spent");
            let mut response = clickup_error(StatusCode::TOO_MANY_REQUESTS, "Rate limit reached", "APP_002");
            response.headers_mut().insert(REMAINING, HeaderValue::from(0i64));
            response.headers_mut().insert(RESET, HeaderValue::from(gate.reset));
            return response;
        }
        gate.used += 1;
        (state.config.quota - gate.used, gate.reset)
    };

    let mut response = next.run(request).await;
    response.headers_mut().insert(REMAINING, HeaderValue::from(remaining));
    response.headers_mut().insert(RESET, HeaderValue::from(reset));
    response
}

async fn get_teams() -> Json<Value> {
    Json(json!({
        "teams": [{
            "id": "512",
            "name": "Mock Workspace",
            "color": "#000000",
            "avatar": null,
            "members": [{"user": {"id": 183, "username": "Mock User", "email": "mock@example.com"}}]
        }]
    }))
}

async fn list_tasks(State(state): State<AppState>, Path(list_id): Path<String>) -> Json<Value> {
    let store = state.store.read().await;
    let mut tasks: Vec<&Task> = store
        .tasks
        .values()
        .filter(|task| task.list.id == list_id && !task.archived)
        .collect();
    tasks.sort_by(|a, b| a.date_created.cmp(&b.date_created).then(a.id.cmp(&b.id)));
    Json(json!({ "tasks": tasks }))
}

async fn create_task(
    State(state): State<AppState>,
    Path(list_id): Path<String>,
    Json(input): Json<CreateTask>,
) -> Response {
    if input.name.trim().is_empty() {
        return clickup_error(StatusCode::BAD_REQUEST, "Task name invalid", "INPUT_005");
    }
    let id = Uuid::new_v4().simple().to_string()[..9].to_string();
    let now = now_millis();
    let task = Task {
        url: format!("https://app.clickup.com/t/{id}"),
        id,
        name: input.name,
        description: input.description,
        status: TaskStatus {
            status: input.status.unwrap_or_else(|| "to do".to_string()),
        },
        priority: input.priority.map(priority),
        archived: false,
        date_created: now.clone(),
        date_updated: now,
        list: ListRef { id: list_id },
    };
    tracing::info!(task_id = %task.id, list_id = %task.list.id, "created task");
    state.store.write().await.tasks.insert(task.id.clone(), task.clone());
    Json(task).into_response()
}

async fn get_task(State(state): State<AppState>, Path(task_id): Path<String>) -> Response {
    let store = state.store.read().await;
    match store.tasks.get(&task_id) {
        Some(task) => Json(task.clone()).into_response(),
        None => task_not_found(),
    }
}

async fn update_task(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
    Json(input): Json<UpdateTask>,
) -> Response {
    let mut store = state.store.write().await;
    let Some(task) = store.tasks.get_mut(&task_id) else {
        return task_not_found();
    };
    if let Some(name) = input.name {
        task.name = name;
    }
    if let Some(description) = input.description {
        task.description = Some(description);
    }
    if let Some(status) = input.status {
        task.status = TaskStatus { status };
    }
    if let Some(level) = input.priority {
        task.priority = Some(priority(level));
    }
    if let Some(archived) = input.archived {
        task.archived = archived;
    }
    task.date_updated = now_millis();
    Json(task.clone()).into_response()
}

async fn delete_task(State(state): State<AppState>, Path(task_id): Path<String>) -> Response {
    let mut store = state.store.write().await;
    if store.tasks.remove(&task_id).is_none() {
        return task_not_found();
    }
    store.comments.remove(&task_id);
    tracing::info!(%task_id, "deleted task");
    Json(json!({})).into_response()
}

async fn list_comments(State(state): State<AppState>, Path(task_id): Path<String>) -> Response {
    let store = state.store.read().await;
    if !store.tasks.contains_key(&task_id) {
        return task_not_found();
    }
    // Newest first, like ClickUp.
    let comments: Vec<&Comment> = store
        .comments
        .get(&task_id)
        .map(|comments| comments.iter().rev().collect())
        .unwrap_or_default();
    Json(json!({ "comments": comments })).into_response()
}

async fn create_comment(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
    Json(input): Json<CreateComment>,
) -> Response {
    let Some(text) = input.comment_text.filter(|text| !text.is_empty()) else {
        return clickup_error(StatusCode::BAD_REQUEST, "Comment text invalid", "INPUT_003");
    };
    let mut store = state.store.write().await;
    if !store.tasks.contains_key(&task_id) {
        return task_not_found();
    }
    store.next_comment_id += 1;
    let comment = Comment {
        id: store.next_comment_id.to_string(),
        comment_text: text,
        date: now_millis(),
        resolved: false,
    };
    let body = json!({
        "id": store.next_comment_id,
        "hist_id": Uuid::new_v4().to_string(),
        "date": Utc::now().timestamp_millis(),
    });
    store.comments.entry(task_id).or_default().push(comment);
    Json(body).into_response()
}

async fn upload_attachment(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
    mut multipart: Multipart,
) -> Response {
    if !state.store.read().await.tasks.contains_key(&task_id) {
        return task_not_found();
    }
    let mut upload = None;
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(err) => return err.into_response(),
        };
        if field.name() != Some("attachment") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("upload").to_string();
        match field.bytes().await {
            Ok(bytes) => upload = Some((file_name, bytes.len())),
            Err(err) => return err.into_response(),
        }
    }
    let Some((file_name, size)) = upload else {
        return clickup_error(StatusCode::BAD_REQUEST, "No attachment supplied", "UPLOAD_002");
    };

    let extension = file_name.rsplit_once('.').map(|(_, ext)| ext.to_string()).unwrap_or_default();
    let id = format!("{}.{extension}", Uuid::new_v4());
    tracing::info!(%task_id, %file_name, size, "stored attachment");
    Json(json!({
        "id": id,
        "version": "0",
        "date": Utc::now().timestamp_millis(),
        "title": file_name,
        "extension": extension,
        "thumbnail_small": format!("https://attachments.example.com/{id}/small"),
        "thumbnail_large": format!("https://attachments.example.com/{id}/large"),
        "url": format!("https://attachments.example.com/{id}/{file_name}"),
    }))
    .into_response()
}
