use axum::extract::rejection::JsonRejection;
use axum::extract::rejection::QueryRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use serde_json::json;

use crate::tag::models::Tag;
use crate::tag::models::TagName;
use crate::task::errors::TaskError;
use crate::task::models::TaskDetails;
use crate::task::models::TaskId;
use crate::task::models::TaskPriority;
use crate::task::models::TaskStatus;

pub mod tags;
pub mod tasks;

pub use tags::list_tags;
pub use tasks::create_task;
pub use tasks::delete_task;
pub use tasks::get_task;
pub use tasks::list_tasks;
pub use tasks::update_task;

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<T>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(data))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    BadRequest(String),
    NotFound(String),
    Unauthorized(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(format!("Invalid task data: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<TaskError> for ApiError {
    fn from(err: TaskError) -> Self {
        match err {
            TaskError::NotFound(_) => ApiError::NotFound("Task not found".to_string()),
            TaskError::InvalidTaskId(_)
            | TaskError::InvalidTitle(_)
            | TaskError::InvalidTagName(_)
            | TaskError::InvalidStatus(_)
            | TaskError::InvalidPriority(_)
            | TaskError::InvalidDueDate(_) => ApiError::BadRequest(err.to_string()),
            TaskError::InvalidOwner(_) => {
                tracing::warn!(error = %err, "Rejecting verified identity");
                ApiError::Unauthorized("Authentication failed".to_string())
            }
            TaskError::DatabaseError(_) => {
                tracing::error!(error = %err, "Task operation failed");
                ApiError::InternalServerError("Internal server error".to_string())
            }
        }
    }
}

/// Parse a `:task_id` path segment.
pub(crate) fn parse_task_id(raw: &str) -> Result<TaskId, ApiError> {
    TaskId::from_string(raw).map_err(|_| ApiError::BadRequest("Invalid task ID".to_string()))
}

/// Treat a blank optional string as absent.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Tag as sent by clients; any `id` field is ignored, tags are matched by name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TagRequest {
    name: String,
}

pub(crate) fn parse_tag_names(tags: Vec<TagRequest>) -> Result<Vec<TagName>, TaskError> {
    let mut names: Vec<TagName> = Vec::with_capacity(tags.len());
    for tag in tags {
        let name = TagName::new(tag.name)?;
        if !names.contains(&name) {
            names.push(name);
        }
    }
    Ok(names)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskData {
    pub id: i64,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagData {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Tag> for TagData {
    fn from(tag: &Tag) -> Self {
        Self {
            id: tag.id.0,
            name: tag.name.as_str().to_string(),
            created_at: tag.created_at,
        }
    }
}

/// Task payload: `{"task": {...}, "tags": [...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskDetailsData {
    pub task: TaskData,
    pub tags: Vec<TagData>,
}

impl From<&TaskDetails> for TaskDetailsData {
    fn from(details: &TaskDetails) -> Self {
        let task = &details.task;
        Self {
            task: TaskData {
                id: task.id.0,
                title: task.title.as_str().to_string(),
                description: task.description.clone(),
                status: task.status,
                priority: task.priority,
                due_date: task.due_date,
                user_id: task.user_id.0,
                created_at: task.created_at,
                updated_at: task.updated_at,
            },
            tags: details.tags.iter().map(TagData::from).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageResponseData {
    pub message: String,
}
