use auth::RequestIdentity;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;

use crate::inbound::http::handlers::non_empty;
use crate::inbound::http::handlers::parse_tag_names;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::TagRequest;
use crate::inbound::http::handlers::TaskDetailsData;
use crate::inbound::http::router::AppState;
use crate::task::errors::TaskError;
use crate::task::models::parse_due_date;
use crate::task::models::CreateTaskCommand;
use crate::task::models::TaskPriority;
use crate::task::models::TaskStatus;
use crate::task::models::TaskTitle;
use crate::task::ports::TaskServicePort;

pub async fn create_task(
    State(state): State<AppState>,
    Extension(identity): Extension<RequestIdentity>,
    body: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> Result<ApiSuccess<TaskDetailsData>, ApiError> {
    let Json(body) = body?;

    state
        .task_service
        .create_task(&identity, body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref details| ApiSuccess::new(StatusCode::CREATED, details.into()))
}

/// HTTP request body for creating a task (raw JSON)
///
/// Blank status or priority fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateTaskRequest {
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    priority: Option<String>,
    #[serde(default)]
    due_date: Option<String>,
    #[serde(default)]
    tags: Option<Vec<TagRequest>>,
}

impl CreateTaskRequest {
    fn try_into_command(self) -> Result<CreateTaskCommand, TaskError> {
        Ok(CreateTaskCommand {
            title: TaskTitle::new(self.title)?,
            description: non_empty(self.description),
            status: non_empty(self.status)
                .map(|s| s.parse::<TaskStatus>())
                .transpose()?
                .unwrap_or_default(),
            priority: non_empty(self.priority)
                .map(|p| p.parse::<TaskPriority>())
                .transpose()?
                .unwrap_or_default(),
            due_date: non_empty(self.due_date)
                .map(|d| parse_due_date(&d))
                .transpose()?,
            tags: parse_tag_names(self.tags.unwrap_or_default())?,
        })
    }
}
