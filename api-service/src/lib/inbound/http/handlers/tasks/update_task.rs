use auth::RequestIdentity;
use axum::extract::rejection::JsonRejection;
use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;

use crate::inbound::http::handlers::non_empty;
use crate::inbound::http::handlers::parse_tag_names;
use crate::inbound::http::handlers::parse_task_id;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::TagRequest;
use crate::inbound::http::handlers::TaskDetailsData;
use crate::inbound::http::router::AppState;
use crate::task::errors::TaskError;
use crate::task::models::parse_due_date;
use crate::task::models::TaskPriority;
use crate::task::models::TaskStatus;
use crate::task::models::TaskTitle;
use crate::task::models::UpdateTaskCommand;
use crate::task::ports::TaskServicePort;

pub async fn update_task(
    State(state): State<AppState>,
    Extension(identity): Extension<RequestIdentity>,
    Path(task_id): Path<String>,
    body: Result<Json<UpdateTaskRequest>, JsonRejection>,
) -> Result<ApiSuccess<TaskDetailsData>, ApiError> {
    let task_id = parse_task_id(&task_id)?;
    let Json(body) = body?;

    state
        .task_service
        .update_task(&identity, task_id, body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref details| ApiSuccess::new(StatusCode::OK, details.into()))
}

/// HTTP request body for updating a task (raw JSON)
///
/// Absent or blank fields are left unchanged, except `title`, which must be
/// valid when present. `tags` replaces the tag set whenever it is present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UpdateTaskRequest {
    #[serde(default)]
    title: Option<String>,
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

impl UpdateTaskRequest {
    fn try_into_command(self) -> Result<UpdateTaskCommand, TaskError> {
        Ok(UpdateTaskCommand {
            title: self.title.map(TaskTitle::new).transpose()?,
            description: non_empty(self.description),
            status: non_empty(self.status)
                .map(|s| s.parse::<TaskStatus>())
                .transpose()?,
            priority: non_empty(self.priority)
                .map(|p| p.parse::<TaskPriority>())
                .transpose()?,
            due_date: non_empty(self.due_date)
                .map(|d| parse_due_date(&d))
                .transpose()?,
            tags: self.tags.map(parse_tag_names).transpose()?,
        })
    }
}
