use auth::RequestIdentity;
use axum::extract::rejection::QueryRejection;
use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use serde::Deserialize;

use crate::inbound::http::handlers::non_empty;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::TaskDetailsData;
use crate::inbound::http::router::AppState;
use crate::tag::models::TagName;
use crate::task::errors::TaskError;
use crate::task::models::parse_due_date;
use crate::task::models::TaskFilter;
use crate::task::models::TaskPriority;
use crate::task::models::TaskStatus;
use crate::task::ports::TaskServicePort;

/// Select value the dashboard sends for "no restriction".
const MATCH_ANY: &str = "ALL";

pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(identity): Extension<RequestIdentity>,
    query: Result<Query<ListTasksQuery>, QueryRejection>,
) -> Result<ApiSuccess<Vec<TaskDetailsData>>, ApiError> {
    let Query(query) = query?;
    let filter = query.try_into_filter()?;

    state
        .task_service
        .list_tasks(&identity, filter)
        .await
        .map_err(ApiError::from)
        .map(|tasks| {
            ApiSuccess::new(
                StatusCode::OK,
                tasks.iter().map(TaskDetailsData::from).collect(),
            )
        })
}

/// Query string filters (raw)
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ListTasksQuery {
    status: Option<String>,
    priority: Option<String>,
    due_date_before: Option<String>,
    due_date_after: Option<String>,
    #[serde(rename = "tagName")]
    tag_name: Option<String>,
}

fn selected(value: Option<String>) -> Option<String> {
    non_empty(value).filter(|v| v != MATCH_ANY)
}

impl ListTasksQuery {
    fn try_into_filter(self) -> Result<TaskFilter, TaskError> {
        Ok(TaskFilter {
            status: selected(self.status)
                .map(|s| s.parse::<TaskStatus>())
                .transpose()?,
            priority: selected(self.priority)
                .map(|p| p.parse::<TaskPriority>())
                .transpose()?,
            due_before: non_empty(self.due_date_before)
                .map(|d| parse_due_date(&d))
                .transpose()?,
            due_after: non_empty(self.due_date_after)
                .map(|d| parse_due_date(&d))
                .transpose()?,
            tag_name: selected(self.tag_name).map(TagName::new).transpose()?,
        })
    }
}
