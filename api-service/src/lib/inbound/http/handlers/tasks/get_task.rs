use auth::RequestIdentity;
use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use crate::inbound::http::handlers::parse_task_id;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::TaskDetailsData;
use crate::inbound::http::router::AppState;
use crate::task::ports::TaskServicePort;

pub async fn get_task(
    State(state): State<AppState>,
    Extension(identity): Extension<RequestIdentity>,
    Path(task_id): Path<String>,
) -> Result<ApiSuccess<TaskDetailsData>, ApiError> {
    let task_id = parse_task_id(&task_id)?;

    state
        .task_service
        .get_task(&identity, task_id)
        .await
        .map_err(ApiError::from)
        .map(|ref details| ApiSuccess::new(StatusCode::OK, details.into()))
}
