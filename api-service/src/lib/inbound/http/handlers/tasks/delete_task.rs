use auth::RequestIdentity;
use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use crate::inbound::http::handlers::parse_task_id;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::MessageResponseData;
use crate::inbound::http::router::AppState;
use crate::task::ports::TaskServicePort;

pub async fn delete_task(
    State(state): State<AppState>,
    Extension(identity): Extension<RequestIdentity>,
    Path(task_id): Path<String>,
) -> Result<ApiSuccess<MessageResponseData>, ApiError> {
    let task_id = parse_task_id(&task_id)?;

    state
        .task_service
        .delete_task(&identity, task_id)
        .await
        .map_err(ApiError::from)?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        MessageResponseData {
            message: "Task deleted successfully".to_string(),
        },
    ))
}
