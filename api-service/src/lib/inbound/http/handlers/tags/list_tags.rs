use auth::RequestIdentity;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::TagData;
use crate::inbound::http::router::AppState;
use crate::task::ports::TaskServicePort;

pub async fn list_tags(
    State(state): State<AppState>,
    Extension(identity): Extension<RequestIdentity>,
) -> Result<ApiSuccess<Vec<TagData>>, ApiError> {
    state
        .task_service
        .list_tags(&identity)
        .await
        .map_err(ApiError::from)
        .map(|tags| ApiSuccess::new(StatusCode::OK, tags.iter().map(TagData::from).collect()))
}
