use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::Router;
use tower_http::classify::ServerErrorsFailureClass;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::create_task;
use super::handlers::delete_task;
use super::handlers::get_task;
use super::handlers::list_tags;
use super::handlers::list_tasks;
use super::handlers::update_task;
use super::middleware::authenticate;
use crate::task::ports::TaskServicePort;

#[derive(Clone)]
pub struct AppState {
    pub task_service: Arc<dyn TaskServicePort>,
}

pub fn create_router(
    task_service: Arc<dyn TaskServicePort>,
    authenticator: Arc<Authenticator>,
) -> Router {
    let state = AppState { task_service };

    let api_routes = Router::new()
        .route("/api/tasks", get(list_tasks).post(create_task))
        .route(
            "/api/tasks/:task_id",
            get(get_task).put(update_task).delete(delete_task),
        )
        .route("/api/tags", get(list_tags))
        .route_layer(middleware::from_fn_with_state(authenticator, authenticate));

    // Only the path is recorded: query strings and headers can carry secrets.
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "request",
                service = "api-service",
                method = %request.method(),
                path = request.uri().path(),
            )
        })
        .on_request(|_request: &Request<Body>, _span: &Span| {
            tracing::debug!("Request received");
        })
        .on_response(|response: &Response<Body>, latency: Duration, _span: &Span| {
            tracing::info!(
                status = response.status().as_u16(),
                elapsed_ms = latency.as_millis(),
                "Response sent"
            );
        })
        .on_failure(
            |failure: ServerErrorsFailureClass, latency: Duration, _span: &Span| {
                tracing::error!(
                    failure = %failure,
                    elapsed_ms = latency.as_millis(),
                    "Request failed"
                );
            },
        );

    Router::new()
        .merge(api_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
