use std::sync::Arc;

use auth::Authenticator;
use axum::extract::Request;
use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde_json::json;

/// Middleware that verifies the bearer token and adds the caller's
/// `RequestIdentity` to request extensions.
///
/// Every rejection looks the same to the client; the reason is only logged.
pub async fn authenticate(
    State(authenticator): State<Arc<Authenticator>>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let identity = authenticator.verify_bearer(header).map_err(|e| {
        tracing::warn!(reason = %e, path = req.uri().path(), "Token verification failed");
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Authentication failed" })),
        )
            .into_response()
    })?;

    req.extensions_mut().insert(identity);

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::Mutex;
    use std::time::Duration;

    use auth::TokenSettings;
    use axum::body::Body;
    use axum::middleware::from_fn_with_state;
    use axum::routing::get;
    use axum::Router;
    use tower::ServiceExt;
    use tracing_subscriber::fmt::MakeWriter;

    use super::*;

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = CapturedLogs;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn app() -> Router {
        let authenticator = Arc::new(Authenticator::new(&TokenSettings::new(
            "middleware-test-key-of-at-least-32-bytes",
            "auth-service",
            "task-manager",
            Duration::from_secs(60),
        )));
        Router::new()
            .route("/api/tasks", get(|| async { "ok" }))
            .route_layer(from_fn_with_state(authenticator, authenticate))
    }

    #[tokio::test]
    async fn test_rejection_logs_path_without_query() {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let response = app()
            .oneshot(
                axum::http::Request::get("/api/tasks?access_token=leaked-secret")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let logged = logs.contents();
        assert!(logged.contains("Token verification failed"), "{}", logged);
        assert!(logged.contains("/api/tasks"), "{}", logged);
        assert!(!logged.contains("leaked-secret"), "{}", logged);
    }
}
