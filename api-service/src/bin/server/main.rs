use std::sync::Arc;

use api_service::config::Config;
use api_service::inbound::http::router::create_router;
use api_service::inbound::probe::create_probe_router;
use api_service::inbound::server::run_until_failure;
use api_service::outbound::health::PostgresReadiness;
use api_service::outbound::repositories::PostgresTagRepository;
use api_service::outbound::repositories::PostgresTaskRepository;
use api_service::task::service::TaskService;
use auth::Authenticator;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "api-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        database_host = %config.database.host,
        database_name = %config.database.name,
        http_port = config.server.port,
        probe_port = config.server.probe_port,
        jwt = ?config.jwt,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .max_lifetime(config.database.max_lifetime())
        .connect_with(config.database.connect_options())
        .await?;
    tracing::info!(
        max_connections = config.database.max_connections,
        min_connections = config.database.min_connections,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let authenticator = Arc::new(Authenticator::new(&config.jwt.token_settings()));
    let task_repository = Arc::new(PostgresTaskRepository::new(pg_pool.clone()));
    let tag_repository = Arc::new(PostgresTagRepository::new(pg_pool.clone()));
    let task_service = Arc::new(TaskService::new(task_repository, tag_repository));
    let readiness = Arc::new(PostgresReadiness::new(pg_pool));

    let http_address = format!("0.0.0.0:{}", config.server.port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(task_service, authenticator);
    let http_server =
        tokio::spawn(async move { axum::serve(http_listener, http_application).await });

    let probe_address = format!("0.0.0.0:{}", config.server.probe_port);
    let probe_listener = tokio::net::TcpListener::bind(&probe_address).await?;
    tracing::info!(
        address = %probe_address,
        port = config.server.probe_port,
        protocol = "http",
        "Probe server listening"
    );

    let probe_server = tokio::spawn(async move {
        axum::serve(probe_listener, create_probe_router(readiness)).await
    });

    run_until_failure(http_server, probe_server).await?;

    Ok(())
}
