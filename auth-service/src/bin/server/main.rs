use std::sync::Arc;

use auth::Authenticator;
use auth::PasswordHasher;
use auth_service::config::Config;
use auth_service::credential::service::CredentialService;
use auth_service::inbound::http::router::create_router;
use auth_service::inbound::probe::create_probe_router;
use auth_service::inbound::server::run_until_failure;
use auth_service::outbound::health::PostgresReadiness;
use auth_service::outbound::repositories::PostgresCredentialRepository;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "auth_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "auth-service",
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

    let authenticator = Arc::new(Authenticator::with_password_hasher(
        &config.jwt.token_settings(),
        PasswordHasher::with_params(config.password.hashing_params()),
    ));
    let credential_repository = Arc::new(PostgresCredentialRepository::new(pg_pool.clone()));
    let credential_service = Arc::new(CredentialService::new(
        credential_repository,
        authenticator,
    ));
    let readiness = Arc::new(PostgresReadiness::new(pg_pool));

    let http_address = format!("0.0.0.0:{}", config.server.port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(credential_service);
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

    let probe_application = create_probe_router(readiness);
    let probe_server =
        tokio::spawn(async move { axum::serve(probe_listener, probe_application).await });

    run_until_failure(http_server, probe_server).await?;

    Ok(())
}
