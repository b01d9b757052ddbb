#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use auth::Authenticator;
use auth::HashingParams;
use auth::PasswordHasher;
use auth::TokenSettings;
use auth::TokenVerifier;
use auth_service::credential::errors::CredentialError;
use auth_service::credential::models::NewUser;
use auth_service::credential::models::User;
use auth_service::credential::models::UserId;
use auth_service::credential::models::Username;
use auth_service::credential::ports::CredentialRepository;
use auth_service::credential::service::CredentialService;
use auth_service::inbound::http::router::create_router;
use auth_service::inbound::probe::create_probe_router;
use auth_service::inbound::probe::ReadinessCheck;
use chrono::Utc;
use sqlx::postgres::PgConnectOptions;
use sqlx::postgres::PgPoolOptions;
use sqlx::Connection;
use sqlx::Executor;
use sqlx::PgConnection;
use sqlx::PgPool;

pub const SIGNING_KEY: &str = "test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Credential store kept in process memory.
#[derive(Default)]
pub struct InMemoryCredentialRepository {
    users: Mutex<HashMap<String, User>>,
}

#[async_trait]
impl CredentialRepository for InMemoryCredentialRepository {
    async fn create(&self, user: NewUser) -> Result<User, CredentialError> {
        let mut users = self.users.lock().unwrap();
        if users.contains_key(user.username.as_str()) {
            return Err(CredentialError::UsernameAlreadyExists(
                user.username.to_string(),
            ));
        }

        let created = User {
            id: UserId(users.len() as i64 + 1),
            username: user.username,
            password_hash: user.password_hash,
            created_at: Utc::now(),
        };
        users.insert(created.username.to_string(), created.clone());
        Ok(created)
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, CredentialError> {
        Ok(self.users.lock().unwrap().get(username.as_str()).cloned())
    }

    async fn username_exists(&self, username: &Username) -> Result<bool, CredentialError> {
        Ok(self.users.lock().unwrap().contains_key(username.as_str()))
    }
}

struct AlwaysReady;

#[async_trait]
impl ReadinessCheck for AlwaysReady {
    async fn check(&self) -> Result<(), String> {
        Ok(())
    }
}

pub fn token_settings() -> TokenSettings {
    TokenSettings::new(
        SIGNING_KEY,
        "auth-service",
        "task-manager",
        Duration::from_secs(3600),
    )
}

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub probe_address: String,
    pub api_client: reqwest::Client,
    pub verifier: TokenVerifier,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        let authenticator = Arc::new(Authenticator::with_password_hasher(
            &token_settings(),
            PasswordHasher::with_params(HashingParams {
                memory_kib: 1024,
                iterations: 1,
                parallelism: 1,
                output_len: 32,
            }),
        ));
        let credential_service = Arc::new(CredentialService::new(
            Arc::new(InMemoryCredentialRepository::default()),
            authenticator,
        ));

        let address = serve(create_router(credential_service)).await;
        let probe_address = serve(create_probe_router(Arc::new(AlwaysReady))).await;

        Self {
            address,
            probe_address,
            api_client: reqwest::Client::new(),
            verifier: TokenVerifier::new(&token_settings()),
        }
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request against the probe listener
    pub fn probe(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.probe_address, path))
    }
}

async fn serve(router: axum::Router) -> String {
    // Use random port (0 = OS assigns)
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("Server error");
    });

    format!("http://127.0.0.1:{}", port)
}

/// Throwaway database with migrations applied, dropped again on `Drop`.
pub struct TestDb {
    pub pool: PgPool,
    server_url: String,
    db_name: String,
}

impl TestDb {
    /// Create a fresh database on the server named by `DATABASE_URL`.
    ///
    /// Returns `None` when `DATABASE_URL` is unset so the database-backed
    /// tests pass as skipped on machines without PostgreSQL.
    pub async fn new() -> Option<Self> {
        let Ok(server_url) = std::env::var("DATABASE_URL") else {
            eprintln!("DATABASE_URL not set, skipping database-backed test");
            return None;
        };
        Some(Self::create(server_url).await)
    }

    async fn create(server_url: String) -> Self {
        let db_name = format!(
            "test_auth_service_{}",
            uuid::Uuid::new_v4().to_string().replace('-', "_")
        );

        let mut conn = PgConnection::connect(&server_url)
            .await
            .expect("Failed to connect to postgres");
        conn.execute(format!(r#"CREATE DATABASE "{}";"#, db_name).as_str())
            .await
            .expect("Failed to create test database");

        let options = server_url
            .parse::<PgConnectOptions>()
            .expect("Invalid DATABASE_URL")
            .database(&db_name);
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .expect("Failed to connect to test database");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations");

        Self {
            pool,
            server_url,
            db_name,
        }
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        let server_url = self.server_url.clone();
        let db_name = self.db_name.clone();

        // Drop cannot await; use a private runtime on its own thread.
        let _ = std::thread::spawn(move || {
            let Ok(runtime) = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            else {
                return;
            };
            runtime.block_on(async move {
                let Ok(mut conn) = PgConnection::connect(&server_url).await else {
                    return;
                };
                let _ = conn
                    .execute(
                        format!(
                            r#"SELECT pg_terminate_backend(pid) FROM pg_stat_activity WHERE datname = '{}';"#,
                            db_name
                        )
                        .as_str(),
                    )
                    .await;
                let _ = conn
                    .execute(format!(r#"DROP DATABASE IF EXISTS "{}";"#, db_name).as_str())
                    .await;
            });
        })
        .join();
    }
}
