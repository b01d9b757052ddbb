#![allow(dead_code)]

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use api_service::inbound::http::router::create_router;
use api_service::inbound::probe::create_probe_router;
use api_service::inbound::probe::ReadinessCheck;
use api_service::tag::models::Tag;
use api_service::tag::models::TagId;
use api_service::tag::models::TagName;
use api_service::tag::ports::TagRepository;
use api_service::task::errors::TaskError;
use api_service::task::models::NewTask;
use api_service::task::models::Task;
use api_service::task::models::TaskFilter;
use api_service::task::models::TaskId;
use api_service::task::models::UserId;
use api_service::task::ports::TaskRepository;
use api_service::task::service::TaskService;
use async_trait::async_trait;
use auth::Authenticator;
use auth::TokenIssuer;
use auth::TokenSettings;
use chrono::Utc;
use sqlx::postgres::PgConnectOptions;
use sqlx::postgres::PgPoolOptions;
use sqlx::Connection;
use sqlx::Executor;
use sqlx::PgConnection;
use sqlx::PgPool;

pub const SIGNING_KEY: &str = "test-secret-key-for-jwt-signing-at-least-32-bytes";

pub fn token_settings() -> TokenSettings {
    TokenSettings::new(
        SIGNING_KEY,
        "auth-service",
        "task-manager",
        Duration::from_secs(3600),
    )
}

#[derive(Default)]
struct Tables {
    tasks: BTreeMap<i64, Task>,
    tags: BTreeMap<i64, Tag>,
    task_tags: BTreeSet<(i64, i64)>,
}

/// Task and tag store kept in process memory; one instance backs both ports.
#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

fn matches(tables: &Tables, task: &Task, filter: &TaskFilter) -> bool {
    if filter.status.is_some_and(|status| task.status != status) {
        return false;
    }
    if filter.priority.is_some_and(|priority| task.priority != priority) {
        return false;
    }
    if let Some(before) = filter.due_before {
        if !task.due_date.is_some_and(|due| due <= before) {
            return false;
        }
    }
    if let Some(after) = filter.due_after {
        if !task.due_date.is_some_and(|due| due >= after) {
            return false;
        }
    }
    if let Some(name) = &filter.tag_name {
        let tagged = tables.task_tags.iter().any(|(task_id, tag_id)| {
            *task_id == task.id.0 && tables.tags.get(tag_id).is_some_and(|t| &t.name == name)
        });
        if !tagged {
            return false;
        }
    }
    true
}

#[async_trait]
impl TaskRepository for InMemoryStore {
    async fn find_by_owner(
        &self,
        owner: UserId,
        filter: &TaskFilter,
    ) -> Result<Vec<Task>, TaskError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .tasks
            .values()
            .filter(|t| t.user_id == owner && matches(&tables, t, filter))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: TaskId, owner: UserId) -> Result<Option<Task>, TaskError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .tasks
            .get(&id.0)
            .filter(|t| t.user_id == owner)
            .cloned())
    }

    async fn create(&self, task: NewTask) -> Result<Task, TaskError> {
        let mut tables = self.tables.lock().unwrap();
        let id = tables.tasks.keys().next_back().map_or(1, |last| last + 1);
        let now = Utc::now();
        let created = Task {
            id: TaskId(id),
            title: task.title,
            description: task.description,
            status: task.status,
            priority: task.priority,
            due_date: task.due_date,
            user_id: task.user_id,
            created_at: now,
            updated_at: now,
        };
        tables.tasks.insert(id, created.clone());
        Ok(created)
    }

    async fn update(&self, task: Task) -> Result<Task, TaskError> {
        let mut tables = self.tables.lock().unwrap();
        match tables.tasks.get_mut(&task.id.0) {
            Some(stored) if stored.user_id == task.user_id => {
                *stored = Task {
                    updated_at: Utc::now(),
                    ..task
                };
                Ok(stored.clone())
            }
            _ => Err(TaskError::NotFound(task.id.to_string())),
        }
    }

    async fn delete(&self, id: TaskId, owner: UserId) -> Result<bool, TaskError> {
        let mut tables = self.tables.lock().unwrap();
        if !tables.tasks.get(&id.0).is_some_and(|t| t.user_id == owner) {
            return Ok(false);
        }
        tables.tasks.remove(&id.0);
        tables.task_tags.retain(|(task_id, _)| *task_id != id.0);
        Ok(true)
    }

    async fn attach_tag(&self, task_id: TaskId, tag_id: TagId) -> Result<(), TaskError> {
        self.tables
            .lock()
            .unwrap()
            .task_tags
            .insert((task_id.0, tag_id.0));
        Ok(())
    }

    async fn detach_all_tags(&self, task_id: TaskId) -> Result<(), TaskError> {
        self.tables
            .lock()
            .unwrap()
            .task_tags
            .retain(|(id, _)| *id != task_id.0);
        Ok(())
    }
}

#[async_trait]
impl TagRepository for InMemoryStore {
    async fn find_by_task(&self, task_id: TaskId) -> Result<Vec<Tag>, TaskError> {
        let tables = self.tables.lock().unwrap();
        let mut tags: Vec<Tag> = tables
            .task_tags
            .iter()
            .filter(|(id, _)| *id == task_id.0)
            .filter_map(|(_, tag_id)| tables.tags.get(tag_id).cloned())
            .collect();
        tags.sort_by(|a, b| a.name.as_str().cmp(b.name.as_str()));
        Ok(tags)
    }

    async fn find_by_owner(&self, owner: UserId) -> Result<Vec<Tag>, TaskError> {
        let tables = self.tables.lock().unwrap();
        let tag_ids: BTreeSet<i64> = tables
            .task_tags
            .iter()
            .filter(|(task_id, _)| {
                tables
                    .tasks
                    .get(task_id)
                    .is_some_and(|t| t.user_id == owner)
            })
            .map(|(_, tag_id)| *tag_id)
            .collect();
        let mut tags: Vec<Tag> = tag_ids
            .iter()
            .filter_map(|id| tables.tags.get(id).cloned())
            .collect();
        tags.sort_by(|a, b| a.name.as_str().cmp(b.name.as_str()));
        Ok(tags)
    }

    async fn find_or_create(&self, name: &TagName) -> Result<Tag, TaskError> {
        let mut tables = self.tables.lock().unwrap();
        if let Some(existing) = tables.tags.values().find(|t| &t.name == name) {
            return Ok(existing.clone());
        }
        let id = tables.tags.keys().next_back().map_or(1, |last| last + 1);
        let tag = Tag {
            id: TagId(id),
            name: name.clone(),
            created_at: Utc::now(),
        };
        tables.tags.insert(id, tag.clone());
        Ok(tag)
    }
}

struct AlwaysReady;

#[async_trait]
impl ReadinessCheck for AlwaysReady {
    async fn check(&self) -> Result<(), String> {
        Ok(())
    }
}

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub probe_address: String,
    pub api_client: reqwest::Client,
    issuer: TokenIssuer,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        Self::spawn_with_settings(&token_settings()).await
    }

    pub async fn spawn_with_settings(settings: &TokenSettings) -> Self {
        let store = Arc::new(InMemoryStore::default());
        let task_service = Arc::new(TaskService::new(Arc::clone(&store), store));
        let authenticator = Arc::new(Authenticator::new(settings));

        let address = serve(create_router(task_service, authenticator)).await;
        let probe_address = serve(create_probe_router(Arc::new(AlwaysReady))).await;

        Self {
            address,
            probe_address,
            api_client: reqwest::Client::new(),
            issuer: TokenIssuer::new(settings),
        }
    }

    /// Bearer token for the given user, signed like auth-service would.
    pub fn token_for(&self, username: &str, user_id: u64) -> String {
        self.issuer
            .issue(username, user_id)
            .expect("Failed to issue token")
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(self.url(path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make POST request with Bearer token
    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client.post(self.url(path)).bearer_auth(token)
    }

    /// Helper to make PUT request with Bearer token
    pub fn put_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client.put(self.url(path)).bearer_auth(token)
    }

    /// Helper to make DELETE request with Bearer token
    pub fn delete_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client.delete(self.url(path)).bearer_auth(token)
    }

    /// Helper to make GET request against the probe listener
    pub fn probe(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client
            .get(format!("{}{}", self.probe_address, path))
    }
}

pub async fn serve(router: axum::Router) -> String {
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
            "test_api_service_{}",
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
