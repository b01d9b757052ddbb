mod common;

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use auth::Authenticator;
use auth::HashingParams;
use auth::PasswordHasher;
use auth_service::credential::errors::CredentialError;
use auth_service::credential::models::NewUser;
use auth_service::credential::models::User;
use auth_service::credential::models::UserId;
use auth_service::credential::models::Username;
use auth_service::credential::ports::CredentialRepository;
use auth_service::credential::service::CredentialService;
use auth_service::inbound::http::router::create_router;
use chrono::Utc;
use common::TestApp;
use reqwest::StatusCode;
use serde_json::json;
use serde_json::Value;

#[derive(Default)]
struct Users {
    by_name: Mutex<HashMap<String, User>>,
}

#[async_trait]
impl CredentialRepository for Users {
    async fn create(&self, user: NewUser) -> Result<User, CredentialError> {
        let mut users = self.by_name.lock().unwrap();
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
        Ok(self.by_name.lock().unwrap().get(username.as_str()).cloned())
    }

    async fn username_exists(&self, username: &Username) -> Result<bool, CredentialError> {
        Ok(self.by_name.lock().unwrap().contains_key(username.as_str()))
    }
}

async fn spawn_auth_service() -> String {
    let authenticator = Arc::new(Authenticator::with_password_hasher(
        &common::token_settings(),
        PasswordHasher::with_params(HashingParams {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
            output_len: 32,
        }),
    ));
    let service = Arc::new(CredentialService::new(
        Arc::new(Users::default()),
        authenticator,
    ));
    common::serve(create_router(service)).await
}

#[tokio::test]
async fn test_register_login_and_manage_tasks() {
    let auth_address = spawn_auth_service().await;
    let api = TestApp::spawn_with_settings(&common::token_settings()).await;
    let client = reqwest::Client::new();

    let credentials = json!({ "username": "alice", "password": "secret123" });

    let response = client
        .post(format!("{}/auth/register", auth_address))
        .json(&credentials)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = client
        .post(format!("{}/auth/login", auth_address))
        .json(&json!({ "username": "alice", "password": "wrong" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = client
        .post(format!("{}/auth/login", auth_address))
        .json(&credentials)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    let token = body["token"].as_str().unwrap().to_string();

    let response = api.get("/api/tasks").send().await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = api
        .get_authenticated("/api/tasks", &token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let listed: Value = response.json().await.unwrap();
    assert_eq!(listed, json!([]));

    let response = api
        .post_authenticated("/api/tasks", &token)
        .json(&json!({
            "title": "Buy milk",
            "priority": "LOW",
            "tags": [{ "name": "errands" }]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created: Value = response.json().await.unwrap();
    // First registered user gets id 1, carried through the token.
    assert_eq!(created["task"]["user_id"], 1);

    let response = api
        .get_authenticated(&format!("/api/tasks/{}", created["task"]["id"]), &token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let fetched: Value = response.json().await.unwrap();
    assert_eq!(fetched, created);
    assert_eq!(fetched["tags"][0]["name"], "errands");
}
