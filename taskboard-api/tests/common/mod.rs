/// Common test utilities for integration tests
///
/// Builds the full router over an in-memory store, so the tests need neither
/// a database nor a network listener:
/// - Test user creation with ready-made access tokens
/// - Request helpers returning status and parsed JSON

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use taskboard_api::{
    app::{build_router, AppState},
    config::{ApiConfig, Config, DatabaseConfig, JwtConfig},
};
use taskboard_shared::{
    auth::jwt::{create_token, Claims, TokenType},
    models::user::{CreateUser, User},
    store::{EntityStore, MemoryStore},
};
use tower::ServiceExt;

pub const JWT_SECRET: &str = "integration-test-secret-at-least-32-bytes";

/// Router plus direct access to its store
pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub app: Router,
}

/// A seeded user with a valid access token
pub struct TestUser {
    pub user: User,
    pub token: String,
}

impl TestUser {
    pub fn id(&self) -> String {
        self.user.id.to_string()
    }
}

pub fn test_config() -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec!["*".to_string()],
        },
        database: DatabaseConfig {
            url: "postgresql://unused".to_string(),
            max_connections: 1,
        },
        jwt: JwtConfig {
            secret: JWT_SECRET.to_string(),
        },
    }
}

impl TestContext {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(store.clone(), test_config());

        Self {
            store,
            app: build_router(state),
        }
    }

    /// Inserts a user directly, skipping password hashing
    pub async fn user(&self, name: &str) -> TestUser {
        let user = self
            .store
            .create_user(CreateUser {
                email: format!("{}@example.com", name.to_lowercase()),
                password_hash: "not-a-real-hash".to_string(),
                fullname: name.to_string(),
            })
            .await
            .unwrap();
        let token = create_token(&Claims::new(user.id, TokenType::Access), JWT_SECRET).unwrap();

        TestUser { user, token }
    }

    /// Sends a request and returns the status with the JSON body (`Null` if empty)
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        (status, json)
    }

    pub async fn get(&self, uri: &str, as_user: &TestUser) -> (StatusCode, Value) {
        self.send(Method::GET, uri, Some(&as_user.token), None).await
    }

    pub async fn post(&self, uri: &str, as_user: &TestUser, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(&as_user.token), Some(body)).await
    }

    pub async fn patch(&self, uri: &str, as_user: &TestUser, body: Value) -> (StatusCode, Value) {
        self.send(Method::PATCH, uri, Some(&as_user.token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, as_user: &TestUser) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, Some(&as_user.token), None).await
    }

    /// Creates a board through the API and returns its id
    pub async fn board(&self, owner: &TestUser, members: &[&TestUser]) -> String {
        let members: Vec<String> = members.iter().map(|m| m.id()).collect();
        let (status, body) = self
            .post(
                "/api/boards",
                owner,
                serde_json::json!({ "title": "Sprint", "members": members }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "board create failed: {}", body);
        body["id"].as_str().unwrap().to_string()
    }

    /// Creates a task through the API and returns its id
    pub async fn task(&self, board_id: &str, as_user: &TestUser, assignee: &TestUser) -> String {
        let (status, body) = self
            .post(
                "/api/tasks",
                as_user,
                serde_json::json!({
                    "board": board_id,
                    "title": "Ship it",
                    "status": "to-do",
                    "priority": "medium",
                    "assignee_id": assignee.id(),
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "task create failed: {}", body);
        body["id"].as_str().unwrap().to_string()
    }
}

/// Field names listed in a validation error body
pub fn error_fields(body: &Value) -> Vec<String> {
    body["details"]
        .as_array()
        .map(|details| {
            details
                .iter()
                .filter_map(|d| d["field"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
