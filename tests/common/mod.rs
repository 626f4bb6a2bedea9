#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use gatehouse::router::init_router;
use gatehouse::state::AppState;
use gatehouse_config::{
    Config, CorsConfig, DatabaseConfig, JwtConfig, PasswordConfig, ServerConfig,
};
use gatehouse_core::hash_password;
use gatehouse_db::MemoryUserRepository;
use gatehouse_models::{Principal, Role, UserRecord};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

pub const TEST_SECRET: &str = "test-secret-key-at-least-32-characters-long";
pub const TEST_PASSWORD: &str = "Passw0rd!";
pub const TEST_COST: u32 = 4;

pub fn test_config() -> Config {
    Config {
        server: ServerConfig {
            request_timeout: Duration::from_secs(5),
            ..ServerConfig::default()
        },
        database: DatabaseConfig {
            url: "postgres://localhost/gatehouse_test".to_string(),
            max_connections: 1,
        },
        jwt: JwtConfig {
            secret: TEST_SECRET.to_string(),
            expiration_secs: 3600,
            issuer: "gatehouse".to_string(),
        },
        cors: CorsConfig::default(),
        password: PasswordConfig {
            bcrypt_cost: TEST_COST,
        },
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub repository: Arc<MemoryUserRepository>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    pub fn with_config(config: Config) -> Self {
        let repository = Arc::new(MemoryUserRepository::new());
        let state = AppState::new(repository.clone(), &config);
        Self {
            router: init_router(state.clone()),
            state,
            repository,
        }
    }

    /// Inserts a user directly into the repository.
    pub fn seed(&self, email: &str, role: Role, active: bool) -> UserRecord {
        let now = chrono::Utc::now();
        let record = UserRecord {
            id: uuid_like(email),
            email: email.to_string(),
            password_hash: hash_password(TEST_PASSWORD, TEST_COST).unwrap(),
            role,
            is_active: active,
            created_at: now,
            updated_at: now,
        };
        self.repository.seed(record.clone());
        record
    }

    pub fn token_for(&self, record: &UserRecord) -> String {
        self.state.tokens.issue(&Principal::from(record)).unwrap()
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }
}

/// Deterministic id derived from the email, so tests can name users.
fn uuid_like(email: &str) -> String {
    format!("id-{email}")
}

pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

pub fn empty_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}
