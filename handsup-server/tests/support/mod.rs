use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::Router;
use axum_test::TestServer;
use handsup_config::{
    AuthConfig, Config, ConfigMetadata, CorsConfig, DatabaseConfig,
    ReminderSettings, ServerConfig,
};
use handsup_core::store::Store;
use handsup_server::{AppState, routes};
use serde_json::{Value, json};

pub const PASSWORD: &str = "Password#123";

// Code is used by test modules, but not in this scope
#[allow(unused)]
#[derive(Debug)]
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

#[allow(unused)]
impl TestApp {
    pub fn server(&self) -> Result<TestServer> {
        TestServer::builder()
            .build(self.router.clone())
            .map_err(|err| anyhow::anyhow!(err.to_string()))
    }
}

pub fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".into(),
            port: 0,
            static_dir: None,
        },
        database: DatabaseConfig {
            url: None,
            max_connections: 1,
        },
        auth: AuthConfig {
            jwt_secret: "integration-test-secret-0123456789abcdef".into(),
            token_ttl: Duration::from_secs(3600),
        },
        reminders: ReminderSettings {
            enabled: false,
            interval: Duration::from_secs(60),
            lookahead: Duration::from_secs(24 * 60 * 60),
        },
        cors: CorsConfig {
            allowed_origins: vec!["http://localhost:5173".into()],
        },
        dev_mode: true,
        metadata: ConfigMetadata::default(),
    }
}

#[allow(unused)]
pub fn build_test_app() -> TestApp {
    build_test_app_with(test_config())
}

pub fn build_test_app_with(config: Config) -> TestApp {
    let state = AppState::new(Arc::new(config), Store::in_memory());
    let router = routes::create_app(state.clone());
    TestApp { router, state }
}

#[allow(unused)]
pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

/// Register an account and return `(token, volunteer_id)`.
#[allow(unused)]
pub async fn register(
    server: &TestServer,
    email: &str,
    name: &str,
) -> (String, i64) {
    let response = server
        .post("/api/auth/register")
        .json(&json!({
            "email": email,
            "password": PASSWORD,
            "name": name,
            "location": "Houston",
            "skills": ["Cooking", "First Aid"],
        }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    let body: Value = response.json();
    let token = body["data"]["token"]
        .as_str()
        .unwrap_or_else(|| panic!("missing token in {body}"))
        .to_string();
    let volunteer_id = body["data"]["account"]["volunteerId"]
        .as_i64()
        .unwrap_or_else(|| panic!("missing volunteerId in {body}"));
    (token, volunteer_id)
}
