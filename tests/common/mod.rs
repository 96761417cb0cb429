//! Shared harness for the integration tests: a fresh SQLite file per app and a
//! client that carries the session cookie between requests.

#![allow(dead_code)]

use anitrack::api::AppState;
use anitrack::config::{Config, SecurityConfig};
use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use tower::ServiceExt;

pub const PASSWORD: &str = "pw123!";

pub struct TestApp {
    pub router: Router,
    pub state: Arc<AppState>,
    db_path: PathBuf,
}

impl Drop for TestApp {
    fn drop(&mut self) {
        std::fs::remove_file(&self.db_path).ok();
    }
}

impl TestApp {
    pub fn client(&self) -> TestClient {
        TestClient {
            app: self.router.clone(),
            cookie: None,
        }
    }

    /// A client that has signed up (and is therefore logged in) as `username`.
    pub async fn signed_up(&self, username: &str) -> TestClient {
        let mut client = self.client();
        let response = client
            .post(
                "/signup",
                serde_json::json!({ "username": username, "pass": PASSWORD, "pass2": PASSWORD }),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "signup failed: {}", response.body);
        client
    }
}

pub fn test_config(db_path: &std::path::Path) -> Config {
    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", db_path.display());
    config.server.secure_cookies = false;
    config.observability.metrics_enabled = false;
    config.security = SecurityConfig {
        argon2_memory_cost_kib: 1024,
        argon2_time_cost: 1,
        argon2_parallelism: 1,
    };
    config
}

pub async fn spawn_app() -> TestApp {
    let db_path =
        std::env::temp_dir().join(format!("anitrack-test-{}.db", uuid::Uuid::new_v4()));

    let state = anitrack::api::create_app_state_from_config(test_config(&db_path), None)
        .await
        .expect("failed to create app state");

    let router = anitrack::api::router(state.clone());
    TestApp {
        router,
        state,
        db_path,
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
    }

    pub fn error(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }
}

pub struct TestClient {
    app: Router,
    cookie: Option<String>,
}

impl TestClient {
    pub fn is_logged_out(&self) -> bool {
        self.cookie.is_none()
    }

    pub async fn get(&mut self, uri: &str) -> TestResponse {
        let request = self.builder("GET", uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    pub async fn post(&mut self, uri: &str, body: Value) -> TestResponse {
        let request = self
            .builder("POST", uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    pub async fn post_raw(&mut self, uri: &str, body: &'static str) -> TestResponse {
        let request = self
            .builder("POST", uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    fn builder(&self, method: &str, uri: &str) -> axum::http::request::Builder {
        let builder = Request::builder().method(method).uri(uri);
        match &self.cookie {
            Some(cookie) => builder.header(header::COOKIE, cookie),
            None => builder,
        }
    }

    async fn send(&mut self, request: Request<Body>) -> TestResponse {
        let response = self.app.clone().oneshot(request).await.unwrap();

        if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
            let pair = set_cookie
                .to_str()
                .unwrap()
                .split(';')
                .next()
                .unwrap_or_default()
                .trim()
                .to_string();
            let has_value = pair.split_once('=').is_some_and(|(_, v)| !v.is_empty());
            self.cookie = has_value.then_some(pair);
        }

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }
}
