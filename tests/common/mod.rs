#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{self, Body},
    http::{Method, Request, StatusCode},
    response::Response,
    Router,
};
use factory_ops::{
    config::AppConfig,
    db::{self, DbConfig},
    events::{Event, EventSender},
    AppState,
};
use serde_json::Value;
use tempfile::TempDir;
use tokio::sync::{mpsc, Mutex};
use tower::ServiceExt;

/// Helper harness for spinning up the application against a fresh SQLite file.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    events: Mutex<mpsc::Receiver<Event>>,
    _db_dir: TempDir,
}

impl TestApp {
    /// Construct a new test application with a migrated, empty database.
    pub async fn new() -> Self {
        let db_dir = tempfile::tempdir().expect("temp dir for test database");
        let db_url = format!(
            "sqlite://{}?mode=rwc",
            db_dir.path().join("factory.db").display()
        );

        let db_config = DbConfig {
            url: db_url.clone(),
            ..DbConfig::in_memory()
        };
        let pool = db::establish_connection_with_config(&db_config)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        // Events are kept in the channel so tests can assert on them.
        let (event_tx, event_rx) = mpsc::channel(4096);
        let cfg = AppConfig::new(db_url, "127.0.0.1".to_string(), 18_080, "test".to_string());
        let state = AppState::new(Arc::new(pool), cfg, EventSender::new(event_tx));
        let router = factory_ops::app_router(state.clone());

        Self {
            router,
            state,
            events: Mutex::new(event_rx),
            _db_dir: db_dir,
        }
    }

    /// Send a request against the router.
    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    /// Sends a request and returns its status with the decoded JSON body.
    pub async fn call(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let response = self.request(method, uri, body).await;
        let status = response.status();
        (status, response_json(response).await)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.call(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.call(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.call(Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.call(Method::DELETE, uri, None).await
    }

    /// Creates a record and returns the `data` of the envelope, asserting 201.
    pub async fn create(&self, uri: &str, body: Value) -> Value {
        let (status, json) = self.post(uri, body).await;
        assert_eq!(status, StatusCode::CREATED, "create {uri} failed: {json}");
        json["data"].clone()
    }

    /// `data` of a list endpoint.
    pub async fn list(&self, uri: &str) -> Vec<Value> {
        let (status, json) = self.get(uri).await;
        assert_eq!(status, StatusCode::OK, "list {uri} failed: {json}");
        json["data"].as_array().cloned().expect("list data array")
    }

    /// Every event published since the last call.
    pub async fn drain_events(&self) -> Vec<Event> {
        let mut rx = self.events.lock().await;
        let mut seen = Vec::new();
        while let Ok(event) = rx.try_recv() {
            seen.push(event);
        }
        seen
    }
}

pub async fn response_json(response: Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
}

pub fn id_of(record: &Value) -> &str {
    record["id"].as_str().expect("record id")
}
