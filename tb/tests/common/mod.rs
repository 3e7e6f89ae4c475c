//! Shared fixtures for taskboard integration tests

#![allow(dead_code)]

use std::net::TcpListener;
use std::sync::Arc;

use serde_json::{Value, json};
use taskboard::config::ApiConfig;
use taskboard::{HttpTaskApi, NotificationBus, TaskStore};
use wiremock::MockServer;

pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Wire form of a task as the service returns it
pub fn task_json(id: u64, title: &str, completed: bool) -> Value {
    json!({
        "id": id,
        "title": title,
        "description": null,
        "completed": completed,
        "created_at": format!("2024-01-01T00:00:{:02}Z", id % 60),
    })
}

pub fn api_config(base_url: &str, timeout_ms: u64) -> ApiConfig {
    ApiConfig {
        base_url: base_url.to_string(),
        timeout_ms,
    }
}

/// Client rooted at `{server}/api`
pub fn api_for(server: &MockServer) -> HttpTaskApi {
    HttpTaskApi::from_config(&api_config(&format!("{}/api", server.uri()), 5_000)).unwrap()
}

pub fn store_for(server: &MockServer) -> (TaskStore, NotificationBus) {
    let bus = NotificationBus::new(64);
    let store = TaskStore::new(Arc::new(api_for(server)), bus.clone());
    (store, bus)
}

/// Base url of a port nothing listens on
pub fn unreachable_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}/api", port)
}
