//! End-to-end store behaviour against a mock task service

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{api_config, setup_mock_server, store_for, task_json, unreachable_base_url};
use serde_json::json;
use taskboard::notify::{Level, Notification};
use taskboard::{Filter, HttpTaskApi, NewTask, NotificationBus, StoreError, TaskId, TaskStore};
use tokio::sync::broadcast;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

fn drain(rx: &mut broadcast::Receiver<Notification>) -> Vec<Notification> {
    let mut out = Vec::new();
    while let Ok(n) = rx.try_recv() {
        out.push(n);
    }
    out
}

fn titles(store: &TaskStore) -> Vec<String> {
    store.snapshot().visible().iter().map(|t| t.title.clone()).collect()
}

#[tokio::test]
async fn test_load_create_toggle_delete() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/api/tasks/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([task_json(1, "Walk dog", false), task_json(2, "Pay rent", true)])),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/tasks/"))
        .respond_with(ResponseTemplate::new(201).set_body_json(task_json(3, "Buy milk", false)))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/tasks/3/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(task_json(3, "Buy milk", true)))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/tasks/1/"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let (store, bus) = store_for(&server);
    let mut rx = bus.subscribe();

    store.fetch_all().await.unwrap();
    assert_eq!(titles(&store), vec!["Walk dog", "Pay rent"]);
    assert!(!store.snapshot().loading);

    store.create(NewTask::new("Buy milk", None)).await.unwrap();
    assert_eq!(titles(&store), vec!["Buy milk", "Walk dog", "Pay rent"]);

    store.toggle_complete(&TaskId::Number(3), false).await.unwrap();
    store.set_filter(Filter::Completed);
    assert_eq!(titles(&store), vec!["Buy milk", "Pay rent"]);

    store.delete(&TaskId::Number(1)).await.unwrap();
    store.set_filter(Filter::All);
    assert_eq!(titles(&store), vec!["Buy milk", "Pay rent"]);

    let messages: Vec<_> = drain(&mut rx).into_iter().map(|n| n.message).collect();
    assert_eq!(
        messages,
        vec!["Task created successfully!", "Task completed!", "Task deleted successfully"]
    );
}

#[tokio::test]
async fn test_fetch_server_error_sets_error_and_notifies_once() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/api/tasks/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let (store, bus) = store_for(&server);
    let mut rx = bus.subscribe();

    let err = store.fetch_all().await.unwrap_err();
    assert!(matches!(err, StoreError::Api(_)));

    let state = store.snapshot();
    assert!(!state.loading);
    assert!(state.tasks.is_empty());
    assert!(state.error.is_some());
    assert_eq!(
        drain(&mut rx),
        vec![Notification::error("Server error. Please try again later.")]
    );
}

#[tokio::test]
async fn test_validation_failure_notifies_each_field() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .and(path("/api/tasks/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "title": ["Ensure this field has no more than 200 characters."],
        })))
        .mount(&server)
        .await;

    let (store, bus) = store_for(&server);
    let mut rx = bus.subscribe();

    assert!(store.create(NewTask::new("x", None)).await.is_err());
    assert!(store.snapshot().tasks.is_empty());
    assert_eq!(
        drain(&mut rx),
        vec![Notification::error(
            "title: Ensure this field has no more than 200 characters."
        )]
    );
}

#[tokio::test]
async fn test_unreachable_service_reports_connection_message() {
    let bus = NotificationBus::new(16);
    let mut rx = bus.subscribe();
    let api = HttpTaskApi::from_config(&api_config(&unreachable_base_url(), 2_000)).unwrap();
    let store = TaskStore::new(Arc::new(api), bus);

    assert!(store.delete(&TaskId::Number(1)).await.is_err());
    let notifications = drain(&mut rx);
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].level, Level::Error);
    assert_eq!(
        notifications[0].message,
        "Unable to connect to server. Please check your connection."
    );
}

#[tokio::test]
async fn test_close_cancels_in_flight_request() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/api/tasks/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([task_json(1, "Late", false)]))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let (store, bus) = store_for(&server);
    let mut rx = bus.subscribe();
    let view = store.scoped();

    let pending = tokio::spawn({
        let view = view.clone();
        async move { view.fetch_all().await }
    });
    tokio::time::sleep(Duration::from_millis(50)).await;
    view.close();

    assert_eq!(pending.await.unwrap(), Err(StoreError::Cancelled));
    assert!(store.snapshot().tasks.is_empty());
    assert!(drain(&mut rx).is_empty());

    // the parent handle is unaffected
    assert!(!store.is_closed());
    assert_eq!(view.fetch_all().await, Err(StoreError::Cancelled));
}
