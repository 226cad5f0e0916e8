//! The HTTP gateway against a live (in-process) task service.

mod common;

use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;

use common::{StubServer, dead_server_url};
use todoey::api::{self, ApiError, Gateway, HttpTaskApi, Outcome, Request, TaskApi};
use todoey::model::config::ServerConfig;
use todoey::model::task::NewTask;

fn api_for(base_url: &str) -> HttpTaskApi {
    HttpTaskApi::new(&ServerConfig {
        base_url: base_url.to_string(),
        timeout_secs: 5,
    })
}

fn new_task(text: &str, category: &str) -> NewTask {
    NewTask {
        task: text.into(),
        category: category.into(),
        due_date_time: String::new(),
        is_important: false,
        items: None,
    }
}

#[test]
fn list_decodes_records_with_defaults() {
    let server = StubServer::with_tasks(vec![
        json!({"id": "a", "task": "Buy milk", "completed": false, "category": "groceries",
               "dueDateTime": "2025-06-03T10:00", "isImportant": true}),
        // Older records may lack optional fields
        json!({"id": "b", "task": "Reading", "category": "Reading", "items": ["Dune"]}),
    ]);
    let tasks = api_for(&server.base_url).list().unwrap();

    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].due_date_time, "2025-06-03T10:00");
    assert!(tasks[0].is_important);
    assert!(!tasks[1].completed);
    assert_eq!(tasks[1].items, vec!["Dune".to_string()]);
}

#[test]
fn create_posts_camel_case_body() {
    let server = StubServer::start();
    let created = api_for(&server.base_url)
        .create(&new_task("Buy milk", "groceries"))
        .unwrap();

    assert_eq!(created.id, "t1");
    assert_eq!(created.task, "Buy milk");
    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].path, "/tasks");
    assert_eq!(
        requests[0].body,
        Some(json!({
            "task": "Buy milk",
            "category": "groceries",
            "dueDateTime": "",
            "isImportant": false
        }))
    );
}

#[test]
fn list_creation_sends_empty_items() {
    let server = StubServer::start();
    let mut payload = new_task("Reading", "Reading");
    payload.items = Some(Vec::new());
    api_for(&server.base_url).create(&payload).unwrap();
    assert_eq!(server.requests()[0].body.as_ref().unwrap()["items"], json!([]));
}

#[test]
fn update_sends_full_record() {
    let server = StubServer::with_tasks(vec![json!({"id": "a", "task": "Buy milk", "category": "groceries"})]);
    let api = api_for(&server.base_url);
    let mut task = api.list().unwrap().remove(0);
    task.completed = true;
    api.update(&task).unwrap();

    let put = &server.writes()[0];
    assert_eq!(put.method, "PUT");
    assert_eq!(put.path, "/tasks/a");
    let body = put.body.as_ref().unwrap();
    assert_eq!(body["completed"], json!(true));
    assert_eq!(body["task"], json!("Buy milk"));
    assert_eq!(body["isImportant"], json!(false));
    assert_eq!(server.tasks()[0]["completed"], json!(true));
}

#[test]
fn delete_and_missing_record() {
    let server = StubServer::with_tasks(vec![json!({"id": "a", "task": "x"})]);
    let api = api_for(&server.base_url);
    api.delete("a").unwrap();
    assert!(server.tasks().is_empty());

    let err = api.delete("a").unwrap_err();
    assert_eq!(
        err,
        ApiError::Status {
            status: 404,
            message: Some("Task not found".into())
        }
    );
    assert_eq!(err.server_message(), Some("Task not found"));
}

#[test]
fn empty_text_rejected_by_server_with_message() {
    let server = StubServer::start();
    let err = api_for(&server.base_url)
        .create(&new_task("", "general"))
        .unwrap_err();
    assert_eq!(err.server_message(), Some("Task is required"));
}

#[test]
fn error_without_message_uses_fallback() {
    let server = StubServer::with_tasks(vec![json!({"id": "a", "task": "x"})]);
    server.fail_with(500, "oops");
    let outcome = api::execute(&api_for(&server.base_url), Request::Delete { id: "a".into() });

    let err = outcome.error().cloned().unwrap();
    assert_eq!(
        err,
        ApiError::Status {
            status: 500,
            message: None
        }
    );
    assert_eq!(outcome.fallback_message(), "Failed to delete task");
}

#[test]
fn unreachable_server_is_a_transport_error() {
    let err = api_for(&dead_server_url()).list().unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}

#[test]
fn relative_base_path_resolves_against_local_origin() {
    let api = api_for("/api");
    assert_eq!(api.base_url(), "http://localhost:5000/api");
}

#[test]
fn gateway_runs_requests_off_thread() {
    let server = StubServer::with_tasks(vec![json!({"id": "a", "task": "Buy milk", "category": "groceries"})]);
    let mut gateway = Gateway::spawn(api_for(&server.base_url)).unwrap();

    assert!(gateway.submit(Request::Load));
    match gateway.wait(Duration::from_secs(5)) {
        Some(Outcome::Loaded(Ok(tasks))) => assert_eq!(tasks[0].id, "a"),
        other => panic!("unexpected outcome {:?}", other),
    }
    assert_eq!(gateway.in_flight(), 0);
}
