// End-to-end tests for the taskd REST API.
// Spins up a real server on a free port and drives it with an HTTP client.

use serde_json::{json, Value};
use std::sync::Arc;
use taskd::{config::ServerConfig, rest, storage::Storage, AppContext};

fn get_free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

/// Start a server on a random port and return its base URL.
async fn start_test_server() -> String {
    let data_dir = tempfile::tempdir().unwrap().keep();
    let port = get_free_port();

    let config = Arc::new(ServerConfig::new(
        Some(port),
        Some(data_dir.clone()),
        Some("warn".to_string()),
        None,
    ));
    let storage = Arc::new(Storage::new(&data_dir).await.unwrap());
    let ctx = Arc::new(AppContext {
        config,
        storage,
        started_at: std::time::Instant::now(),
    });

    tokio::spawn(async move {
        rest::start_rest_server(ctx).await.ok();
    });

    // Give the server a moment to bind
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    format!("http://127.0.0.1:{}", port)
}

async fn create_task(client: &reqwest::Client, base: &str, body: Value) -> Value {
    let resp = client
        .post(format!("{base}/tasks"))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_success());
    resp.json().await.unwrap()
}

#[tokio::test]
async fn post_creates_task_with_completed_false() {
    let base = start_test_server().await;
    let client = reqwest::Client::new();

    let task = create_task(&client, &base, json!({"title": "A", "priority": "high"})).await;

    assert!(task["id"].as_i64().unwrap() > 0);
    assert_eq!(task["title"], "A");
    assert_eq!(task["priority"], "high");
    assert_eq!(task["completed"], false);
    assert!(task["description"].is_null());
}

#[tokio::test]
async fn post_without_title_returns_500_with_generic_error() {
    let base = start_test_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/tasks"))
        .json(&json!({"priority": "high"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 500);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Failed to create task");
}

#[tokio::test]
async fn get_lists_tasks_ordered_by_priority_text_descending() {
    let base = start_test_server().await;
    let client = reqwest::Client::new();

    for priority in ["high", "medium", "low"] {
        create_task(&client, &base, json!({"title": priority, "priority": priority})).await;
    }

    let resp = client.get(format!("{base}/tasks")).send().await.unwrap();
    assert!(resp.status().is_success());
    let tasks: Vec<Value> = resp.json().await.unwrap();
    let priorities: Vec<&str> = tasks.iter().map(|t| t["priority"].as_str().unwrap()).collect();
    // Lexicographic on the text value, not a severity ranking.
    assert_eq!(priorities, vec!["medium", "low", "high"]);
}

#[tokio::test]
async fn put_replaces_completion_status() {
    let base = start_test_server().await;
    let client = reqwest::Client::new();

    let task = create_task(&client, &base, json!({"title": "A", "priority": "high"})).await;
    let id = task["id"].as_i64().unwrap();

    let resp = client
        .put(format!("{base}/tasks/{id}"))
        .json(&json!({"completed": true}))
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_success());
    let updated: Value = resp.json().await.unwrap();
    assert_eq!(updated["completed"], true);
    assert_eq!(updated["title"], "A");
}

#[tokio::test]
async fn put_status_on_unknown_id_returns_null_body() {
    let base = start_test_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .put(format!("{base}/tasks/999"))
        .json(&json!({"completed": true}))
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_success());
    let body: Value = resp.json().await.unwrap();
    assert!(body.is_null());
}

#[tokio::test]
async fn partial_update_changes_only_supplied_fields() {
    let base = start_test_server().await;
    let client = reqwest::Client::new();

    let task = create_task(
        &client,
        &base,
        json!({"title": "A", "description": "details", "priority": "high"}),
    )
    .await;
    let id = task["id"].as_i64().unwrap();

    let resp = client
        .put(format!("{base}/tasks/update/{id}"))
        .json(&json!({"priority": "low"}))
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_success());
    let updated: Value = resp.json().await.unwrap();
    assert_eq!(updated["priority"], "low");
    assert_eq!(updated["title"], "A");
    assert_eq!(updated["description"], "details");
}

#[tokio::test]
async fn partial_update_unknown_id_returns_404() {
    let base = start_test_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .put(format!("{base}/tasks/update/999"))
        .json(&json!({"title": "X"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Task not found");
}

#[tokio::test]
async fn partial_update_with_empty_body_returns_400() {
    let base = start_test_server().await;
    let client = reqwest::Client::new();

    let task = create_task(&client, &base, json!({"title": "A", "priority": "high"})).await;
    let id = task["id"].as_i64().unwrap();

    let resp = client
        .put(format!("{base}/tasks/update/{id}"))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "No data provided to update");
}

#[tokio::test]
async fn partial_update_with_only_empty_strings_returns_400() {
    let base = start_test_server().await;
    let client = reqwest::Client::new();

    let task = create_task(&client, &base, json!({"title": "A", "priority": "high"})).await;
    let id = task["id"].as_i64().unwrap();

    // Empty strings are treated as absent, same as omitting the fields.
    let resp = client
        .put(format!("{base}/tasks/update/{id}"))
        .json(&json!({"title": "", "description": "", "priority": ""}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn delete_reports_success_regardless_of_existence() {
    let base = start_test_server().await;
    let client = reqwest::Client::new();

    let task = create_task(&client, &base, json!({"title": "A", "priority": "high"})).await;
    let id = task["id"].as_i64().unwrap();

    for _ in 0..2 {
        let resp = client
            .delete(format!("{base}/tasks/{id}"))
            .send()
            .await
            .unwrap();
        assert!(resp.status().is_success());
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["message"], "Task deleted successfully");
    }

    let tasks: Vec<Value> = client
        .get(format!("{base}/tasks"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(tasks.is_empty());
}

#[tokio::test]
async fn health_reports_ok() {
    let base = start_test_server().await;
    let client = reqwest::Client::new();

    let resp = client.get(format!("{base}/health")).send().await.unwrap();
    assert!(resp.status().is_success());
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}
