//! CLI tests against a mock todo API.

mod common;

use common::{TestEnv, run_cli_with_env};
use serde_json::json;
use todolink_core::{CredentialStore, StorageKey};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn todo_json(id: i64, title: &str, completed: bool) -> serde_json::Value {
    json!({
        "todoId": id,
        "title": title,
        "description": "",
        "completed": completed,
        "createAt": "2024-05-01T10:00:00Z"
    })
}

#[tokio::test(flavor = "multi_thread")]
async fn test_login_persists_tokens() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({
            "email": "alice@example.com",
            "password": "secret123"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accessToken": "A1",
            "refreshToken": "R1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let env = TestEnv::new(&server);
    let stdout = env
        .run_success(&[
            "login",
            "--email",
            "alice@example.com",
            "--password",
            "secret123",
        ])
        .await;

    assert!(stdout.contains("Logged in successfully"));
    let store = env.store();
    assert_eq!(store.get(StorageKey::AccessToken).as_deref(), Some("A1"));
    assert_eq!(store.get(StorageKey::RefreshToken).as_deref(), Some("R1"));

    let status = env.run_success(&["status"]).await;
    assert!(status.contains("logged in"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rejected_login_fails() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let env = TestEnv::new(&server);
    let stderr = env
        .run_failure(&["login", "--email", "a@example.com", "--password", "x"])
        .await;

    assert!(stderr.contains("Login rejected"));
    assert!(env.store().access_token().is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_todos_with_stored_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/todos"))
        .and(header("Authorization", "Bearer A1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            todo_json(1, "milk", false),
            todo_json(2, "bread", true)
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let env = TestEnv::new(&server);
    env.log_in("A1", "R1");

    let stdout = env.run_success(&["todos", "list"]).await;

    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("#1") && lines[0].contains("milk"));
    assert!(lines[1].contains("[x]") && lines[1].contains("bread"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_expired_token_is_refreshed_across_invocation() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/todos/1"))
        .and(header("Authorization", "Bearer A1"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/todos/1"))
        .and(header("Authorization", "Bearer A2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(todo_json(1, "milk", false)))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .and(body_json(json!({ "refreshToken": "R1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accessToken": "A2",
            "refreshToken": "R2"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let env = TestEnv::new(&server);
    env.log_in("A1", "R1");

    let stdout = env.run_success(&["todos", "get", "1", "--json"]).await;
    let todo: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(todo["title"], "milk");

    let store = env.store();
    assert_eq!(store.get(StorageKey::AccessToken).as_deref(), Some("A2"));
    assert_eq!(store.get(StorageKey::RefreshToken).as_deref(), Some("R2"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_failed_refresh_reports_expired_session() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/todos"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let env = TestEnv::new(&server);
    env.log_in("A1", "R1");

    let stderr = env.run_failure(&["todos", "list"]).await;

    assert!(stderr.contains("Session expired"));
    let store = env.store();
    assert!(store.access_token().is_none());
    assert!(store.refresh_token().is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_create_and_update_todo() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/todos"))
        .and(body_json(json!({
            "title": "milk",
            "description": "oat",
            "completed": false
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "created"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/todos/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(todo_json(3, "milk", false)))
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/todos/3"))
        .and(body_json(json!({
            "todoId": 3,
            "title": "milk",
            "description": "",
            "completed": true,
            "createAt": "2024-05-01T10:00:00Z"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "updated"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let env = TestEnv::new(&server);
    env.log_in("A1", "R1");

    let stdout = env
        .run_success(&["todos", "create", "--title", "milk", "--description", "oat"])
        .await;
    assert!(stdout.contains("Todo created"));

    let stdout = env
        .run_success(&["todos", "update", "3", "--completed", "true"])
        .await;
    assert!(stdout.contains("Todo #3 updated"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_todos_require_login() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/todos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let env = TestEnv::new(&server);
    let stderr = env.run_failure(&["todos", "list"]).await;

    assert!(stderr.contains("No active session"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_logout_keeps_preferences() {
    let server = MockServer::start().await;
    let env = TestEnv::new(&server);
    env.log_in("A1", "R1");

    env.run_success(&["settings", "theme", "dark"]).await;
    env.run_success(&["settings", "language", "it"]).await;
    let stdout = env.run_success(&["logout"]).await;
    assert!(stdout.contains("Logged out"));

    let store = env.store();
    assert!(store.access_token().is_none());
    assert!(store.refresh_token().is_none());
    assert_eq!(store.get(StorageKey::AppTheme).as_deref(), Some("2"));
    assert_eq!(store.get(StorageKey::SelectedLanguage).as_deref(), Some("it"));

    let theme = env.run_success(&["settings", "theme"]).await;
    assert!(theme.contains("dark"));
    let status = env.run_success(&["status"]).await;
    assert!(status.contains("logged out"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unknown_language_is_rejected() {
    let server = MockServer::start().await;
    let env = TestEnv::new(&server);

    let stderr = env.run_failure(&["settings", "language", "fr"]).await;

    assert!(stderr.contains("Unsupported language"));
    assert!(env.store().get(StorageKey::SelectedLanguage).is_none());
}

#[test]
fn test_todos_without_api_url_fails() {
    let home = tempfile::tempdir().unwrap();

    let output = run_cli_with_env(&["todos", "list"], home.path());

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("TODOLINK_API"));
}

#[test]
fn test_default_store_lives_in_data_dir() {
    let home = tempfile::tempdir().unwrap();

    let output = run_cli_with_env(&["settings", "language", "it"], home.path());
    assert!(output.status.success());

    let output = run_cli_with_env(&["status"], home.path());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("credentials.json"));
}
