use std::sync::Arc;

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use courier::actions::{ActionRegistry, Workspace};
use courier::config::Settings;
use courier::dispatch::Dispatcher;
use courier::extractor::scripted::ScriptedExtractor;
use courier::reader::FileReader;
use courier::server::{AppState, router};

fn app(data_root: &std::path::Path, reader: FileReader) -> axum::Router {
    let settings = Settings::with_data_root(data_root);
    let registry = ActionRegistry::standard(&settings, Arc::new(ScriptedExtractor::new()));
    let dispatcher = Dispatcher::new(registry, Workspace::new(data_root));
    router(AppState::new(dispatcher, reader))
}

async fn send(app: axum::Router, method: &str, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let body = serde_json::from_slice(&bytes).expect("json body");
    (status, body)
}

#[tokio::test]
async fn run_recognized_task_returns_message() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("dates.txt"), "2024-01-03\n").unwrap();

    let (status, body) = send(
        app(dir.path(), FileReader::unconfined()),
        "POST",
        "/run?task=please%20count%20Wednesdays%20in%20file",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Counted Wednesdays successfully."}));
}

#[tokio::test]
async fn run_unrecognized_task_is_400() {
    let dir = tempfile::tempdir().unwrap();
    let (status, body) = send(
        app(dir.path(), FileReader::unconfined()),
        "POST",
        "/run?task=do+nothing+special",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Task not recognized."}));
}

#[tokio::test]
async fn run_without_task_is_400() {
    let dir = tempfile::tempdir().unwrap();
    let (status, _) = send(app(dir.path(), FileReader::unconfined()), "POST", "/run").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn run_failing_action_is_500_with_message() {
    let dir = tempfile::tempdir().unwrap();
    let (status, body) = send(
        app(dir.path(), FileReader::unconfined()),
        "POST",
        "/run?task=sort%20contacts",
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let error = body["error"].as_str().unwrap();
    assert!(error.contains("contacts.json"), "error was: {error}");
}

#[tokio::test]
async fn run_recent_logs_without_log_dir_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    let (status, body) = send(
        app(dir.path(), FileReader::unconfined()),
        "POST",
        "/run?task=recent%20logs",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Recent logs written successfully."}));
    assert_eq!(
        std::fs::read_to_string(dir.path().join("logs-recent.txt")).unwrap(),
        ""
    );
}

#[tokio::test]
async fn read_existing_file_returns_exact_contents() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("note.txt");
    std::fs::write(&file, "exact\ncontents\n").unwrap();

    let uri = format!("/read?path={}", file.display());
    let (status, body) = send(app(dir.path(), FileReader::unconfined()), "GET", &uri).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"content": "exact\ncontents\n"}));
}

#[tokio::test]
async fn read_missing_file_is_404() {
    let dir = tempfile::tempdir().unwrap();
    let uri = format!("/read?path={}/missing.txt", dir.path().display());
    let (status, body) = send(app(dir.path(), FileReader::unconfined()), "GET", &uri).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "File not found."}));
}

#[tokio::test]
async fn read_without_path_is_400() {
    let dir = tempfile::tempdir().unwrap();
    let (status, body) = send(app(dir.path(), FileReader::unconfined()), "GET", "/read").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"error": "Missing required query parameter: path"})
    );
}

#[tokio::test]
async fn confined_read_hides_outside_files() {
    let outer = tempfile::tempdir().unwrap();
    let root = outer.path().join("data");
    std::fs::create_dir(&root).unwrap();
    let secret = outer.path().join("secret.txt");
    std::fs::write(&secret, "hidden").unwrap();

    let uri = format!("/read?path={}", secret.display());
    let (status, _) = send(app(&root, FileReader::confined(&root)), "GET", &uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_reports_version() {
    let dir = tempfile::tempdir().unwrap();
    let (status, body) = send(app(dir.path(), FileReader::unconfined()), "GET", "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn unknown_route_is_404_json() {
    let dir = tempfile::tempdir().unwrap();
    let (status, body) = send(app(dir.path(), FileReader::unconfined()), "GET", "/nope").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "not found: /nope"}));
}
