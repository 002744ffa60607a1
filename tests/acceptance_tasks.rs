use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode};
use rstest::rstest;
use serde_json::{Value, json};
use todai::application::task_service::TaskServiceImpl;
use todai::domain::repository::TaskRepository;
use todai::http::routing::{self, tasks};
use todai::infrastructure::sqlite_repo::SqliteTaskRepository;
use todai::infrastructure::unavailable_repo::UnavailableTaskRepository;
use tower::ServiceExt;

async fn app() -> Router {
    // use in-memory sqlite for tests
    let repo = SqliteTaskRepository::connect("sqlite::memory:").await.unwrap();
    repo.init().await.unwrap();
    routing::app(tasks::router(tasks::AppState { service: TaskServiceImpl::new(repo) }))
}

async fn request(app: &Router, method: Method, path: &str, body: Option<Value>) -> (StatusCode, Value) {
    let req = Request::builder().method(method).uri(path);
    let req = match body {
        Some(json) => req.header("content-type", "application/json").body(Body::from(json.to_string())).unwrap(),
        None => req.body(Body::empty()).unwrap(),
    };
    send(app, req).await
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = to_bytes(res.into_body(), 1024 * 1024).await.unwrap();
    let body = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, body)
}

async fn create(app: &Router, body: Value) -> Value {
    let (status, task) = request(app, Method::POST, "/api/tasks", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "{task}");
    task
}

#[tokio::test]
async fn acceptance_create_list_get_update_delete() {
    let app = app().await;

    // create
    let task = create(&app, json!({ "title": "  Test  ", "description": "First" })).await;
    assert_eq!(task["title"], "Test");
    assert_eq!(task["description"], "First");
    assert_eq!(task["status"], "todo");
    assert!(task.get("priority").is_none());
    assert_eq!(task["createdAt"], task["updatedAt"]);
    let id = task["id"].as_str().unwrap().to_string();

    // list
    let (status, list) = request(&app, Method::GET, "/api/tasks", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);

    // get
    let (status, fetched) = request(&app, Method::GET, &format!("/api/tasks/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, task);

    // update
    let (status, updated) =
        request(&app, Method::PUT, &format!("/api/tasks/{id}"), Some(json!({ "status": "done" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "done");
    assert_eq!(updated["title"], "Test");
    assert_eq!(updated["createdAt"], task["createdAt"]);

    // delete
    let (status, deleted) = request(&app, Method::DELETE, &format!("/api/tasks/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted, json!({ "message": "Task deleted successfully", "id": id }));

    // get 404
    let (status, body) = request(&app, Method::GET, &format!("/api/tasks/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "message": "Task not found" }));

    // delete again 404
    let (status, _) = request(&app, Method::DELETE, &format!("/api/tasks/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_is_newest_first_regardless_of_updates() {
    let app = app().await;
    let first = create(&app, json!({ "title": "first" })).await;
    let _second = create(&app, json!({ "title": "second" })).await;
    let _third = create(&app, json!({ "title": "third" })).await;

    let path = format!("/api/tasks/{}", first["id"].as_str().unwrap());
    let (status, _) = request(&app, Method::PUT, &path, Some(json!({ "title": "first, edited" }))).await;
    assert_eq!(status, StatusCode::OK);

    let (_, list) = request(&app, Method::GET, "/api/tasks", None).await;
    let titles: Vec<&str> = list.as_array().unwrap().iter().map(|t| t["title"].as_str().unwrap()).collect();
    assert_eq!(titles, ["third", "second", "first, edited"]);
}

#[tokio::test]
async fn update_keeps_omitted_fields_and_null_clears() {
    let app = app().await;
    let task = create(&app, json!({ "title": "Plan", "priority": 3, "dueDate": 1_769_040_000 })).await;
    assert_eq!(task["priority"], 3);
    assert_eq!(task["dueDate"], 1_769_040_000);
    let path = format!("/api/tasks/{}", task["id"].as_str().unwrap());

    let (status, updated) = request(&app, Method::PUT, &path, Some(json!({ "priority": null }))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(updated.get("priority").is_none());
    assert_eq!(updated["dueDate"], 1_769_040_000);
    assert_eq!(updated["title"], "Plan");

    let (_, updated) = request(&app, Method::PUT, &path, Some(json!({ "dueDate": null }))).await;
    assert!(updated.get("dueDate").is_none());

    let (_, updated) = request(&app, Method::PUT, &path, Some(json!({}))).await;
    assert_eq!(updated["title"], "Plan");
    assert_eq!(updated["status"], "todo");
}

#[rstest]
#[case::missing_title(json!({ "description": "x" }), "title: Title is required")]
#[case::blank_title(json!({ "title": "   " }), "title: Title is required")]
#[case::long_title(json!({ "title": "a".repeat(201) }), "title: Title cannot exceed 200 characters")]
#[case::long_description(json!({ "title": "t", "description": "d".repeat(2001) }), "description: Description cannot exceed 2000 characters")]
#[case::bad_status(json!({ "title": "t", "status": "blocked" }), "status: Status must be one of: todo, in-progress, done")]
#[case::priority_low(json!({ "title": "t", "priority": 0 }), "priority: Priority must be between 1 and 9")]
#[case::priority_high(json!({ "title": "t", "priority": 10 }), "priority: Priority must be between 1 and 9")]
#[case::priority_fraction(json!({ "title": "t", "priority": 2.5 }), "priority: Priority must be an integer")]
#[case::due_not_midnight(json!({ "title": "t", "dueDate": 1_769_040_001 }), "dueDate: Due date must be a date at 00:00:00 UTC")]
#[tokio::test]
async fn invalid_create_is_rejected_and_not_persisted(#[case] body: Value, #[case] expected: &str) {
    let app = app().await;
    let (status, error) = request(&app, Method::POST, "/api/tasks", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = error["message"].as_str().unwrap();
    assert!(message.starts_with("Task validation failed: "), "{message}");
    assert!(message.contains(expected), "{message}");

    let (_, list) = request(&app, Method::GET, "/api/tasks", None).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn invalid_update_is_rejected_before_lookup() {
    let app = app().await;
    let task = create(&app, json!({ "title": "keep" })).await;
    let path = format!("/api/tasks/{}", task["id"].as_str().unwrap());

    let (status, _) = request(&app, Method::PUT, &path, Some(json!({ "title": "", "priority": 12 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (_, unchanged) = request(&app, Method::GET, &path, None).await;
    assert_eq!(unchanged, task);

    let unknown = format!("/api/tasks/{}", uuid_like());
    let (status, _) = request(&app, Method::PUT, &unknown, Some(json!({ "status": "nope" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = request(&app, Method::PUT, &unknown, Some(json!({ "status": "done" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_id_is_not_found() {
    let app = app().await;
    let (status, body) = request(&app, Method::GET, "/api/tasks/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Task not found");
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let app = app().await;
    let req = Request::builder()
        .method(Method::POST)
        .uri("/api/tasks")
        .header("content-type", "application/json")
        .body(Body::from("{\"title\": "))
        .unwrap();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn health_reports_ok() {
    let app = app().await;
    let (status, body) = request(&app, Method::GET, "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    let timestamp = body["timestamp"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok(), "{timestamp}");
}

#[tokio::test]
async fn unavailable_store_yields_generic_server_errors() {
    let app = routing::app(tasks::router(tasks::AppState { service: TaskServiceImpl::new(UnavailableTaskRepository) }));

    let (status, body) = request(&app, Method::GET, "/api/tasks", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "message": "Server error while fetching tasks" }));

    let (status, body) = request(&app, Method::POST, "/api/tasks", Some(json!({ "title": "t" }))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Server error while creating task");

    // Validation still comes first.
    let (status, _) = request(&app, Method::POST, "/api/tasks", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let path = format!("/api/tasks/{}", uuid_like());
    let (_, body) = request(&app, Method::DELETE, &path, None).await;
    assert_eq!(body["message"], "Server error while deleting task");

    let (status, _) = request(&app, Method::GET, "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
}

fn uuid_like() -> String {
    todai::domain::task::TaskId::new().to_string()
}
