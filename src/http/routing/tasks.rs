use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Json, Router, routing::get};

use crate::application::task_service::TaskService;
use crate::domain::request::{CreateTaskRequest, DeleteResponse, UpdateTaskRequest};
use crate::domain::task::Task;
use crate::http::types::ApiError;

#[derive(Clone)]
pub struct AppState<S: TaskService> { pub service: S }

pub fn router<S: TaskService + Clone + Send + Sync + 'static>(state: AppState<S>) -> Router {
    Router::new()
        .route("/tasks", get(list_tasks::<S>).post(create_task::<S>))
        .route("/tasks/:id", get(get_task::<S>).put(update_task::<S>).delete(delete_task::<S>))
        .with_state(state)
}

async fn list_tasks<S: TaskService>(State(state): State<AppState<S>>) -> Result<Json<Vec<Task>>, ApiError> {
    let tasks = state.service.list().await.map_err(|e| ApiError::from_task_error(e, "Server error while fetching tasks"))?;
    Ok(Json(tasks))
}

async fn get_task<S: TaskService>(State(state): State<AppState<S>>, Path(id): Path<String>) -> Result<Json<Task>, ApiError> {
    let task = state.service.get(&id).await.map_err(|e| ApiError::from_task_error(e, "Server error while fetching task"))?;
    Ok(Json(task))
}

async fn create_task<S: TaskService>(
    State(state): State<AppState<S>>,
    payload: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let Json(payload) = payload.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
    let task = state.service.create(payload).await.map_err(|e| ApiError::from_task_error(e, "Server error while creating task"))?;
    Ok((StatusCode::CREATED, Json(task)))
}

async fn update_task<S: TaskService>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateTaskRequest>, JsonRejection>,
) -> Result<Json<Task>, ApiError> {
    let Json(payload) = payload.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
    let task = state.service.update(&id, payload).await.map_err(|e| ApiError::from_task_error(e, "Server error while updating task"))?;
    Ok(Json(task))
}

async fn delete_task<S: TaskService>(State(state): State<AppState<S>>, Path(id): Path<String>) -> Result<Json<DeleteResponse>, ApiError> {
    let id = state.service.delete(&id).await.map_err(|e| ApiError::from_task_error(e, "Server error while deleting task"))?;
    Ok(Json(DeleteResponse { message: "Task deleted successfully".into(), id }))
}
