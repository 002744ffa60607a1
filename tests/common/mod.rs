#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::json;
use todai::client::error::ClientError;
use todai::client::transport::TaskTransport;
use todai::domain::request::{CreateTaskRequest, DeleteResponse, UpdateTaskRequest};
use todai::domain::task::{self, NewTask, Task, TaskId, TaskStatus};
use todai::domain::validation;
use tokio::sync::Notify;

/// In-process stand-in for the REST API with switchable failures.
#[derive(Default)]
pub struct FakeTransport {
    // Newest first, like the server's list.
    tasks: Mutex<Vec<Task>>,
    list_calls: AtomicUsize,
    update_calls: AtomicUsize,
    fail_updates: AtomicBool,
    offline: AtomicBool,
    update_gate: Mutex<Option<Arc<Notify>>>,
}

fn status_error(status: StatusCode, message: &str) -> ClientError {
    ClientError::Status { status, body: json!({ "message": message }).to_string() }
}

impl FakeTransport {
    pub fn seed(&self, title: &str, status: TaskStatus) -> Task {
        let task = Task::new(
            TaskId::new(),
            NewTask { title: title.into(), description: String::new(), status, priority: None, due_date: None },
            task::now(),
        );
        self.tasks.lock().unwrap().insert(0, task.clone());
        task
    }

    pub fn stored(&self, id: &TaskId) -> Option<Task> {
        self.tasks.lock().unwrap().iter().find(|t| t.id == *id).cloned()
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    pub fn fail_updates(&self, fail: bool) {
        self.fail_updates.store(fail, Ordering::SeqCst);
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Makes every update wait until the returned handle is notified.
    pub fn hold_updates(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.update_gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }

    fn check_online(&self) -> Result<(), ClientError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(ClientError::Network("connection refused".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl TaskTransport for FakeTransport {
    async fn list(&self) -> Result<Vec<Task>, ClientError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.check_online()?;
        Ok(self.tasks.lock().unwrap().clone())
    }

    async fn get(&self, id: &TaskId) -> Result<Task, ClientError> {
        self.check_online()?;
        self.stored(id).ok_or_else(|| status_error(StatusCode::NOT_FOUND, "Task not found"))
    }

    async fn create(&self, request: &CreateTaskRequest) -> Result<Task, ClientError> {
        self.check_online()?;
        let input = validation::validate_create(request)
            .map_err(|e| status_error(StatusCode::BAD_REQUEST, &e.to_string()))?;
        let task = Task::new(TaskId::new(), input, task::now());
        self.tasks.lock().unwrap().insert(0, task.clone());
        Ok(task)
    }

    async fn update(&self, id: &TaskId, request: &UpdateTaskRequest) -> Result<Task, ClientError> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.update_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.check_online()?;
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(status_error(StatusCode::INTERNAL_SERVER_ERROR, "Server error while updating task"));
        }
        let changes = validation::validate_update(request)
            .map_err(|e| status_error(StatusCode::BAD_REQUEST, &e.to_string()))?;
        let mut tasks = self.tasks.lock().unwrap();
        let task = tasks
            .iter_mut()
            .find(|t| t.id == *id)
            .ok_or_else(|| status_error(StatusCode::NOT_FOUND, "Task not found"))?;
        task.apply(changes, task::now());
        Ok(task.clone())
    }

    async fn delete(&self, id: &TaskId) -> Result<DeleteResponse, ClientError> {
        self.check_online()?;
        let mut tasks = self.tasks.lock().unwrap();
        let before = tasks.len();
        tasks.retain(|t| t.id != *id);
        if tasks.len() == before {
            return Err(status_error(StatusCode::NOT_FOUND, "Task not found"));
        }
        Ok(DeleteResponse { message: "Task deleted successfully".into(), id: *id })
    }
}
