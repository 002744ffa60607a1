use async_trait::async_trait;
use thiserror::Error;

use crate::domain::repository::TaskRepository;
use crate::domain::request::{CreateTaskRequest, UpdateTaskRequest};
use crate::domain::task::{Task, TaskId};
use crate::domain::validation::{self, ValidationError};

#[derive(Debug, Error)]
pub enum TaskError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("task {0} not found")]
    NotFound(String),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

#[async_trait]
pub trait TaskService: Send + Sync + 'static {
    async fn list(&self) -> Result<Vec<Task>, TaskError>;
    async fn get(&self, id: &str) -> Result<Task, TaskError>;
    async fn create(&self, input: CreateTaskRequest) -> Result<Task, TaskError>;
    async fn update(&self, id: &str, input: UpdateTaskRequest) -> Result<Task, TaskError>;
    async fn delete(&self, id: &str) -> Result<TaskId, TaskError>;
}

#[derive(Clone)]
pub struct TaskServiceImpl<R: TaskRepository> {
    repo: R,
}

impl<R: TaskRepository> TaskServiceImpl<R> {
    pub fn new(repo: R) -> Self { Self { repo } }

    pub fn repository(&self) -> &R { &self.repo }
}

// A malformed id can never resolve to a stored task.
fn resolve(id: &str) -> Result<TaskId, TaskError> {
    id.parse().map_err(|_| TaskError::NotFound(id.to_string()))
}

#[async_trait]
impl<R: TaskRepository> TaskService for TaskServiceImpl<R> {
    async fn list(&self) -> Result<Vec<Task>, TaskError> {
        Ok(self.repo.list_all().await?)
    }

    async fn get(&self, id: &str) -> Result<Task, TaskError> {
        let task_id = resolve(id)?;
        self.repo.find_by_id(&task_id).await?.ok_or_else(|| TaskError::NotFound(id.to_string()))
    }

    async fn create(&self, input: CreateTaskRequest) -> Result<Task, TaskError> {
        let new_task = validation::validate_create(&input)?;
        let task = self.repo.insert(new_task).await?;
        tracing::debug!(id = %task.id, "task created");
        Ok(task)
    }

    async fn update(&self, id: &str, input: UpdateTaskRequest) -> Result<Task, TaskError> {
        let changes = validation::validate_update(&input)?;
        let task_id = resolve(id)?;
        let task = self
            .repo
            .update_by_id(&task_id, changes)
            .await?
            .ok_or_else(|| TaskError::NotFound(id.to_string()))?;
        tracing::debug!(id = %task.id, "task updated");
        Ok(task)
    }

    async fn delete(&self, id: &str) -> Result<TaskId, TaskError> {
        let task_id = resolve(id)?;
        if self.repo.delete_by_id(&task_id).await? {
            tracing::debug!(id = %task_id, "task deleted");
            Ok(task_id)
        } else {
            Err(TaskError::NotFound(id.to_string()))
        }
    }
}
