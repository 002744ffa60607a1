//! Data access for the terminal client.
//!
//! [`TaskClient`] is the only writer of the [`TaskCache`]. Create and delete
//! wait for the server before the cache changes; update patches the cache
//! first and rolls the patch back if the server rejects it. Every mutation
//! invalidates its tags once the server has answered, accepted or not, so
//! the next read reflects what the server actually holds.

pub mod cache;
pub mod error;
pub mod transport;

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::patch::Patch;
use crate::domain::request::{CreateTaskRequest, DeleteResponse, UpdateTaskRequest};
use crate::domain::task::{Task, TaskId};
use crate::domain::validation;
use cache::{CacheTag, TaskCache};
use error::ClientError;
use transport::TaskTransport;

pub struct TaskClient<T: TaskTransport> {
    transport: Arc<T>,
    cache: Arc<RwLock<TaskCache>>,
}

impl<T: TaskTransport> Clone for TaskClient<T> {
    fn clone(&self) -> Self {
        Self { transport: Arc::clone(&self.transport), cache: Arc::clone(&self.cache) }
    }
}

impl<T: TaskTransport> TaskClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport: Arc::new(transport), cache: Arc::new(RwLock::new(TaskCache::new())) }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Cached list for rendering, including stale data.
    pub async fn cached_tasks(&self) -> Option<Vec<Task>> {
        self.cache.read().await.list().map(<[Task]>::to_vec)
    }

    pub async fn cached_task(&self, id: &TaskId) -> Option<Task> {
        self.cache.read().await.task(id).cloned()
    }

    pub async fn is_stale(&self, tag: CacheTag) -> bool {
        self.cache.read().await.is_stale(&tag)
    }

    pub async fn list_tasks(&self) -> Result<Vec<Task>, ClientError> {
        if let Some(tasks) = self.cache.read().await.fresh_list() {
            return Ok(tasks.to_vec());
        }
        self.refetch_tasks().await
    }

    pub async fn refetch_tasks(&self) -> Result<Vec<Task>, ClientError> {
        let tasks = self.transport.list().await?;
        tracing::debug!(count = tasks.len(), "task list fetched");
        self.cache.write().await.store_list(tasks.clone());
        Ok(tasks)
    }

    pub async fn get_task(&self, id: &TaskId) -> Result<Task, ClientError> {
        if let Some(task) = self.cache.read().await.fresh_task(id) {
            return Ok(task.clone());
        }
        let task = self.transport.get(id).await?;
        self.cache.write().await.store_task(task.clone());
        Ok(task)
    }

    pub async fn create_task(&self, request: &CreateTaskRequest) -> Result<Task, ClientError> {
        let result = self.transport.create(request).await;
        self.cache.write().await.invalidate(&[CacheTag::List]);
        result
    }

    /// Optimistically applies `request` to the cached copies of `id`, then
    /// confirms with the server. A failed call restores the cached copies
    /// before the tags are invalidated.
    pub async fn update_task(&self, id: &TaskId, request: &UpdateTaskRequest) -> Result<Task, ClientError> {
        let patch = {
            let mut cache = self.cache.write().await;
            let updated_at = Utc::now();
            cache.patch(*id, |task| {
                apply_optimistic(task, request);
                task.updated_at = updated_at;
            })
        };

        let result = self.transport.update(id, request).await;
        let mut cache = self.cache.write().await;
        if let Err(error) = &result {
            tracing::debug!(%id, error = %error, "optimistic update rolled back");
            cache.undo(patch);
        }
        cache.invalidate(&[CacheTag::Task(*id), CacheTag::List]);
        result
    }

    pub async fn delete_task(&self, id: &TaskId) -> Result<DeleteResponse, ClientError> {
        let result = self.transport.delete(id).await;
        self.cache.write().await.invalidate(&[CacheTag::Task(*id), CacheTag::List]);
        result
    }
}

/// Copies the submitted fields onto a cached task ahead of the server.
///
/// Values the server would reject are left out of the preview; the server
/// response decides what is actually stored.
fn apply_optimistic(task: &mut Task, request: &UpdateTaskRequest) {
    if let Some(title) = &request.title {
        task.title = title.trim().to_string();
    }
    if let Some(description) = &request.description {
        task.description = description.trim().to_string();
    }
    if let Some(status) = request.status.as_deref().and_then(|s| s.parse().ok()) {
        task.status = status;
    }
    preview(&request.priority, validation::check_priority).apply_to(&mut task.priority);
    preview(&request.due_date, validation::check_due_date).apply_to(&mut task.due_date);
}

fn preview<V>(
    patch: &Patch<serde_json::Number>,
    rule: impl FnOnce(&serde_json::Number) -> Result<V, String>,
) -> Patch<V> {
    match patch {
        Patch::Missing => Patch::Missing,
        Patch::Null => Patch::Null,
        Patch::Value(raw) => rule(raw).map_or(Patch::Missing, Patch::Value),
    }
}
