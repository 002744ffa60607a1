use anyhow::{Result, bail};
use async_trait::async_trait;

use crate::domain::{
    repository::TaskRepository,
    task::{NewTask, Task, TaskChanges, TaskId},
};

/// Stand-in store used when no database is configured or reachable.
///
/// The server keeps answering; every task operation fails as a storage error.
#[derive(Debug, Clone, Default)]
pub struct UnavailableTaskRepository;

const NOT_CONNECTED: &str = "task store is not connected";

#[async_trait]
impl TaskRepository for UnavailableTaskRepository {
    async fn init(&self) -> Result<()> { Ok(()) }
    async fn insert(&self, _input: NewTask) -> Result<Task> { bail!(NOT_CONNECTED) }
    async fn list_all(&self) -> Result<Vec<Task>> { bail!(NOT_CONNECTED) }
    async fn find_by_id(&self, _id: &TaskId) -> Result<Option<Task>> { bail!(NOT_CONNECTED) }
    async fn update_by_id(&self, _id: &TaskId, _changes: TaskChanges) -> Result<Option<Task>> { bail!(NOT_CONNECTED) }
    async fn delete_by_id(&self, _id: &TaskId) -> Result<bool> { bail!(NOT_CONNECTED) }
}
