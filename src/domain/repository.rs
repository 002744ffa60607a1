use std::sync::Arc;

use async_trait::async_trait;

use super::task::{NewTask, Task, TaskChanges, TaskId};

/// Persistent task collection.
///
/// Implementations assign ids and timestamps. `None`/`false` results mean the
/// id does not resolve; `Err` is reserved for storage failures.
#[async_trait]
pub trait TaskRepository: Send + Sync + 'static {
    async fn init(&self) -> anyhow::Result<()>;
    async fn insert(&self, input: NewTask) -> anyhow::Result<Task>;
    /// Newest first by `created_at`; ties keep the newest insertion first.
    async fn list_all(&self) -> anyhow::Result<Vec<Task>>;
    async fn find_by_id(&self, id: &TaskId) -> anyhow::Result<Option<Task>>;
    async fn update_by_id(&self, id: &TaskId, changes: TaskChanges) -> anyhow::Result<Option<Task>>;
    async fn delete_by_id(&self, id: &TaskId) -> anyhow::Result<bool>;
    async fn close(&self) {}
}

#[async_trait]
impl<R: TaskRepository + ?Sized> TaskRepository for Arc<R> {
    async fn init(&self) -> anyhow::Result<()> { (**self).init().await }
    async fn insert(&self, input: NewTask) -> anyhow::Result<Task> { (**self).insert(input).await }
    async fn list_all(&self) -> anyhow::Result<Vec<Task>> { (**self).list_all().await }
    async fn find_by_id(&self, id: &TaskId) -> anyhow::Result<Option<Task>> { (**self).find_by_id(id).await }
    async fn update_by_id(&self, id: &TaskId, changes: TaskChanges) -> anyhow::Result<Option<Task>> { (**self).update_by_id(id, changes).await }
    async fn delete_by_id(&self, id: &TaskId) -> anyhow::Result<bool> { (**self).delete_by_id(id).await }
    async fn close(&self) { (**self).close().await }
}
