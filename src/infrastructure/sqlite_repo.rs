use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{
    Pool, Row, Sqlite,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
};

use crate::domain::{
    repository::TaskRepository,
    task::{self, DueDate, NewTask, Priority, Task, TaskChanges, TaskId},
};

const COLUMNS: &str = "id, title, description, status, priority, due_date, created_at, updated_at";

#[derive(Clone)]
pub struct SqliteTaskRepository {
    pool: Arc<Pool<Sqlite>>,
}

impl SqliteTaskRepository {
    pub async fn connect(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("invalid database url {database_url}"))?
            .create_if_missing(true);
        // Every in-memory connection is its own database, so keep exactly one alive.
        let in_memory = database_url.contains(":memory:");
        let pool = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>)
                .connect_with(options)
                .await?
        } else {
            SqlitePoolOptions::new().max_connections(5).connect_with(options).await?
        };
        Ok(Self { pool: Arc::new(pool) })
    }
}

#[async_trait]
impl TaskRepository for SqliteTaskRepository {
    async fn init(&self) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS tasks (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                status TEXT NOT NULL,
                priority INTEGER,
                due_date INTEGER,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            )",
        )
        .execute(&*self.pool)
        .await?;
        Ok(())
    }

    async fn insert(&self, input: NewTask) -> Result<Task> {
        let task = Task::new(TaskId::new(), input, task::now());
        sqlx::query(
            "INSERT INTO tasks (id, title, description, status, priority, due_date, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )
        .bind(task.id.to_string())
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.status.as_str())
        .bind(task.priority.map(i64::from))
        .bind(task.due_date.map(i64::from))
        .bind(task.created_at.timestamp())
        .bind(task.updated_at.timestamp())
        .execute(&*self.pool)
        .await?;
        Ok(task)
    }

    async fn list_all(&self) -> Result<Vec<Task>> {
        let rows = sqlx::query(&format!("SELECT {COLUMNS} FROM tasks ORDER BY created_at DESC, rowid DESC"))
            .fetch_all(&*self.pool)
            .await?;
        rows.into_iter().map(row_to_task).collect()
    }

    async fn find_by_id(&self, id: &TaskId) -> Result<Option<Task>> {
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM tasks WHERE id = ?1"))
            .bind(id.to_string())
            .fetch_optional(&*self.pool)
            .await?;
        row.map(row_to_task).transpose()
    }

    async fn update_by_id(&self, id: &TaskId, changes: TaskChanges) -> Result<Option<Task>> {
        let Some(mut task) = self.find_by_id(id).await? else { return Ok(None) };
        task.apply(changes, task::now());

        let result = sqlx::query(
            "UPDATE tasks SET title = ?2, description = ?3, status = ?4, priority = ?5, due_date = ?6, updated_at = ?7
             WHERE id = ?1",
        )
        .bind(task.id.to_string())
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.status.as_str())
        .bind(task.priority.map(i64::from))
        .bind(task.due_date.map(i64::from))
        .bind(task.updated_at.timestamp())
        .execute(&*self.pool)
        .await?;

        // Deleted between the read and the write.
        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Ok(Some(task))
    }

    async fn delete_by_id(&self, id: &TaskId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?1")
            .bind(id.to_string())
            .execute(&*self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

fn row_to_task(row: SqliteRow) -> Result<Task> {
    let id: String = row.try_get("id")?;
    let status: String = row.try_get("status")?;
    let priority: Option<i64> = row.try_get("priority")?;
    let due_date: Option<i64> = row.try_get("due_date")?;
    let created_at: i64 = row.try_get("created_at")?;
    let updated_at: i64 = row.try_get("updated_at")?;

    Ok(Task {
        id: id.parse().with_context(|| format!("stored id {id} is not a uuid"))?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        status: status.parse()?,
        priority: priority.map(Priority::try_from).transpose()?,
        due_date: due_date.map(DueDate::try_from).transpose()?,
        created_at: timestamp(created_at)?,
        updated_at: timestamp(updated_at)?,
    })
}

fn timestamp(seconds: i64) -> Result<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(seconds, 0).with_context(|| format!("stored timestamp {seconds} is out of range"))
}
