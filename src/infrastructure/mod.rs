pub mod sqlite_repo;
pub mod unavailable_repo;

use std::sync::Arc;

use crate::domain::repository::TaskRepository;
use sqlite_repo::SqliteTaskRepository;
use unavailable_repo::UnavailableTaskRepository;

/// Opens the task store once at startup.
///
/// A missing url or a failed connection is logged and the server runs on
/// [`UnavailableTaskRepository`] instead of exiting.
pub async fn connect_store(database_url: Option<&str>) -> Arc<dyn TaskRepository> {
    let Some(url) = database_url else {
        tracing::warn!("DATABASE_URL is not defined; serving without persistence");
        return Arc::new(UnavailableTaskRepository);
    };

    let connected = async {
        let repo = SqliteTaskRepository::connect(url).await?;
        repo.init().await?;
        anyhow::Ok(repo)
    }
    .await;

    match connected {
        Ok(repo) => {
            tracing::info!(database_url = %url, "task store connected");
            Arc::new(repo)
        }
        Err(error) => {
            tracing::error!(error = %format!("{error:#}"), "task store connection failed");
            tracing::warn!("server will continue running without persistence");
            Arc::new(UnavailableTaskRepository)
        }
    }
}
