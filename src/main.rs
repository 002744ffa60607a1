use todai::application::task_service::TaskServiceImpl;
use todai::config::Config;
use todai::http::routing::{self, tasks};
use todai::infrastructure;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env()?;
    let repo = infrastructure::connect_store(config.database_url.as_deref()).await;
    let service = TaskServiceImpl::new(repo);
    let tasks_router = tasks::router(tasks::AppState { service: service.clone() });
    let router = routing::with_layers(routing::app(tasks_router), config.cors_origin.clone());

    let addr = config.listen_addr();
    tracing::info!(%addr, "listening");
    axum::serve(tokio::net::TcpListener::bind(addr).await?, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    service.repository().close().await;
    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal::ctrl_c;
    let _ = ctrl_c().await;
    tracing::info!("shutdown");
}
