use admin_server::app;
use anyhow::Context;
use routeward::config::ConfigService;
use routeward::user::{SeaOrmUserRepository, UserRepository, create_schema};
use sea_orm::Database;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = ConfigService::from_env();
    let url = config.database_url()?;
    let db = Database::connect(url.as_str())
        .await
        .with_context(|| format!("failed to connect to {}", url))?;
    create_schema(&db).await?;

    let users: Arc<dyn UserRepository> = Arc::new(SeaOrmUserRepository::new(db));
    let registry = app::registry()?;
    tracing::info!(controllers = registry.len(), "controllers registered");

    let addr = config.bind_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "admin server listening");

    axum::serve(listener, app::build_router(users))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("admin server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
