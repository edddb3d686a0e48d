/// Server setup and initialization
///
/// Opens the configured bindings, installs them as the per-request execution
/// context and serves the API routes.

use crate::{
    api::{create_health_routes, create_project_routes, create_upload_routes},
    config::Config,
    platform::ExecutionContext,
    project::ProjectStore,
    storage::{LocalObjectStore, ObjectStore},
};
use anyhow::Result;
use axum::{Extension, Router};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

/// Create the main Axum application
///
/// Bindings missing from the configuration stay absent; the routes that need
/// them answer with a server error instead of failing startup. A binding that
/// is configured but cannot be opened does fail startup.
pub async fn create_app(config: Config) -> Result<Router> {
    let mut context = ExecutionContext::new(config.env.clone());

    match &config.database {
        Some(database) => {
            tracing::info!("🏗️ Connecting relational binding");
            let db = ProjectStore::connect(database)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to open project database: {}", e))?;
            context = context.with_database(db);
        }
        None => tracing::warn!("⚠️ STUDIO_DATABASE_URL not set, project routes will return 500"),
    }

    match &config.storage {
        Some(storage) => {
            tracing::info!("🏗️ Opening object store binding");
            let store = LocalObjectStore::open(&storage.root_dir)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to open object store '{}': {}", storage.root_dir, e))?;
            context = context.with_storage(Arc::new(store) as Arc<dyn ObjectStore>);
        }
        None => tracing::warn!("⚠️ STUDIO_STORAGE_DIR not set, uploads will return 500"),
    }

    let app = build_router(context, config.server.max_upload_bytes);

    tracing::info!("✅ Application initialized successfully");
    Ok(app)
}

/// Assemble all routes around an execution context
pub fn build_router(context: ExecutionContext, max_upload_bytes: usize) -> Router {
    tracing::info!("📡 Creating HTTP router with all endpoints");

    Router::new()
        .merge(create_health_routes())
        .merge(create_project_routes())
        .merge(create_upload_routes(max_upload_bytes))
        .layer(Extension(context))
}

/// Start the HTTP server with the given configuration
///
/// Serves until Ctrl-C, then drains in-flight requests before returning.
pub async fn start_server(config: Config) -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("studio_site=info")),
        )
        .with_target(false)
        .with_thread_ids(true)
        .with_level(true)
        .init();

    tracing::info!("Starting studio site backend ({})...", config.server.environment);

    let app = create_app(config.clone()).await?;

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&bind_addr).await?;

    tracing::info!("Server listening on http://{}", bind_addr);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("❌ Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
