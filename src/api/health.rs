/// Health check endpoint
///
/// Reports the deployment name and the state of each platform binding.
/// Always answers 200 so the process can be probed even with bindings down.

use crate::platform::Platform;
use axum::{response::Json, routing::get, Router};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub environment: String,
    pub database: &'static str,
    pub storage: &'static str,
    pub timestamp: String,
}

pub fn create_health_routes() -> Router {
    Router::new().route("/healthz", get(health_check))
}

async fn health_check(platform: Platform) -> Json<HealthResponse> {
    let database = match &platform.db {
        None => "not configured",
        Some(db) => match db.health_check().await {
            Ok(()) => "connected",
            Err(e) => {
                tracing::warn!("Database health check failed: {:#}", e);
                "unreachable"
            }
        },
    };

    let storage = match &platform.storage {
        None => "not configured",
        Some(storage) => match storage.health_check().await {
            Ok(()) => "available",
            Err(e) => {
                tracing::warn!("Storage health check failed ({}): {}", storage.backend(), e);
                "unavailable"
            }
        },
    };

    Json(HealthResponse {
        status: "ok",
        environment: platform
            .env
            .get("STUDIO_ENV")
            .cloned()
            .unwrap_or_else(|| "development".to_string()),
        database,
        storage,
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}
