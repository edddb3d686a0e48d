/// Portfolio project REST endpoints
///
/// GET lists every project newest first; POST inserts one. Both need the
/// relational binding and collapse store failures into a generic 500.

use crate::{
    api::error::ApiError,
    platform::Platform,
    project::types::{NewProject, Project},
};
use axum::{
    body::Bytes,
    response::Json,
    routing::get,
    Router,
};
use serde_json::{json, Value};

const DATABASE_NOT_CONFIGURED: &str = "Database not configured";

/// Create project listing routes
pub fn create_project_routes() -> Router {
    Router::new().route("/api/projects", get(list_projects).post(create_project))
}

/// List all projects
///
/// GET /api/projects
/// Returns: [{ "id": 1, "title": "...", "description": null, "image_url": null, "created_at": "..." }]
async fn list_projects(platform: Platform) -> Result<Json<Vec<Project>>, ApiError> {
    let Some(db) = platform.db else {
        return Err(ApiError::internal(DATABASE_NOT_CONFIGURED));
    };

    match db.list_projects().await {
        Ok(projects) => {
            tracing::debug!("Listed {} projects", projects.len());
            Ok(Json(projects))
        }
        Err(e) => {
            tracing::error!("❌ Failed to fetch projects: {:#}", e);
            Err(ApiError::internal("Failed to fetch projects"))
        }
    }
}

/// Create a project
///
/// POST /api/projects
/// Body: { "title": "...", "description": "...", "image_url": "..." }
/// Returns: { "success": true }
///
/// The body is parsed regardless of Content-Type. A body that is not JSON or
/// lacks a title is treated like any other failure of this route.
async fn create_project(platform: Platform, body: Bytes) -> Result<Json<Value>, ApiError> {
    let Some(db) = platform.db else {
        return Err(ApiError::internal(DATABASE_NOT_CONFIGURED));
    };

    let project: NewProject = match serde_json::from_slice(&body) {
        Ok(project) => project,
        Err(e) => {
            tracing::error!("❌ Invalid project payload: {}", e);
            return Err(ApiError::internal("Failed to create project"));
        }
    };

    match db.create_project(&project).await {
        Ok(id) => {
            tracing::info!("📌 Created project {} ({})", id, project.title);
            Ok(Json(json!({ "success": true })))
        }
        Err(e) => {
            tracing::error!("❌ Failed to create project: {:#}", e);
            Err(ApiError::internal("Failed to create project"))
        }
    }
}
