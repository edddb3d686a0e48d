/// HTTP API Layer
///
/// REST endpoints backing the marketing site:
/// - Portfolio project listing and creation
/// - Media uploads into the object store
/// - Health check
///
/// Handlers reach their bindings through the `Platform` extractor and report
/// failures as JSON `{"error": ...}` bodies.

// JSON error responses shared by all handlers
pub mod error;

// Project listing/creation endpoints (GET/POST)
pub mod projects;

// Multipart upload endpoint
pub mod upload;

// Binding status endpoint
pub mod health;

#[cfg(test)]
pub(crate) mod testing;

// Re-export router builders
pub use health::create_health_routes;
pub use projects::create_project_routes;
pub use upload::create_upload_routes;
