/// Studio site backend
///
/// HTTP API behind the studio's marketing site: portfolio project listings
/// stored in SQLite and media uploads stored in an object store, both reached
/// through a per-request platform binding accessor.

// Core configuration and setup
pub mod config;

// Per-request platform bindings (relational store, object store, env map)
pub mod platform;

// Portfolio project persistence
pub mod project;

// Key-addressed object storage backends
pub mod storage;

// HTTP API layer - REST endpoints for projects, uploads and health
pub mod api;

// Server setup and initialization
pub mod server;

// Re-export commonly used types for external consumers
pub use platform::{ExecutionContext, Platform};
pub use project::{Project, ProjectStore};
pub use server::start_server;
pub use storage::ObjectStore;
