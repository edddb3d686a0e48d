/// Project management module
///
/// Persists the studio's portfolio projects in SQLite. The handle is the
/// relational binding exposed to request handlers by the platform accessor.

pub mod database;
pub mod types;

pub use database::ProjectStore;
pub use types::{NewProject, Project};
