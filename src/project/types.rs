/// Project record types for the portfolio listing
///
/// Rows of the `projects` table and the request body used to create them.

use serde::{Deserialize, Serialize};

/// A portfolio project shown in the site's projects section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Row identifier assigned by SQLite
    pub id: i64,
    /// Project title
    pub title: String,
    /// Optional long-form description
    pub description: Option<String>,
    /// Optional image reference (usually an uploaded object key or URL)
    pub image_url: Option<String>,
    /// Insert time, "YYYY-MM-DD HH:MM:SS.SSS" in UTC, assigned by SQLite
    pub created_at: String,
}

/// Fields accepted when creating a project
///
/// Only presence of `title` is enforced (by deserialization); no length or
/// format checks are made.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewProject {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl NewProject {
    /// Project with only a title
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}
