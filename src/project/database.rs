/// SQLite persistence for portfolio projects
///
/// One table, `projects`, with store-assigned ids and millisecond timestamps.
/// Only two operations exist: list everything newest first, and insert one row.

use crate::config::DatabaseConfig;
use crate::project::types::{NewProject, Project};
use anyhow::Result;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions},
    Row,
};
use std::str::FromStr;

/// Relational binding for the projects table
///
/// Cheap to clone: the inner pool is reference counted.
#[derive(Debug, Clone)]
pub struct ProjectStore {
    /// SQLite connection pool
    pool: SqlitePool,
}

impl ProjectStore {
    /// Wrap an existing pool (schema is not touched)
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open the configured database and make sure the schema exists
    ///
    /// The database file is created when missing. In-memory URLs keep their
    /// connections alive forever, since closing the last one drops the data.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(&config.url)
            .map_err(|e| anyhow::anyhow!("Invalid database URL '{}': {}", config.url, e))?
            .create_if_missing(true);

        let mut pool_options = SqlitePoolOptions::new().max_connections(config.max_connections);
        if config.url.contains(":memory:") {
            pool_options = pool_options.idle_timeout(None).max_lifetime(None);
        }

        tracing::info!("🗄️ Opening project database: {}", config.url);
        let pool = pool_options.connect_with(options).await?;

        let store = Self::new(pool);
        store.init_schema().await?;

        tracing::info!("✅ Project database ready");
        Ok(store)
    }

    /// Create the projects table and its ordering index
    ///
    /// Safe to call multiple times (uses IF NOT EXISTS).
    pub async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS projects (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                description TEXT,
                image_url TEXT,
                created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now'))
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_projects_created_at ON projects(created_at)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// List every project, newest first
    ///
    /// Rows created within the same millisecond fall back to id order so the
    /// later insert still comes first.
    pub async fn list_projects(&self) -> Result<Vec<Project>> {
        let rows = sqlx::query(
            "SELECT id, title, description, image_url, created_at FROM projects ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut projects = Vec::with_capacity(rows.len());
        for row in rows {
            projects.push(Project {
                id: row.try_get("id")?,
                title: row.try_get("title")?,
                description: row.try_get("description")?,
                image_url: row.try_get("image_url")?,
                created_at: row.try_get("created_at")?,
            });
        }

        Ok(projects)
    }

    /// Insert one project with bound parameters
    ///
    /// Returns the id SQLite assigned to the row.
    pub async fn create_project(&self, project: &NewProject) -> Result<i64> {
        let result = sqlx::query(
            "INSERT INTO projects (title, description, image_url) VALUES (?, ?, ?)",
        )
        .bind(&project.title)
        .bind(&project.description)
        .bind(&project.image_url)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Round-trip a trivial query to prove the database is reachable
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }

    /// Underlying pool, for maintenance and tests
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) async fn memory_store() -> ProjectStore {
        ProjectStore::connect(&DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        })
        .await
        .expect("in-memory database")
    }

    #[tokio::test]
    async fn title_only_project_has_empty_optional_fields() {
        let store = memory_store().await;
        let id = store.create_project(&NewProject::titled("Acme site")).await.unwrap();

        let projects = store.list_projects().await.unwrap();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].id, id);
        assert_eq!(projects[0].title, "Acme site");
        assert_eq!(projects[0].description, None);
        assert_eq!(projects[0].image_url, None);
        assert!(!projects[0].created_at.is_empty());
    }

    #[tokio::test]
    async fn projects_are_listed_newest_first() {
        let store = memory_store().await;
        store.create_project(&NewProject::titled("A")).await.unwrap();
        store
            .create_project(&NewProject {
                title: "B".to_string(),
                description: Some("Second".to_string()),
                image_url: Some("1700000000000-b.png".to_string()),
            })
            .await
            .unwrap();

        let titles: Vec<String> = store
            .list_projects()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, vec!["B", "A"]);
    }

    #[tokio::test]
    async fn user_text_is_bound_not_interpolated() {
        let store = memory_store().await;
        let hostile = "x'); DROP TABLE projects; --";
        store.create_project(&NewProject::titled(hostile)).await.unwrap();

        let projects = store.list_projects().await.unwrap();
        assert_eq!(projects[0].title, hostile);
    }

    #[tokio::test]
    async fn schema_init_is_idempotent() {
        let store = memory_store().await;
        store.create_project(&NewProject::titled("Kept")).await.unwrap();
        store.init_schema().await.unwrap();

        assert_eq!(store.list_projects().await.unwrap().len(), 1);
        store.health_check().await.unwrap();
    }

    #[tokio::test]
    async fn missing_table_surfaces_as_error() {
        let store = memory_store().await;
        sqlx::query("DROP TABLE projects").execute(store.pool()).await.unwrap();

        assert!(store.list_projects().await.is_err());
        assert!(store.create_project(&NewProject::titled("Lost")).await.is_err());
    }
}
