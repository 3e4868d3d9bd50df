//! SQLite-backed repository.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::config::DatabaseConfig;
use crate::model::Project;
use crate::store::{ProjectRepository, StoreError};

const CREATE_TABLE: &str = "\
CREATE TABLE IF NOT EXISTS projects (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    title       TEXT NOT NULL UNIQUE,
    description TEXT NOT NULL DEFAULT '',
    status      TEXT NOT NULL DEFAULT 'active',
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
)";

const COLUMNS: &str = "id, title, description, status, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct ProjectRow {
    id: i64,
    title: String,
    description: String,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProjectRow> for Project {
    type Error = StoreError;

    fn try_from(row: ProjectRow) -> Result<Self, Self::Error> {
        Ok(Project {
            id: Some(row.id),
            title: row.title,
            description: row.description,
            status: row.status.parse()?,
            created_at: Some(row.created_at),
            updated_at: Some(row.updated_at),
        })
    }
}

/// Repository over a `sqlx` SQLite pool.
#[derive(Debug, Clone)]
pub struct SqliteProjectRepository {
    pool: SqlitePool,
}

impl SqliteProjectRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open a pool as described by `config`.
    ///
    /// In-memory databases live and die with their connection, so the pool
    /// is pinned to a single connection that never expires.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(&config.url)?.create_if_missing(true);

        let mut pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs));
        if config.is_in_memory() {
            pool = pool
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }

        let pool = pool.connect_with(options).await?;
        tracing::debug!(url = %config.url, "Database pool opened");
        Ok(Self::new(pool))
    }

    /// Create the `projects` table if it does not exist yet.
    pub async fn bootstrap(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_TABLE).execute(&self.pool).await?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl ProjectRepository for SqliteProjectRepository {
    #[tracing::instrument(level = "debug", skip(self), err)]
    async fn find_all(&self) -> Result<Vec<Project>, StoreError> {
        let sql = format!("SELECT {COLUMNS} FROM projects ORDER BY id");
        let rows: Vec<ProjectRow> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;
        rows.into_iter().map(Project::try_from).collect()
    }

    #[tracing::instrument(level = "debug", skip(self), err)]
    async fn find_by_title(&self, title: &str) -> Result<Option<Project>, StoreError> {
        let sql = format!("SELECT {COLUMNS} FROM projects WHERE title = ?");
        let row: Option<ProjectRow> = sqlx::query_as(&sql)
            .bind(title)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Project::try_from).transpose()
    }

    #[tracing::instrument(
        level = "debug",
        skip(self, project),
        fields(project.id = ?project.id, project.title = %project.title),
        err
    )]
    async fn save(&self, project: Project) -> Result<Project, StoreError> {
        let now = Utc::now();
        let sql = format!(
            "INSERT INTO projects (id, title, description, status, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?) \
             ON CONFLICT(id) DO UPDATE SET \
                 title = excluded.title, \
                 description = excluded.description, \
                 status = excluded.status, \
                 updated_at = excluded.updated_at \
             RETURNING {COLUMNS}"
        );
        let row: ProjectRow = sqlx::query_as(&sql)
            .bind(project.id)
            .bind(&project.title)
            .bind(&project.description)
            .bind(project.status.as_str())
            .bind(project.created_at.unwrap_or(now))
            .bind(now)
            .fetch_one(&self.pool)
            .await?;
        Project::try_from(row)
    }

    #[tracing::instrument(
        level = "debug",
        skip(self, project),
        fields(project.id = ?project.id, project.title = %project.title),
        err
    )]
    async fn delete(&self, project: &Project) -> Result<(), StoreError> {
        let id = project
            .id
            .ok_or_else(|| StoreError::NotPersisted(project.title.clone()))?;
        sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ProjectStatus;

    async fn memory_repo() -> SqliteProjectRepository {
        let config = DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            ..DatabaseConfig::default()
        };
        let repo = SqliteProjectRepository::connect(&config).await.unwrap();
        repo.bootstrap().await.unwrap();
        repo
    }

    #[tokio::test]
    async fn test_save_new_assigns_identity_and_timestamps() {
        let repo = memory_repo().await;
        let saved = repo.save(Project::new("alpha")).await.unwrap();

        assert!(saved.id.is_some());
        assert_eq!(saved.title, "alpha");
        assert_eq!(saved.status, ProjectStatus::Active);
        assert!(saved.created_at.is_some());
        assert_eq!(saved.created_at, saved.updated_at);
    }

    #[tokio::test]
    async fn test_save_existing_updates_in_place() {
        let repo = memory_repo().await;
        let mut saved = repo.save(Project::new("alpha")).await.unwrap();
        let created_at = saved.created_at;

        saved.description = "changed".into();
        saved.status = ProjectStatus::Archived;
        let updated = repo.save(saved.clone()).await.unwrap();

        assert_eq!(updated.id, saved.id);
        assert_eq!(updated.description, "changed");
        assert_eq!(updated.status, ProjectStatus::Archived);
        assert_eq!(updated.created_at, created_at);
        assert_eq!(repo.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_find_by_title() {
        let repo = memory_repo().await;
        repo.save(Project::new("alpha").with_description("a")).await.unwrap();
        repo.save(Project::new("beta")).await.unwrap();

        let found = repo.find_by_title("alpha").await.unwrap().unwrap();
        assert_eq!(found.description, "a");
        assert!(repo.find_by_title("gamma").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_all_in_insertion_order() {
        let repo = memory_repo().await;
        assert!(repo.find_all().await.unwrap().is_empty());

        for title in ["one", "two", "three"] {
            repo.save(Project::new(title)).await.unwrap();
        }
        let titles: Vec<String> = repo
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, ["one", "two", "three"]);
    }

    #[tokio::test]
    async fn test_duplicate_title_is_rejected() {
        let repo = memory_repo().await;
        repo.save(Project::new("alpha")).await.unwrap();

        let err = repo.save(Project::new("alpha")).await.unwrap_err();
        assert!(matches!(err, StoreError::Database(_)));
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = memory_repo().await;
        let saved = repo.save(Project::new("alpha")).await.unwrap();

        repo.delete(&saved).await.unwrap();
        assert!(repo.find_by_title("alpha").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_unsaved_project_fails() {
        let repo = memory_repo().await;
        let err = repo.delete(&Project::new("ghost")).await.unwrap_err();
        assert!(matches!(err, StoreError::NotPersisted(title) if title == "ghost"));
    }

    #[tokio::test]
    async fn test_unknown_status_in_row_is_reported() {
        let repo = memory_repo().await;
        sqlx::query(
            "INSERT INTO projects (title, status, created_at, updated_at) \
             VALUES ('odd', 'frozen', '2024-01-01T00:00:00Z', '2024-01-01T00:00:00Z')",
        )
        .execute(repo.pool())
        .await
        .unwrap();

        let err = repo.find_by_title("odd").await.unwrap_err();
        assert!(matches!(err, StoreError::CorruptRow(_)));
    }
}
