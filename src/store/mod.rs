//! Persistence subsystem.
//!
//! # Data Flow
//! ```text
//! handler
//!     → ProjectRepository (trait object, injected at startup)
//!     → sqlite.rs (sqlx pool, one statement per call)
//!     → Project rows
//! ```
//!
//! # Design Decisions
//! - Handlers only see the trait; the SQL lives behind it
//! - Each call is a single statement: no transactions, no retries
//! - Calls are plain futures; dropping one cancels the query
//! - Calls are instrumented, so they nest under the caller's span

use async_trait::async_trait;

use crate::model::status::UnknownStatus;
use crate::model::Project;

pub mod sqlite;

pub use sqlite::SqliteProjectRepository;

/// Failure inside the data store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("corrupt row: {0}")]
    CorruptRow(#[from] UnknownStatus),

    #[error("project {0:?} has no identity; save it first")]
    NotPersisted(String),
}

/// Data access for projects, keyed by title.
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// All projects, oldest first.
    async fn find_all(&self) -> Result<Vec<Project>, StoreError>;

    /// The project with this title, if any.
    async fn find_by_title(&self, title: &str) -> Result<Option<Project>, StoreError>;

    /// Insert when `project.id` is `None`, otherwise overwrite the row with
    /// that id. Returns the stored representation.
    async fn save(&self, project: Project) -> Result<Project, StoreError>;

    /// Remove the row backing `project`.
    async fn delete(&self, project: &Project) -> Result<(), StoreError>;
}
