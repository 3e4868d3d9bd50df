//! The `Project` entity and the partial update applied to it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::status::ProjectStatus;

/// A project as exchanged over HTTP and persisted by the store.
///
/// `id`, `created_at` and `updated_at` belong to the store: they are
/// emitted in responses but never taken from a request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    #[serde(skip_deserializing)]
    pub id: Option<i64>,

    /// Business key; every lookup goes through it.
    pub title: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub status: ProjectStatus,

    #[serde(skip_deserializing)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(skip_deserializing)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Project {
    /// A new, unsaved, active project.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            description: String::new(),
            status: ProjectStatus::Active,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Whether the store has assigned an identity yet.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}

/// Fields to overwrite on an existing project. Absent fields are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProjectPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
}

impl ProjectPatch {
    /// Merge the patch into `project`, returning the result.
    pub fn apply(self, mut project: Project) -> Project {
        if let Some(title) = self.title {
            project.title = title;
        }
        if let Some(description) = self.description {
            project.description = description;
        }
        if let Some(status) = self.status {
            project.status = status;
        }
        project
    }
}

/// Rejects blank titles; a project with no title cannot be looked up.
pub fn validate_title(title: &str) -> Result<(), &'static str> {
    if title.trim().is_empty() {
        return Err("title must not be empty");
    }
    Ok(())
}
