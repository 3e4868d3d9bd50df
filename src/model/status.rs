//! Project status and its transitions.
//!
//! # Design Decisions
//! - Transitions are free functions over the status value; the entity
//!   carries no behavior of its own
//! - Both transitions are total and idempotent: there is no illegal move

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Lifecycle state of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    #[default]
    Active,
    Archived,
}

impl ProjectStatus {
    /// Storage and wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            ProjectStatus::Active => "active",
            ProjectStatus::Archived => "archived",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a stored status string is not a known state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown project status: {0:?}")]
pub struct UnknownStatus(pub String);

impl FromStr for ProjectStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(ProjectStatus::Active),
            "archived" => Ok(ProjectStatus::Archived),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// `active | archived -> archived`
pub fn archive(_current: ProjectStatus) -> ProjectStatus {
    ProjectStatus::Archived
}

/// `active | archived -> active`
pub fn restore(_current: ProjectStatus) -> ProjectStatus {
    ProjectStatus::Active
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transitions_are_idempotent() {
        for start in [ProjectStatus::Active, ProjectStatus::Archived] {
            assert_eq!(archive(start), ProjectStatus::Archived);
            assert_eq!(archive(archive(start)), ProjectStatus::Archived);
            assert_eq!(restore(start), ProjectStatus::Active);
            assert_eq!(restore(restore(start)), ProjectStatus::Active);
        }
    }

    #[test]
    fn test_default_is_active() {
        assert_eq!(ProjectStatus::default(), ProjectStatus::Active);
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!("archived".parse::<ProjectStatus>(), Ok(ProjectStatus::Archived));
        assert_eq!(ProjectStatus::Active.to_string(), "active");
        assert!("deleted".parse::<ProjectStatus>().is_err());
        assert!("Active".parse::<ProjectStatus>().is_err());
    }

    #[test]
    fn test_serde_uses_lowercase() {
        let json = serde_json::to_string(&ProjectStatus::Archived).unwrap();
        assert_eq!(json, "\"archived\"");
        let parsed: ProjectStatus = serde_json::from_str("\"active\"").unwrap();
        assert_eq!(parsed, ProjectStatus::Active);
    }
}
