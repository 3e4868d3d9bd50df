//! Domain types.
//!
//! # Data Flow
//! ```text
//! request body
//!     → Project (create) / ProjectPatch (update)
//!     → status.rs transitions (archive, restore)
//!     → store::ProjectRepository
//! ```

pub mod project;
pub mod status;

pub use project::{Project, ProjectPatch};
pub use status::ProjectStatus;
