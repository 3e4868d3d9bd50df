//! Project REST API Library

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod model;
pub mod observability;
pub mod store;

pub use config::schema::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use model::{Project, ProjectPatch, ProjectStatus};
pub use store::{ProjectRepository, SqliteProjectRepository, StoreError};
