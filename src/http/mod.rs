//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, HTTP span, body limit, JSON fallbacks)
//!     → operation span (observability::tracing), then the request deadline
//!     → extract.rs (title and body, rejections as ApiError)
//!     → projects.rs (lookup-or-404, decode, persist)
//!     → error.rs (map failures to status + {"error": ...})
//!     → Send to client
//! ```

pub mod error;
pub mod extract;
pub mod projects;
pub mod server;

pub use error::{ApiError, ErrorBody};
pub use server::{AppState, HttpServer, X_REQUEST_ID};
