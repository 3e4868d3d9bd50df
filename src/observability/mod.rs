//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Every request produces:
//!     → HTTP span with request ID (tower-http, wired in http::server)
//!     → operation span per handler (tracing.rs)
//!     → store spans nested below it (store::sqlite)
//!     → logging.rs (subscriber: filter + fmt/json output)
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - Request ID flows through all spans
//! - Exporter setup is left to the embedding binary

pub mod logging;
pub mod tracing;
