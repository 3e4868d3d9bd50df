//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wrap every project handler in its operation span
//! - Wire up middleware (tracing, timeout, body limit, request ID)
//! - Bind server to listener and shut down gracefully

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    error_handling::HandleErrorLayer,
    extract::DefaultBodyLimit,
    handler::Handler,
    http::{Method, Request, StatusCode, Uri},
    routing::{get, put},
    BoxError, Json, Router,
};
use serde::Serialize;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::{timeout::error::Elapsed, ServiceBuilder};
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::ServiceConfig;
use crate::http::error::ApiError;
use crate::http::projects::{
    archive_project, create_project, delete_project, get_project, list_projects, restore_project,
    update_project,
};
use crate::lifecycle::signals::shutdown_requested;
use crate::observability::tracing::{traced, Operation};
use crate::store::ProjectRepository;

/// Header carrying the per-request correlation id.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub projects: Arc<dyn ProjectRepository>,
}

/// HTTP server for the project API.
#[derive(Debug)]
pub struct HttpServer {
    router: Router,
    config: ServiceConfig,
}

impl HttpServer {
    /// Create a new HTTP server over the given repository.
    pub fn new(config: ServiceConfig, projects: Arc<dyn ProjectRepository>) -> Self {
        let state = AppState { projects };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ServiceConfig, state: AppState) -> Router {
        let deadline = Duration::from_secs(config.timeouts.request_secs);
        // The deadline runs inside the operation span so a 408 is recorded on it.
        let operation = move |operation: Operation| {
            ServiceBuilder::new()
                .layer(traced(operation))
                .layer(HandleErrorLayer::<_, ()>::new(timed_out))
                .timeout(deadline)
        };

        Router::new()
            .route("/health", get(health))
            .route(
                "/projects",
                get(list_projects.layer(operation(Operation::GetAllProjects)))
                    .post(create_project.layer(operation(Operation::CreateProject))),
            )
            .route(
                "/projects/{title}",
                get(get_project.layer(operation(Operation::GetProject)))
                    .put(update_project.layer(operation(Operation::UpdateProject)))
                    .delete(delete_project.layer(operation(Operation::DeleteProject))),
            )
            .route(
                "/projects/{title}/archive",
                put(archive_project.layer(operation(Operation::ArchiveProject))),
            )
            .route(
                "/projects/{title}/restore",
                put(restore_project.layer(operation(Operation::RestoreProject))),
            )
            .fallback(unknown_route)
            .method_not_allowed_fallback(method_not_allowed)
            .with_state(state)
            .layer(DefaultBodyLimit::max(config.security.max_body_size))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                let request_id = request
                    .headers()
                    .get(X_REQUEST_ID)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("unknown");
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request_id,
                )
            }))
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// A clone of the fully layered router, for driving requests in-process.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until a termination signal or `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_requested(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
}

async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn timed_out(err: BoxError) -> ApiError {
    if err.is::<Elapsed>() {
        ApiError::http(StatusCode::REQUEST_TIMEOUT, "request timed out")
    } else {
        ApiError::http(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
    }
}

async fn unknown_route(uri: Uri) -> ApiError {
    ApiError::http(StatusCode::NOT_FOUND, format!("no route for {}", uri.path()))
}

async fn method_not_allowed(method: Method, uri: Uri) -> ApiError {
    ApiError::http(
        StatusCode::METHOD_NOT_ALLOWED,
        format!("{method} is not allowed on {}", uri.path()),
    )
}
