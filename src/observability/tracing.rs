//! Per-operation trace spans.
//!
//! # Responsibilities
//! - Open one span per handler invocation, named after its `Operation`
//! - Record the outcome (status code, error message) on that span
//! - Let handlers attach the project title to the current span
//!
//! # Design Decisions
//! - Implemented once as a tower layer and attached to every handler at
//!   the router, so handlers carry no span wiring
//! - `otel.*` fields follow the tracing-opentelemetry conventions, which
//!   makes the span name and status visible to an OpenTelemetry exporter
//! - The span closes when the response future completes or is dropped
//! - Observation only: the response passes through untouched

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use axum::{extract::Request, response::Response};
use tower::{Layer, Service};
use tracing::{field, Instrument, Span};

/// Attached to error responses so the span can record what went wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationFailure {
    pub message: String,
}

/// Record the project title on the current operation span.
pub fn record_title(title: &str) {
    Span::current().record("project.title", title);
}

/// The operations of the project API, one span name each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    GetAllProjects,
    CreateProject,
    GetProject,
    UpdateProject,
    DeleteProject,
    ArchiveProject,
    RestoreProject,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::GetAllProjects => "GetAllProjects",
            Operation::CreateProject => "CreateProject",
            Operation::GetProject => "GetProject",
            Operation::UpdateProject => "UpdateProject",
            Operation::DeleteProject => "DeleteProject",
            Operation::ArchiveProject => "ArchiveProject",
            Operation::RestoreProject => "RestoreProject",
        }
    }

    /// Open this operation's span. Span names must be literals, hence one arm each.
    fn span(self) -> Span {
        macro_rules! operation_span {
            ($name:literal) => {
                tracing::info_span!(
                    $name,
                    otel.name = $name,
                    otel.kind = "server",
                    otel.status_code = field::Empty,
                    http.response.status_code = field::Empty,
                    project.title = field::Empty,
                    error.message = field::Empty,
                )
            };
        }

        match self {
            Operation::GetAllProjects => operation_span!("GetAllProjects"),
            Operation::CreateProject => operation_span!("CreateProject"),
            Operation::GetProject => operation_span!("GetProject"),
            Operation::UpdateProject => operation_span!("UpdateProject"),
            Operation::DeleteProject => operation_span!("DeleteProject"),
            Operation::ArchiveProject => operation_span!("ArchiveProject"),
            Operation::RestoreProject => operation_span!("RestoreProject"),
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Layer that wraps a handler in the span of its operation.
#[derive(Debug, Clone, Copy)]
pub struct OperationSpanLayer {
    operation: Operation,
}

impl OperationSpanLayer {
    pub fn new(operation: Operation) -> Self {
        Self { operation }
    }
}

/// Shorthand used by the router.
pub fn traced(operation: Operation) -> OperationSpanLayer {
    OperationSpanLayer::new(operation)
}

impl<S> Layer<S> for OperationSpanLayer {
    type Service = OperationSpan<S>;

    fn layer(&self, inner: S) -> Self::Service {
        OperationSpan {
            inner,
            operation: self.operation,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OperationSpan<S> {
    inner: S,
    operation: Operation,
}

impl<S> Service<Request> for OperationSpan<S>
where
    S: Service<Request, Response = Response> + 'static,
    S::Error: 'static,
    S::Future: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Response, S::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request) -> Self::Future {
        let operation = self.operation;
        let span = operation.span();

        let future = {
            let _entered = span.enter();
            self.inner.call(request)
        };

        Box::pin(
            async move {
                let response = future.await?;
                record_outcome(operation, &response);
                Ok(response)
            }
            .instrument(span),
        )
    }
}

fn record_outcome(operation: Operation, response: &Response) {
    let span = Span::current();
    span.record("http.response.status_code", response.status().as_u16());

    match response.extensions().get::<OperationFailure>() {
        Some(failure) => {
            span.record("otel.status_code", "ERROR");
            span.record("error.message", failure.message.as_str());
            tracing::warn!(%operation, error = %failure.message, "Operation failed");
        }
        None => {
            span.record("otel.status_code", "OK");
        }
    }
}
