//! Project resource handlers.
//!
//! Each handler is one decode, persist, respond cycle against the injected
//! repository. Spans are attached by the router, not here; handlers only
//! add the project title to the span they run in.

use axum::{extract::State, http::StatusCode, Json};
use serde::de::DeserializeOwned;

use crate::http::error::ApiError;
use crate::http::extract::{RawBody, Title};
use crate::http::server::AppState;
use crate::model::project::validate_title;
use crate::model::{status, Project, ProjectPatch};
use crate::observability::tracing::record_title;
use crate::store::ProjectRepository;

/// Find the project with `title` or fail with `NotFound`.
pub async fn find_or_404(
    projects: &dyn ProjectRepository,
    title: &str,
) -> Result<Project, ApiError> {
    projects
        .find_by_title(title)
        .await?
        .ok_or_else(|| ApiError::NotFound(title.to_string()))
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    Ok(serde_json::from_slice(body)?)
}

fn check_title(title: &str) -> Result<(), ApiError> {
    validate_title(title).map_err(|reason| ApiError::Decode(reason.to_string()))
}

pub async fn list_projects(State(state): State<AppState>) -> Result<Json<Vec<Project>>, ApiError> {
    let projects = state.projects.find_all().await?;
    Ok(Json(projects))
}

pub async fn create_project(
    State(state): State<AppState>,
    RawBody(body): RawBody,
) -> Result<(StatusCode, Json<Project>), ApiError> {
    let project: Project = decode(&body)?;
    record_title(&project.title);
    check_title(&project.title)?;

    let saved = state.projects.save(project).await?;
    tracing::debug!(id = ?saved.id, "Project created");
    Ok((StatusCode::CREATED, Json(saved)))
}

pub async fn get_project(
    State(state): State<AppState>,
    Title(title): Title,
) -> Result<Json<Project>, ApiError> {
    record_title(&title);
    let project = find_or_404(state.projects.as_ref(), &title).await?;
    Ok(Json(project))
}

/// Lookup comes first: an unknown title is a 404 whatever the body holds.
pub async fn update_project(
    State(state): State<AppState>,
    Title(title): Title,
    RawBody(body): RawBody,
) -> Result<Json<Project>, ApiError> {
    record_title(&title);
    let project = find_or_404(state.projects.as_ref(), &title).await?;

    let patch: ProjectPatch = decode(&body)?;
    if let Some(new_title) = &patch.title {
        check_title(new_title)?;
    }

    let saved = state.projects.save(patch.apply(project)).await?;
    Ok(Json(saved))
}

pub async fn delete_project(
    State(state): State<AppState>,
    Title(title): Title,
) -> Result<StatusCode, ApiError> {
    record_title(&title);
    let project = find_or_404(state.projects.as_ref(), &title).await?;

    state.projects.delete(&project).await?;
    tracing::debug!(id = ?project.id, "Project deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn archive_project(
    State(state): State<AppState>,
    Title(title): Title,
) -> Result<Json<Project>, ApiError> {
    record_title(&title);
    let mut project = find_or_404(state.projects.as_ref(), &title).await?;

    project.status = status::archive(project.status);
    let saved = state.projects.save(project).await?;
    Ok(Json(saved))
}

pub async fn restore_project(
    State(state): State<AppState>,
    Title(title): Title,
) -> Result<Json<Project>, ApiError> {
    record_title(&title);
    let mut project = find_or_404(state.projects.as_ref(), &title).await?;

    project.status = status::restore(project.status);
    let saved = state.projects.save(project).await?;
    Ok(Json(saved))
}
