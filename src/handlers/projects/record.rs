// handlers/projects/record.rs - GET/PUT/DELETE /api/projects/:id

use axum::extract::State;
use serde::Serialize;

use crate::app::AppState;
use crate::middleware::{ApiPath, ApiResponse, ApiResult, AuthSubject};
use crate::project::{Project, ProjectForm};
use crate::types::ProjectId;

#[derive(Debug, Serialize)]
pub struct DeletedProject {
    pub message: String,
    pub id: ProjectId,
}

pub async fn project_show(State(state): State<AppState>, ApiPath(id): ApiPath<String>) -> ApiResult<Project> {
    let project = state.projects.get(&id).await?;
    Ok(ApiResponse::success(project))
}

/// Partial update: only fields present in the body change
pub async fn project_update(
    AuthSubject(subject): AuthSubject,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
    form: ProjectForm,
) -> ApiResult<Project> {
    let project = state.projects.update(&subject, &id, form).await?;
    Ok(ApiResponse::success(project))
}

pub async fn project_delete(
    AuthSubject(subject): AuthSubject,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> ApiResult<DeletedProject> {
    let id = state.projects.delete(&subject, &id).await?;
    Ok(ApiResponse::success(DeletedProject {
        message: "Project deleted".to_string(),
        id,
    }))
}
