// handlers/projects/collection.rs - GET/POST /api/projects

use axum::extract::State;
use serde::Deserialize;

use crate::app::AppState;
use crate::middleware::{ApiQuery, ApiResponse, ApiResult, AuthSubject};
use crate::project::{Project, ProjectForm};

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Case-insensitive search over title, description and tech
    pub q: Option<String>,
}

pub async fn projects_list(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> ApiResult<Vec<Project>> {
    let projects = state.projects.list(query.q.as_deref()).await?;
    Ok(ApiResponse::success(projects))
}

pub async fn projects_create(
    AuthSubject(subject): AuthSubject,
    State(state): State<AppState>,
    form: ProjectForm,
) -> ApiResult<Project> {
    let project = state.projects.create(&subject, form).await?;
    Ok(ApiResponse::created(project))
}
