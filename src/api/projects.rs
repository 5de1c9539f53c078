//! Project endpoints
//!
//! Public:
//! - GET /projects - active projects, newest first
//! - GET /projects/{slug} - project detail
//!
//! Admin area (id-addressed):
//! - GET    /admin-area/projects
//! - POST   /admin-area/projects/create
//! - GET    /admin-area/projects/delete/{id} (confirmation fetch)
//! - PUT    /admin-area/projects/edit/{id}
//! - DELETE /admin-area/projects/delete/{id}

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::api::middleware::{ApiError, AppState};
use crate::api::responses::{MessageResponse, ProjectResponse};
use crate::models::{CreateProjectInput, Project, UpdateProjectInput};
use crate::services::ProjectServiceError;

/// Request body for creating a project
#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    pub title: String,
    pub slug: Option<String>,
    pub description: String,
    pub image: Option<String>,
    pub category_id: Option<i64>,
    pub link_to_join: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub tag_ids: Vec<i64>,
}

fn default_active() -> bool {
    true
}

/// Request body for updating a project
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProjectRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub category_id: Option<i64>,
    pub link_to_join: Option<String>,
    pub is_active: Option<bool>,
    pub featured: Option<bool>,
    pub tag_ids: Option<Vec<i64>>,
}

fn map_error(e: ProjectServiceError) -> ApiError {
    match e {
        ProjectServiceError::NotFound(msg) => ApiError::not_found(msg),
        ProjectServiceError::ValidationError(msg) => ApiError::validation_error(msg),
        ProjectServiceError::InternalError(e) => {
            tracing::error!("Project operation failed: {:#}", e);
            ApiError::internal_error("Internal error")
        }
    }
}

async fn enrich(state: &AppState, project: Project) -> ProjectResponse {
    let category = match project.category_id {
        Some(id) => state.category_service.get_by_id(id).await.ok().flatten(),
        None => None,
    };
    let tags = state
        .tag_service
        .list_for_project(project.id)
        .await
        .unwrap_or_default();

    ProjectResponse::from(project)
        .with_category(category)
        .with_tags(tags)
}

/// GET /projects - public project list
pub async fn list_public(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProjectResponse>>, ApiError> {
    let projects = state.project_service.list_active().await.map_err(map_error)?;

    let mut out = Vec::with_capacity(projects.len());
    for project in projects {
        out.push(enrich(&state, project).await);
    }

    Ok(Json(out))
}

/// GET /projects/{slug} - public project detail
pub async fn get_public(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ProjectResponse>, ApiError> {
    let project = state
        .project_service
        .get_by_slug(&slug)
        .await
        .map_err(map_error)?
        .ok_or_else(|| ApiError::not_found(format!("Project not found: {}", slug)))?;

    Ok(Json(enrich(&state, project).await))
}

/// GET /admin-area/projects - admin project list
pub async fn admin_list(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProjectResponse>>, ApiError> {
    let projects = state.project_service.list().await.map_err(map_error)?;

    let mut out = Vec::with_capacity(projects.len());
    for project in projects {
        out.push(enrich(&state, project).await);
    }

    Ok(Json(out))
}

/// POST /admin-area/projects/create - create a project
pub async fn admin_create(
    State(state): State<AppState>,
    Json(body): Json<CreateProjectRequest>,
) -> Result<(StatusCode, Json<ProjectResponse>), ApiError> {
    let input = CreateProjectInput {
        title: body.title,
        slug: body.slug,
        description: body.description,
        image: body.image,
        category_id: body.category_id,
        link_to_join: body.link_to_join,
        is_active: body.is_active,
        featured: body.featured,
        tag_ids: body.tag_ids,
    };

    let project = state.project_service.create(input).await.map_err(map_error)?;

    Ok((StatusCode::CREATED, Json(enrich(&state, project).await)))
}

/// GET /admin-area/projects/delete/{id} - fetch a project for the delete
/// confirmation screen
pub async fn admin_get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ProjectResponse>, ApiError> {
    let project = state
        .project_service
        .get_by_id(id)
        .await
        .map_err(map_error)?
        .ok_or_else(|| ApiError::not_found(format!("Project not found: {}", id)))?;

    Ok(Json(enrich(&state, project).await))
}

/// PUT /admin-area/projects/edit/{id} - update a project
pub async fn admin_update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateProjectRequest>,
) -> Result<Json<ProjectResponse>, ApiError> {
    let input = UpdateProjectInput {
        title: body.title,
        description: body.description,
        image: body.image,
        category_id: body.category_id.map(Some),
        link_to_join: body.link_to_join.map(Some),
        is_active: body.is_active,
        featured: body.featured,
        tag_ids: body.tag_ids,
    };

    let project = state
        .project_service
        .update(id, input)
        .await
        .map_err(map_error)?;

    Ok(Json(enrich(&state, project).await))
}

/// DELETE /admin-area/projects/delete/{id} - delete a project
pub async fn admin_delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.project_service.delete(id).await.map_err(map_error)?;
    Ok(Json(MessageResponse::new("Project deleted successfully")))
}
