//! Tag endpoints
//!
//! Public:
//! - GET /tags - flat list
//!
//! Admin area:
//! - GET    /admin-area/tags
//! - POST   /admin-area/tags/create
//! - PUT    /admin-area/tags/edit/{id}
//! - DELETE /admin-area/tags/delete/{id}

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::api::middleware::{ApiError, AppState};
use crate::api::responses::{MessageResponse, TagInfo};
use crate::services::TagServiceError;

/// Request body for creating or renaming a tag
#[derive(Debug, Deserialize)]
pub struct TagRequest {
    pub name: String,
}

fn map_error(e: TagServiceError) -> ApiError {
    match e {
        TagServiceError::DuplicateName(name) => {
            ApiError::conflict(format!("Tag name already exists: {}", name))
        }
        TagServiceError::NotFound(msg) => ApiError::not_found(msg),
        TagServiceError::ValidationError(msg) => ApiError::validation_error(msg),
        TagServiceError::InternalError(e) => {
            tracing::error!("Tag operation failed: {:#}", e);
            ApiError::internal_error("Internal error")
        }
    }
}

/// GET /tags - public tag list
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<TagInfo>>, ApiError> {
    let tags = state
        .tag_service
        .list()
        .await
        .map_err(map_error)?
        .into_iter()
        .map(TagInfo::from)
        .collect();

    Ok(Json(tags))
}

/// POST /admin-area/tags/create - create a tag
pub async fn admin_create(
    State(state): State<AppState>,
    Json(body): Json<TagRequest>,
) -> Result<(StatusCode, Json<TagInfo>), ApiError> {
    let tag = state
        .tag_service
        .create(&body.name)
        .await
        .map_err(map_error)?;

    Ok((StatusCode::CREATED, Json(tag.into())))
}

/// PUT /admin-area/tags/edit/{id} - rename a tag
pub async fn admin_update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<TagRequest>,
) -> Result<Json<TagInfo>, ApiError> {
    let tag = state
        .tag_service
        .update(id, &body.name)
        .await
        .map_err(map_error)?;

    Ok(Json(tag.into()))
}

/// DELETE /admin-area/tags/delete/{id} - delete a tag
pub async fn admin_delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.tag_service.delete(id).await.map_err(map_error)?;
    Ok(Json(MessageResponse::new("Tag deleted successfully")))
}
