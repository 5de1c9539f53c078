//! Category endpoints
//!
//! Public:
//! - GET /categories - flat list for filter UIs
//!
//! Admin area (id-addressed, as the original admin screens were):
//! - GET    /admin-area/categories
//! - POST   /admin-area/categories/create
//! - GET    /admin-area/categories/delete/{id} (confirmation fetch)
//! - PUT    /admin-area/categories/edit/{id}
//! - DELETE /admin-area/categories/delete/{id}

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::api::middleware::{ApiError, AppState};
use crate::api::responses::{CategoryInfo, MessageResponse};
use crate::models::{CreateCategoryInput, UpdateCategoryInput};
use crate::services::CategoryServiceError;

/// Request body for creating a category
#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub slug: Option<String>,
}

/// Request body for updating a category
#[derive(Debug, Default, Deserialize)]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    pub slug: Option<String>,
}

fn map_error(e: CategoryServiceError) -> ApiError {
    match e {
        CategoryServiceError::NotFound(msg) => ApiError::not_found(msg),
        CategoryServiceError::ValidationError(msg) => ApiError::validation_error(msg),
        CategoryServiceError::InternalError(e) => {
            tracing::error!("Category operation failed: {:#}", e);
            ApiError::internal_error("Internal error")
        }
    }
}

/// GET /categories - public category list
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<CategoryInfo>>, ApiError> {
    let categories = state
        .category_service
        .list()
        .await
        .map_err(map_error)?
        .into_iter()
        .map(CategoryInfo::from)
        .collect();

    Ok(Json(categories))
}

/// POST /admin-area/categories/create - create a category
pub async fn admin_create(
    State(state): State<AppState>,
    Json(body): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<CategoryInfo>), ApiError> {
    let category = state
        .category_service
        .create(CreateCategoryInput {
            name: body.name,
            slug: body.slug,
        })
        .await
        .map_err(map_error)?;

    Ok((StatusCode::CREATED, Json(category.into())))
}

/// GET /admin-area/categories/delete/{id} - fetch a category for the
/// delete confirmation screen
pub async fn admin_get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<CategoryInfo>, ApiError> {
    let category = state
        .category_service
        .get_by_id(id)
        .await
        .map_err(map_error)?
        .ok_or_else(|| ApiError::not_found(format!("Category not found: {}", id)))?;

    Ok(Json(category.into()))
}

/// PUT /admin-area/categories/edit/{id} - update a category
pub async fn admin_update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateCategoryRequest>,
) -> Result<Json<CategoryInfo>, ApiError> {
    let category = state
        .category_service
        .update(
            id,
            UpdateCategoryInput {
                name: body.name,
                slug: body.slug,
            },
        )
        .await
        .map_err(map_error)?;

    Ok(Json(category.into()))
}

/// DELETE /admin-area/categories/delete/{id} - delete a category
pub async fn admin_delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.category_service.delete(id).await.map_err(map_error)?;
    Ok(Json(MessageResponse::new("Category deleted successfully")))
}
