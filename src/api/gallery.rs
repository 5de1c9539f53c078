//! Gallery endpoints
//!
//! Public:
//! - GET /gallery - published images, optional event filter, pagination
//!
//! Admin area (id-addressed):
//! - GET    /admin-area/gallery
//! - POST   /admin-area/gallery/create
//! - GET    /admin-area/gallery/delete/{id} (confirmation fetch)
//! - PUT    /admin-area/gallery/edit/{id}
//! - DELETE /admin-area/gallery/delete/{id}

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::api::middleware::{ApiError, AppState};
use crate::api::responses::{GalleryImageResponse, MessageResponse};
use crate::models::{CreateGalleryImageInput, ListParams, UpdateGalleryImageInput};
use crate::services::GalleryServiceError;

/// Public gallery page size
const GALLERY_PAGE_SIZE: u32 = 12;
/// Admin gallery list page size
const ADMIN_PAGE_SIZE: u32 = 20;

/// Query parameters for the public gallery
#[derive(Debug, Deserialize)]
pub struct GalleryQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    /// Event ID filter
    pub event: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct AdminListQuery {
    #[serde(default = "default_page")]
    pub page: u32,
}

fn default_page() -> u32 {
    1
}

/// Paginated gallery response
#[derive(Debug, Serialize)]
pub struct GalleryListResponse {
    pub images: Vec<GalleryImageResponse>,
    pub total: i64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
}

/// Request body for adding a gallery image
#[derive(Debug, Deserialize)]
pub struct CreateGalleryImageRequest {
    pub title: String,
    pub description: Option<String>,
    /// Image path as returned by the upload endpoint
    pub image: String,
    pub event_id: Option<i64>,
    #[serde(default = "default_published")]
    pub published: bool,
}

fn default_published() -> bool {
    true
}

/// Request body for updating a gallery image
#[derive(Debug, Default, Deserialize)]
pub struct UpdateGalleryImageRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub event_id: Option<i64>,
    pub published: Option<bool>,
}

fn map_error(e: GalleryServiceError) -> ApiError {
    match e {
        GalleryServiceError::NotFound(id) => {
            ApiError::not_found(format!("Gallery image not found: {}", id))
        }
        GalleryServiceError::EventNotFound(id) => {
            ApiError::validation_error(format!("Event not found: {}", id))
        }
        GalleryServiceError::ValidationError(msg) => ApiError::validation_error(msg),
        GalleryServiceError::InternalError(e) => {
            tracing::error!("Gallery operation failed: {:#}", e);
            ApiError::internal_error("Internal error")
        }
    }
}

/// GET /gallery - public gallery listing
pub async fn list_public(
    State(state): State<AppState>,
    Query(query): Query<GalleryQuery>,
) -> Result<Json<GalleryListResponse>, ApiError> {
    let params = ListParams::new(query.page, GALLERY_PAGE_SIZE);
    let page = state
        .gallery_service
        .list_published(query.event, &params)
        .await
        .map_err(map_error)?;

    Ok(Json(GalleryListResponse {
        total: page.total,
        total_pages: page.total_pages(),
        images: page.items.into_iter().map(Into::into).collect(),
        page: params.page,
        page_size: GALLERY_PAGE_SIZE,
    }))
}

/// GET /admin-area/gallery - admin gallery listing
pub async fn admin_list(
    State(state): State<AppState>,
    Query(query): Query<AdminListQuery>,
) -> Result<Json<GalleryListResponse>, ApiError> {
    let params = ListParams::new(query.page, ADMIN_PAGE_SIZE);
    let page = state.gallery_service.list(&params).await.map_err(map_error)?;

    Ok(Json(GalleryListResponse {
        total: page.total,
        total_pages: page.total_pages(),
        images: page.items.into_iter().map(Into::into).collect(),
        page: params.page,
        page_size: ADMIN_PAGE_SIZE,
    }))
}

/// POST /admin-area/gallery/create - add an image to the gallery
pub async fn admin_create(
    State(state): State<AppState>,
    Json(body): Json<CreateGalleryImageRequest>,
) -> Result<(StatusCode, Json<GalleryImageResponse>), ApiError> {
    let image = state
        .gallery_service
        .create(CreateGalleryImageInput {
            title: body.title,
            description: body.description,
            image: body.image,
            event_id: body.event_id,
            published: body.published,
        })
        .await
        .map_err(map_error)?;

    Ok((StatusCode::CREATED, Json(image.into())))
}

/// GET /admin-area/gallery/delete/{id} - fetch an image for the delete
/// confirmation screen
pub async fn admin_get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<GalleryImageResponse>, ApiError> {
    let image = state
        .gallery_service
        .get_by_id(id)
        .await
        .map_err(map_error)?
        .ok_or_else(|| ApiError::not_found(format!("Gallery image not found: {}", id)))?;

    Ok(Json(image.into()))
}

/// PUT /admin-area/gallery/edit/{id} - update a gallery image
pub async fn admin_update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateGalleryImageRequest>,
) -> Result<Json<GalleryImageResponse>, ApiError> {
    let image = state
        .gallery_service
        .update(
            id,
            UpdateGalleryImageInput {
                title: body.title,
                description: body.description,
                image: body.image,
                event_id: body.event_id.map(Some),
                published: body.published,
            },
        )
        .await
        .map_err(map_error)?;

    Ok(Json(image.into()))
}

/// DELETE /admin-area/gallery/delete/{id} - delete a gallery image
pub async fn admin_delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.gallery_service.delete(id).await.map_err(map_error)?;
    Ok(Json(MessageResponse::new("Image deleted successfully")))
}
