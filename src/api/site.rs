//! Home page endpoint
//!
//! - GET / - featured events, recent posts and recent gallery images for
//!   the landing page

use axum::{extract::State, Json};
use serde::Serialize;

use crate::api::middleware::{ApiError, AppState};
use crate::api::responses::{EventResponse, GalleryImageResponse, PostResponse};
use crate::models::{ListParams, PostFilter};

/// Featured events shown on the home page
const HOME_FEATURED_EVENTS: i64 = 2;
/// Recent posts shown on the home page
const HOME_RECENT_POSTS: u32 = 3;
/// Recent gallery images shown on the home page
const HOME_RECENT_IMAGES: u32 = 6;

/// Home page payload
#[derive(Debug, Serialize)]
pub struct HomeResponse {
    pub featured_events: Vec<EventResponse>,
    pub recent_posts: Vec<PostResponse>,
    pub recent_gallery_images: Vec<GalleryImageResponse>,
}

/// GET / - home page data
pub async fn home(State(state): State<AppState>) -> Result<Json<HomeResponse>, ApiError> {
    let featured_events = state
        .event_service
        .list_featured_upcoming(HOME_FEATURED_EVENTS)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?
        .into_iter()
        .map(Into::into)
        .collect();

    let recent_posts = state
        .post_service
        .list_published(&PostFilter::default(), &ListParams::new(1, HOME_RECENT_POSTS))
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?
        .items
        .into_iter()
        .map(Into::into)
        .collect();

    let recent_gallery_images = state
        .gallery_service
        .list_published(None, &ListParams::new(1, HOME_RECENT_IMAGES))
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?
        .items
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(Json(HomeResponse {
        featured_events,
        recent_posts,
        recent_gallery_images,
    }))
}
