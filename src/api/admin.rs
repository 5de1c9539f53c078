//! Admin dashboard, contact messages and user management
//!
//! - GET  /admin-area/dashboard - stats and recent activity
//! - GET  /admin-area/messages - contact message list + unread count
//! - POST /admin-area/messages/mark-read/{id}
//! - GET  /admin-area/users
//! - GET  /admin-area/users/delete/{id} (confirmation fetch)
//! - PUT  /admin-area/users/edit/{id}
//! - PUT  /admin-area/users/permissions/{id}
//! - DELETE /admin-area/users/delete/{id}

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::api::middleware::{ApiError, AppState, AuthenticatedUser};
use crate::api::responses::{
    ContactMessageResponse, EventResponse, MessageResponse, PostResponse, UserResponse,
};
use crate::models::{ListParams, UpdatePermissionsInput, UpdateUserInput, UserRole};
use crate::services::{ContactServiceError, UserServiceError};

/// Admin message list page size
const MESSAGES_PAGE_SIZE: u32 = 20;
/// Recent items shown on the dashboard
const DASHBOARD_RECENT: i64 = 5;

/// Dashboard statistics
#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub total_posts: i64,
    pub published_posts: i64,
    pub total_events: i64,
    pub total_images: i64,
    pub users: i64,
    pub unread_messages: i64,
}

/// Dashboard response
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub stats: DashboardStats,
    pub recent_posts: Vec<PostResponse>,
    pub upcoming_events: Vec<EventResponse>,
    pub recent_messages: Vec<ContactMessageResponse>,
}

/// Paginated message list response
#[derive(Debug, Serialize)]
pub struct MessagesResponse {
    pub messages: Vec<ContactMessageResponse>,
    pub total: i64,
    pub unread_count: i64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_page")]
    pub page: u32,
}

fn default_page() -> u32 {
    1
}

/// Request body for editing a user's details
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Request body for the permission screen
#[derive(Debug, Deserialize)]
pub struct UpdatePermissionsRequest {
    pub is_active: bool,
    pub role: String,
}

fn map_user_error(e: UserServiceError) -> ApiError {
    match e {
        UserServiceError::AuthenticationError(msg) => ApiError::unauthorized(msg),
        UserServiceError::ValidationError(msg) => ApiError::validation_error(msg),
        UserServiceError::UserExists(msg) => ApiError::conflict(msg),
        UserServiceError::NotFound(msg) => ApiError::not_found(msg),
        UserServiceError::InternalError(e) => {
            tracing::error!("User operation failed: {:#}", e);
            ApiError::internal_error("Internal error")
        }
    }
}

fn map_contact_error(e: ContactServiceError) -> ApiError {
    match e {
        ContactServiceError::NotFound(id) => {
            ApiError::not_found(format!("Message not found: {}", id))
        }
        ContactServiceError::ValidationError(msg) => ApiError::validation_error(msg),
        ContactServiceError::InternalError(e) => {
            tracing::error!("Contact operation failed: {:#}", e);
            ApiError::internal_error("Internal error")
        }
    }
}

/// GET /admin-area/dashboard - dashboard stats and recent activity
pub async fn dashboard(
    State(state): State<AppState>,
) -> Result<Json<DashboardResponse>, ApiError> {
    let (total_posts, published_posts) = state
        .post_service
        .counts()
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;
    let total_events = state
        .event_service
        .count()
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;
    let total_images = state
        .gallery_service
        .count()
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;
    let users = state
        .user_service
        .count()
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;
    let unread_messages = state
        .contact_service
        .count_unread()
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;

    let recent_posts = state
        .post_service
        .list_recent(DASHBOARD_RECENT)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?
        .into_iter()
        .map(Into::into)
        .collect();
    let upcoming_events = state
        .event_service
        .list_upcoming(DASHBOARD_RECENT)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?
        .into_iter()
        .map(Into::into)
        .collect();
    let recent_messages = state
        .contact_service
        .list_recent_unread(DASHBOARD_RECENT)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(Json(DashboardResponse {
        stats: DashboardStats {
            total_posts,
            published_posts,
            total_events,
            total_images,
            users,
            unread_messages,
        },
        recent_posts,
        upcoming_events,
        recent_messages,
    }))
}

/// GET /admin-area/messages - contact message list
pub async fn list_messages(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<MessagesResponse>, ApiError> {
    let params = ListParams::new(query.page, MESSAGES_PAGE_SIZE);
    let page = state
        .contact_service
        .list(&params)
        .await
        .map_err(map_contact_error)?;
    let unread_count = state
        .contact_service
        .count_unread()
        .await
        .map_err(map_contact_error)?;

    Ok(Json(MessagesResponse {
        total: page.total,
        total_pages: page.total_pages(),
        messages: page.items.into_iter().map(Into::into).collect(),
        unread_count,
        page: params.page,
        page_size: MESSAGES_PAGE_SIZE,
    }))
}

/// POST /admin-area/messages/mark-read/{id} - mark a message read
///
/// Marking an already-read message succeeds and changes nothing.
pub async fn mark_message_read(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ContactMessageResponse>, ApiError> {
    let message = state
        .contact_service
        .mark_read(id)
        .await
        .map_err(map_contact_error)?;

    Ok(Json(message.into()))
}

/// GET /admin-area/users - user list
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = state
        .user_service
        .list()
        .await
        .map_err(map_user_error)?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(Json(users))
}

/// GET /admin-area/users/delete/{id} - fetch a user for the delete
/// confirmation screen
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state
        .user_service
        .get_by_id(id)
        .await
        .map_err(map_user_error)?
        .ok_or_else(|| ApiError::not_found(format!("User not found: {}", id)))?;

    Ok(Json(user.into()))
}

/// PUT /admin-area/users/edit/{id} - update a user's details
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state
        .user_service
        .update(
            id,
            UpdateUserInput {
                username: body.username,
                email: body.email,
                first_name: body.first_name,
                last_name: body.last_name,
            },
        )
        .await
        .map_err(map_user_error)?;

    Ok(Json(user.into()))
}

/// PUT /admin-area/users/permissions/{id} - permission screen
pub async fn update_permissions(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<UpdatePermissionsRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let role = UserRole::from_str(&body.role)
        .map_err(|_| ApiError::validation_error(format!("Invalid role: {}", body.role)))?;

    let user = state
        .user_service
        .update_permissions(
            id,
            UpdatePermissionsInput {
                is_active: body.is_active,
                role,
            },
        )
        .await
        .map_err(map_user_error)?;

    Ok(Json(user.into()))
}

/// DELETE /admin-area/users/delete/{id} - delete a user
///
/// Admins cannot delete their own account while logged into it.
pub async fn delete_user(
    State(state): State<AppState>,
    AuthenticatedUser(current): AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    if current.id == id {
        return Err(ApiError::validation_error(
            "You cannot delete your own account",
        ));
    }

    state.user_service.delete(id).await.map_err(map_user_error)?;
    Ok(Json(MessageResponse::new("User deleted successfully")))
}
