//! Blog post endpoints
//!
//! Public:
//! - GET /blog - published posts with search, category filter, pagination
//! - GET /blog/{slug} - published post detail (increments the view count)
//! - POST /blog/{slug}/like - like a published post
//!
//! Admin area:
//! - GET    /admin-area/posts
//! - POST   /admin-area/posts/create
//! - GET    /admin-area/posts/delete/{slug} (confirmation fetch)
//! - PUT    /admin-area/posts/edit/{slug}
//! - DELETE /admin-area/posts/delete/{slug}

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::api::middleware::{ApiError, AppState, AuthenticatedUser};
use crate::api::responses::{CategoryInfo, MessageResponse, PostResponse};
use crate::models::{
    CreatePostInput, ListParams, Post, PostFilter, PostStatus, UpdatePostInput,
};
use crate::services::PostServiceError;

/// Public blog page size
const BLOG_PAGE_SIZE: u32 = 9;
/// Featured posts shown on the blog page
const FEATURED_POSTS: i64 = 3;
/// Admin post list page size
const ADMIN_PAGE_SIZE: u32 = 20;

/// Query parameters for the public blog listing
#[derive(Debug, Deserialize)]
pub struct BlogQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    /// Free-text search over title, excerpt, content and author name
    pub search: Option<String>,
    /// Category name filter ("Todos" disables it, as the original UI sends)
    pub category: Option<String>,
}

/// Query parameters for the admin listing
#[derive(Debug, Deserialize)]
pub struct AdminListQuery {
    #[serde(default = "default_page")]
    pub page: u32,
}

fn default_page() -> u32 {
    1
}

/// Response for the public blog page
#[derive(Debug, Serialize)]
pub struct BlogPageResponse {
    pub posts: Vec<PostResponse>,
    pub total: i64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
    pub categories: Vec<CategoryInfo>,
    pub featured_posts: Vec<PostResponse>,
}

/// Response for the admin post list
#[derive(Debug, Serialize)]
pub struct PostListResponse {
    pub posts: Vec<PostResponse>,
    pub total: i64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
}

/// Request body for creating a post
#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub slug: Option<String>,
    #[serde(default)]
    pub excerpt: String,
    pub content: String,
    pub category_id: i64,
    pub status: Option<String>,
    pub read_time: Option<String>,
    pub image: Option<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub tag_ids: Vec<i64>,
}

/// Request body for updating a post
#[derive(Debug, Default, Deserialize)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub category_id: Option<i64>,
    pub status: Option<String>,
    pub read_time: Option<String>,
    pub image: Option<String>,
    pub featured: Option<bool>,
    pub tag_ids: Option<Vec<i64>>,
}

fn parse_status(status: Option<&str>) -> Result<Option<PostStatus>, ApiError> {
    match status {
        None => Ok(None),
        Some(s) => PostStatus::from_str(s)
            .map(Some)
            .ok_or_else(|| ApiError::validation_error(format!("Invalid post status: {}", s))),
    }
}

fn map_error(e: PostServiceError) -> ApiError {
    match e {
        PostServiceError::NotFound(slug) => {
            ApiError::not_found(format!("Post not found: {}", slug))
        }
        PostServiceError::CategoryNotFound(id) => {
            ApiError::validation_error(format!("Category not found: {}", id))
        }
        PostServiceError::ValidationError(msg) => ApiError::validation_error(msg),
        PostServiceError::InternalError(e) => {
            tracing::error!("Post operation failed: {:#}", e);
            ApiError::internal_error("Internal error")
        }
    }
}

async fn enrich(state: &AppState, post: Post) -> PostResponse {
    let category = state
        .category_service
        .get_by_id(post.category_id)
        .await
        .ok()
        .flatten();
    let tags = state
        .tag_service
        .list_for_post(post.id)
        .await
        .unwrap_or_default();

    PostResponse::from(post).with_category(category).with_tags(tags)
}

/// GET /blog - public blog listing
pub async fn list_public(
    State(state): State<AppState>,
    Query(query): Query<BlogQuery>,
) -> Result<Json<BlogPageResponse>, ApiError> {
    let filter = PostFilter {
        search: query.search.filter(|s| !s.trim().is_empty()),
        category: query
            .category
            .filter(|c| !c.trim().is_empty() && c != "Todos"),
    };
    let params = ListParams::new(query.page, BLOG_PAGE_SIZE);

    let page = state
        .post_service
        .list_published(&filter, &params)
        .await
        .map_err(map_error)?;

    let total = page.total;
    let total_pages = page.total_pages();

    let mut posts = Vec::with_capacity(page.items.len());
    for post in page.items {
        posts.push(enrich(&state, post).await);
    }

    let featured = state
        .post_service
        .list_featured(FEATURED_POSTS)
        .await
        .map_err(map_error)?;
    let mut featured_posts = Vec::with_capacity(featured.len());
    for post in featured {
        featured_posts.push(enrich(&state, post).await);
    }

    let categories = state
        .category_service
        .list()
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?
        .into_iter()
        .map(CategoryInfo::from)
        .collect();

    Ok(Json(BlogPageResponse {
        posts,
        total,
        page: params.page,
        page_size: BLOG_PAGE_SIZE,
        total_pages,
        categories,
        featured_posts,
    }))
}

/// GET /blog/{slug} - public post detail
///
/// Only published posts resolve; each fetch adds one view.
pub async fn get_public(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<PostResponse>, ApiError> {
    let post = state
        .post_service
        .get_published_by_slug(&slug)
        .await
        .map_err(map_error)?;

    Ok(Json(enrich(&state, post).await))
}

/// POST /blog/{slug}/like - like a post
pub async fn like(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<LikeResponse>, ApiError> {
    let likes = state.post_service.like(&slug).await.map_err(map_error)?;
    Ok(Json(LikeResponse { likes }))
}

/// Response for the like endpoint
#[derive(Debug, Serialize)]
pub struct LikeResponse {
    pub likes: i64,
}

/// GET /admin-area/posts - admin post list
pub async fn admin_list(
    State(state): State<AppState>,
    Query(query): Query<AdminListQuery>,
) -> Result<Json<PostListResponse>, ApiError> {
    let params = ListParams::new(query.page, ADMIN_PAGE_SIZE);
    let page = state.post_service.list(&params).await.map_err(map_error)?;

    let total = page.total;
    let total_pages = page.total_pages();

    let mut posts = Vec::with_capacity(page.items.len());
    for post in page.items {
        posts.push(enrich(&state, post).await);
    }

    Ok(Json(PostListResponse {
        posts,
        total,
        page: params.page,
        page_size: ADMIN_PAGE_SIZE,
        total_pages,
    }))
}

/// POST /admin-area/posts/create - create a post
///
/// The authenticated admin becomes the author.
pub async fn admin_create(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(body): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<PostResponse>), ApiError> {
    let status = parse_status(body.status.as_deref())?;

    let input = CreatePostInput {
        title: body.title,
        slug: body.slug,
        excerpt: body.excerpt,
        content: body.content,
        author_id: Some(user.id),
        category_id: body.category_id,
        status,
        read_time: body.read_time,
        image: body.image,
        featured: body.featured,
        tag_ids: body.tag_ids,
    };

    let post = state.post_service.create(input).await.map_err(map_error)?;

    Ok((StatusCode::CREATED, Json(enrich(&state, post).await)))
}

/// GET /admin-area/posts/delete/{slug} - fetch a post for the delete
/// confirmation screen
pub async fn admin_get(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<PostResponse>, ApiError> {
    let post = state
        .post_service
        .get_by_slug(&slug)
        .await
        .map_err(map_error)?
        .ok_or_else(|| ApiError::not_found(format!("Post not found: {}", slug)))?;

    Ok(Json(enrich(&state, post).await))
}

/// PUT /admin-area/posts/edit/{slug} - update a post
pub async fn admin_update(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(body): Json<UpdatePostRequest>,
) -> Result<Json<PostResponse>, ApiError> {
    let status = parse_status(body.status.as_deref())?;

    let input = UpdatePostInput {
        title: body.title,
        excerpt: body.excerpt,
        content: body.content,
        category_id: body.category_id,
        status,
        read_time: body.read_time,
        image: body.image,
        featured: body.featured,
        tag_ids: body.tag_ids,
    };

    let post = state
        .post_service
        .update(&slug, input)
        .await
        .map_err(map_error)?;

    Ok(Json(enrich(&state, post).await))
}

/// DELETE /admin-area/posts/delete/{slug} - delete a post
pub async fn admin_delete(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.post_service.delete(&slug).await.map_err(map_error)?;
    Ok(Json(MessageResponse::new("Post deleted successfully")))
}
