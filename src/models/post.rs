//! Blog post model
//!
//! This module provides:
//! - `Post` entity representing a blog post
//! - `PostStatus` enum for publication states
//! - Input types for creating and updating posts
//! - Pagination types shared by all list queries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Blog post entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    /// Unique identifier
    pub id: i64,
    /// URL-friendly slug
    pub slug: String,
    /// Post title
    pub title: String,
    /// Short summary shown in list views (max 300 chars)
    pub excerpt: String,
    /// Markdown content
    pub content: String,
    /// Rendered HTML content
    pub content_html: String,
    /// Author user ID (kept nullable so deleting an author keeps the post)
    pub author_id: Option<i64>,
    /// Category ID
    pub category_id: i64,
    /// Publication status
    pub status: PostStatus,
    /// Publication timestamp (drives public ordering)
    pub published_date: DateTime<Utc>,
    /// Estimated reading time label
    pub read_time: String,
    /// Cover image path under the media root
    pub image: Option<String>,
    /// View count
    #[serde(default)]
    pub views: i64,
    /// Like count
    #[serde(default)]
    pub likes: i64,
    /// Whether the post is highlighted on public pages
    #[serde(default)]
    pub featured: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Post publication status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    /// Draft - not visible to the public
    Draft,
    /// Published - visible to the public
    Published,
    /// Archived - hidden but not deleted
    Archived,
}

impl Default for PostStatus {
    fn default() -> Self {
        Self::Published
    }
}

impl PostStatus {
    /// Convert status to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Published => "published",
            PostStatus::Archived => "archived",
        }
    }

    /// Parse status from database string representation
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "draft" => Some(PostStatus::Draft),
            "published" => Some(PostStatus::Published),
            "archived" => Some(PostStatus::Archived),
            _ => None,
        }
    }
}

impl std::fmt::Display for PostStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Input for creating a new post
#[derive(Debug, Clone)]
pub struct CreatePostInput {
    /// Post title
    pub title: String,
    /// Explicit slug (optional, generated from the title when absent)
    pub slug: Option<String>,
    /// Short summary
    pub excerpt: String,
    /// Markdown content
    pub content: String,
    /// Author user ID
    pub author_id: Option<i64>,
    /// Category ID
    pub category_id: i64,
    /// Publication status (defaults to Published)
    pub status: Option<PostStatus>,
    /// Estimated reading time label (defaults to "5 min")
    pub read_time: Option<String>,
    /// Cover image path
    pub image: Option<String>,
    /// Highlight on public pages
    pub featured: bool,
    /// Tag IDs to attach
    pub tag_ids: Vec<i64>,
}

/// Input for updating an existing post
#[derive(Debug, Clone, Default)]
pub struct UpdatePostInput {
    /// New title (optional; regenerates the slug when changed)
    pub title: Option<String>,
    /// New excerpt (optional)
    pub excerpt: Option<String>,
    /// New markdown content (optional)
    pub content: Option<String>,
    /// New category ID (optional)
    pub category_id: Option<i64>,
    /// New status (optional)
    pub status: Option<PostStatus>,
    /// New reading time label (optional)
    pub read_time: Option<String>,
    /// New cover image path (optional)
    pub image: Option<String>,
    /// New featured flag (optional)
    pub featured: Option<bool>,
    /// Replacement tag set (optional)
    pub tag_ids: Option<Vec<i64>>,
}

/// Filters for the public blog listing
#[derive(Debug, Clone, Default)]
pub struct PostFilter {
    /// Free-text search over title, excerpt, content and author name
    pub search: Option<String>,
    /// Category name filter
    pub category: Option<String>,
}

/// Pagination parameters for list queries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListParams {
    /// Page number (1-indexed)
    pub page: u32,
    /// Number of items per page
    pub per_page: u32,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 10,
        }
    }
}

impl ListParams {
    /// Create new pagination parameters
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.clamp(1, 100),
        }
    }

    /// Calculate the offset for database queries
    pub fn offset(&self) -> i64 {
        ((self.page.saturating_sub(1)) * self.per_page) as i64
    }

    /// Get the limit for database queries
    pub fn limit(&self) -> i64 {
        self.per_page as i64
    }
}

/// Paginated result container
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagedResult<T> {
    /// Items in the current page
    pub items: Vec<T>,
    /// Total number of items across all pages
    pub total: i64,
    /// Current page number (1-indexed)
    pub page: u32,
    /// Number of items per page
    pub per_page: u32,
}

impl<T> PagedResult<T> {
    /// Create a new paginated result
    pub fn new(items: Vec<T>, total: i64, params: &ListParams) -> Self {
        Self {
            items,
            total,
            page: params.page,
            per_page: params.per_page,
        }
    }

    /// Calculate the total number of pages
    pub fn total_pages(&self) -> u32 {
        if self.per_page == 0 {
            return 0;
        }
        ((self.total as u32) + self.per_page - 1) / self.per_page
    }

    /// Check if there is a next page
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    /// Check if there is a previous page
    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    /// Check if the result is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get the number of items in the current page
    pub fn len(&self) -> usize {
        self.items.len()
    }
}

impl<T> Default for PagedResult<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            page: 1,
            per_page: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_status_round_trip() {
        assert_eq!(PostStatus::from_str("draft"), Some(PostStatus::Draft));
        assert_eq!(PostStatus::from_str("PUBLISHED"), Some(PostStatus::Published));
        assert_eq!(PostStatus::from_str("archived"), Some(PostStatus::Archived));
        assert_eq!(PostStatus::from_str("deleted"), None);
        assert_eq!(PostStatus::Published.as_str(), "published");
    }

    #[test]
    fn test_list_params_clamping() {
        let params = ListParams::new(0, 500);
        assert_eq!(params.page, 1);
        assert_eq!(params.per_page, 100);
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn test_list_params_offset() {
        let params = ListParams::new(3, 9);
        assert_eq!(params.offset(), 18);
        assert_eq!(params.limit(), 9);
    }

    #[test]
    fn test_paged_result_total_pages() {
        let params = ListParams::new(1, 9);
        let result: PagedResult<i32> = PagedResult::new(vec![1, 2, 3], 19, &params);
        assert_eq!(result.total_pages(), 3);
        assert!(result.has_next());
        assert!(!result.has_prev());
    }
}
