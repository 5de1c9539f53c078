//! Project model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Project entity for ongoing NEABI initiatives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Unique identifier
    pub id: i64,
    /// URL-friendly slug
    pub slug: String,
    /// Project title
    pub title: String,
    /// Project description
    pub description: String,
    /// Cover image path under the media root
    pub image: Option<String>,
    /// Category ID (optional)
    pub category_id: Option<i64>,
    /// External link for joining or registering
    pub link_to_join: Option<String>,
    /// Active flag - inactive projects are hidden from the public list
    pub is_active: bool,
    /// Whether the project is highlighted on public pages
    #[serde(default)]
    pub featured: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new project
#[derive(Debug, Clone)]
pub struct CreateProjectInput {
    pub title: String,
    /// Explicit slug (optional, generated from the title when absent)
    pub slug: Option<String>,
    pub description: String,
    pub image: Option<String>,
    pub category_id: Option<i64>,
    pub link_to_join: Option<String>,
    pub is_active: bool,
    pub featured: bool,
    pub tag_ids: Vec<i64>,
}

/// Input for updating an existing project
#[derive(Debug, Clone, Default)]
pub struct UpdateProjectInput {
    /// New title (optional; regenerates the slug when changed)
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub category_id: Option<Option<i64>>,
    pub link_to_join: Option<Option<String>>,
    pub is_active: Option<bool>,
    pub featured: Option<bool>,
    pub tag_ids: Option<Vec<i64>>,
}
