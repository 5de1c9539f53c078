//! Category model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category entity shared by posts, events and projects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier
    pub id: i64,
    /// Category name
    pub name: String,
    /// URL-friendly slug (unique)
    pub slug: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Category {
    /// Create a new category with the given name and slug.
    pub fn new(name: String, slug: String) -> Self {
        Self {
            id: 0, // Will be set by the database
            name,
            slug,
            created_at: Utc::now(),
        }
    }
}

/// Input for creating a new category
#[derive(Debug, Clone)]
pub struct CreateCategoryInput {
    /// Category name (required)
    pub name: String,
    /// URL-friendly slug (optional, generated from name if not provided)
    pub slug: Option<String>,
}

impl CreateCategoryInput {
    /// Create a new category input with just a name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slug: None,
        }
    }

    /// Set the slug
    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }
}

/// Input for updating a category
#[derive(Debug, Clone, Default)]
pub struct UpdateCategoryInput {
    /// New name (optional)
    pub name: Option<String>,
    /// New slug (optional; normalized and disambiguated before saving)
    pub slug: Option<String>,
}
