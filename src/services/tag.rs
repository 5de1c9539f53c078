//! Tag service
//!
//! Business logic for tags. Tag names are unique; slugs derive from the
//! name with the usual suffix disambiguation.

use crate::cache::{Cache, CacheLayer};
use crate::db::repositories::TagRepository;
use crate::models::Tag;
use crate::services::slug::{candidate, slugify};
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;

const TAG_CACHE_TTL_SECS: u64 = 3600;
const CACHE_KEY_TAG_LIST: &str = "tag:list";

/// Error types for tag service operations
#[derive(Debug, thiserror::Error)]
pub enum TagServiceError {
    /// Tag name already exists
    #[error("Tag name already exists: {0}")]
    DuplicateName(String),

    /// Tag not found
    #[error("Tag not found: {0}")]
    NotFound(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Tag service
pub struct TagService {
    repo: Arc<dyn TagRepository>,
    cache: Arc<Cache>,
    cache_ttl: Duration,
}

impl TagService {
    pub fn new(repo: Arc<dyn TagRepository>, cache: Arc<Cache>) -> Self {
        Self {
            repo,
            cache,
            cache_ttl: Duration::from_secs(TAG_CACHE_TTL_SECS),
        }
    }

    /// Create a new tag.
    pub async fn create(&self, name: &str) -> Result<Tag, TagServiceError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TagServiceError::ValidationError(
                "Tag name cannot be empty".to_string(),
            ));
        }

        if self
            .repo
            .exists_by_name(name)
            .await
            .context("Failed to check tag name")?
        {
            return Err(TagServiceError::DuplicateName(name.to_string()));
        }

        let base = slugify(name);
        if base.is_empty() {
            return Err(TagServiceError::ValidationError(
                "Tag name does not produce a valid slug".to_string(),
            ));
        }
        let slug = self.unique_slug(&base, None).await?;

        let created = self
            .repo
            .create(&Tag::new(name.to_string(), slug))
            .await
            .context("Failed to create tag")?;

        let _ = self.cache.delete(CACHE_KEY_TAG_LIST).await;

        Ok(created)
    }

    /// Get tag by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Tag>, TagServiceError> {
        self.repo
            .get_by_id(id)
            .await
            .context("Failed to get tag")
            .map_err(Into::into)
    }

    /// List all tags ordered by name.
    pub async fn list(&self) -> Result<Vec<Tag>, TagServiceError> {
        if let Some(list) = self
            .cache
            .get::<Vec<Tag>>(CACHE_KEY_TAG_LIST)
            .await
            .ok()
            .flatten()
        {
            return Ok(list);
        }

        let list = self.repo.list().await.context("Failed to list tags")?;
        let _ = self.cache.set(CACHE_KEY_TAG_LIST, &list, self.cache_ttl).await;

        Ok(list)
    }

    /// Rename a tag. The slug follows the new name.
    pub async fn update(&self, id: i64, name: &str) -> Result<Tag, TagServiceError> {
        let mut tag = self
            .repo
            .get_by_id(id)
            .await
            .context("Failed to get tag")?
            .ok_or_else(|| TagServiceError::NotFound(format!("Tag with ID {} not found", id)))?;

        let name = name.trim();
        if name.is_empty() {
            return Err(TagServiceError::ValidationError(
                "Tag name cannot be empty".to_string(),
            ));
        }

        if name != tag.name {
            if self
                .repo
                .exists_by_name(name)
                .await
                .context("Failed to check tag name")?
            {
                return Err(TagServiceError::DuplicateName(name.to_string()));
            }
            tag.name = name.to_string();
            tag.slug = self.unique_slug(&slugify(name), Some(id)).await?;
        }

        let updated = self.repo.update(&tag).await.context("Failed to update tag")?;

        let _ = self.cache.delete(CACHE_KEY_TAG_LIST).await;

        Ok(updated)
    }

    /// Delete a tag. Join-table rows disappear with it.
    pub async fn delete(&self, id: i64) -> Result<(), TagServiceError> {
        if self
            .repo
            .get_by_id(id)
            .await
            .context("Failed to get tag")?
            .is_none()
        {
            return Err(TagServiceError::NotFound(format!(
                "Tag with ID {} not found",
                id
            )));
        }

        self.repo.delete(id).await.context("Failed to delete tag")?;
        let _ = self.cache.delete(CACHE_KEY_TAG_LIST).await;

        Ok(())
    }

    /// Tags attached to a post.
    pub async fn list_for_post(&self, post_id: i64) -> Result<Vec<Tag>, TagServiceError> {
        self.repo
            .list_for_post(post_id)
            .await
            .context("Failed to list post tags")
            .map_err(Into::into)
    }

    /// Tags attached to an event.
    pub async fn list_for_event(&self, event_id: i64) -> Result<Vec<Tag>, TagServiceError> {
        self.repo
            .list_for_event(event_id)
            .await
            .context("Failed to list event tags")
            .map_err(Into::into)
    }

    /// Tags attached to a project.
    pub async fn list_for_project(&self, project_id: i64) -> Result<Vec<Tag>, TagServiceError> {
        self.repo
            .list_for_project(project_id)
            .await
            .context("Failed to list project tags")
            .map_err(Into::into)
    }

    async fn unique_slug(
        &self,
        base: &str,
        exclude_id: Option<i64>,
    ) -> Result<String, TagServiceError> {
        for n in 0.. {
            let slug = candidate(base, n);
            let taken = match exclude_id {
                Some(id) => self
                    .repo
                    .exists_by_slug_excluding(&slug, id)
                    .await
                    .context("Failed to check slug uniqueness")?,
                None => self
                    .repo
                    .exists_by_slug(&slug)
                    .await
                    .context("Failed to check slug uniqueness")?,
            };
            if !taken {
                return Ok(slug);
            }
        }
        unreachable!("slug candidates are unbounded")
    }
}
