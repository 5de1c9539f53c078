//! Category service
//!
//! Business logic for categories:
//! - Create, read, update, delete
//! - Slug generation with numeric-suffix disambiguation
//!
//! Categories are read on nearly every public page, so lookups go through
//! the in-process cache.

use crate::cache::{Cache, CacheLayer};
use crate::db::repositories::CategoryRepository;
use crate::models::{Category, CreateCategoryInput, UpdateCategoryInput};
use crate::services::slug::{candidate, slugify};
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;

/// Default cache TTL for categories (1 hour)
const CATEGORY_CACHE_TTL_SECS: u64 = 3600;

const CACHE_KEY_CATEGORY_BY_ID: &str = "category:id:";
const CACHE_KEY_CATEGORY_BY_SLUG: &str = "category:slug:";
const CACHE_KEY_CATEGORY_LIST: &str = "category:list";

/// Error types for category service operations
#[derive(Debug, thiserror::Error)]
pub enum CategoryServiceError {
    /// Category not found
    #[error("Category not found: {0}")]
    NotFound(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Category service
pub struct CategoryService {
    repo: Arc<dyn CategoryRepository>,
    cache: Arc<Cache>,
    cache_ttl: Duration,
}

impl CategoryService {
    pub fn new(repo: Arc<dyn CategoryRepository>, cache: Arc<Cache>) -> Self {
        Self {
            repo,
            cache,
            cache_ttl: Duration::from_secs(CATEGORY_CACHE_TTL_SECS),
        }
    }

    /// Create a new category.
    ///
    /// An explicit slug is normalized; otherwise the slug derives from the
    /// name. Either way a numeric suffix disambiguates collisions, so two
    /// categories named "Evento" become `evento` and `evento-1`.
    pub async fn create(
        &self,
        input: CreateCategoryInput,
    ) -> Result<Category, CategoryServiceError> {
        if input.name.trim().is_empty() {
            return Err(CategoryServiceError::ValidationError(
                "Category name cannot be empty".to_string(),
            ));
        }

        let base = slugify(input.slug.as_deref().unwrap_or(&input.name));
        if base.is_empty() {
            return Err(CategoryServiceError::ValidationError(
                "Category name does not produce a valid slug".to_string(),
            ));
        }
        let slug = self.unique_slug(&base, None).await?;

        let category = Category::new(input.name, slug);
        let created = self
            .repo
            .create(&category)
            .await
            .context("Failed to create category")?;

        self.invalidate_cache().await;

        Ok(created)
    }

    /// Get category by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Category>, CategoryServiceError> {
        let cache_key = format!("{}{}", CACHE_KEY_CATEGORY_BY_ID, id);
        if let Some(category) = self.cache.get::<Category>(&cache_key).await.ok().flatten() {
            return Ok(Some(category));
        }

        let category = self
            .repo
            .get_by_id(id)
            .await
            .context("Failed to get category by ID")?;

        if let Some(ref cat) = category {
            let _ = self.cache.set(&cache_key, cat, self.cache_ttl).await;
        }

        Ok(category)
    }

    /// Get category by slug.
    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<Category>, CategoryServiceError> {
        let cache_key = format!("{}{}", CACHE_KEY_CATEGORY_BY_SLUG, slug);
        if let Some(category) = self.cache.get::<Category>(&cache_key).await.ok().flatten() {
            return Ok(Some(category));
        }

        let category = self
            .repo
            .get_by_slug(slug)
            .await
            .context("Failed to get category by slug")?;

        if let Some(ref cat) = category {
            let _ = self.cache.set(&cache_key, cat, self.cache_ttl).await;
        }

        Ok(category)
    }

    /// List all categories ordered by name.
    pub async fn list(&self) -> Result<Vec<Category>, CategoryServiceError> {
        if let Some(list) = self
            .cache
            .get::<Vec<Category>>(CACHE_KEY_CATEGORY_LIST)
            .await
            .ok()
            .flatten()
        {
            return Ok(list);
        }

        let list = self.repo.list().await.context("Failed to list categories")?;
        let _ = self.cache.set(CACHE_KEY_CATEGORY_LIST, &list, self.cache_ttl).await;

        Ok(list)
    }

    /// Update a category. A changed name without an explicit slug keeps the
    /// old slug, matching the original admin form.
    pub async fn update(
        &self,
        id: i64,
        input: UpdateCategoryInput,
    ) -> Result<Category, CategoryServiceError> {
        let mut category = self
            .repo
            .get_by_id(id)
            .await
            .context("Failed to get category")?
            .ok_or_else(|| {
                CategoryServiceError::NotFound(format!("Category with ID {} not found", id))
            })?;

        if let Some(name) = input.name {
            if name.trim().is_empty() {
                return Err(CategoryServiceError::ValidationError(
                    "Category name cannot be empty".to_string(),
                ));
            }
            category.name = name;
        }

        if let Some(slug) = input.slug {
            let base = slugify(&slug);
            if base.is_empty() {
                return Err(CategoryServiceError::ValidationError(
                    "Slug cannot be empty".to_string(),
                ));
            }
            if base != category.slug {
                category.slug = self.unique_slug(&base, Some(id)).await?;
            }
        }

        let updated = self
            .repo
            .update(&category)
            .await
            .context("Failed to update category")?;

        self.invalidate_cache().await;

        Ok(updated)
    }

    /// Delete a category. Posts in the category are deleted with it;
    /// events and projects fall back to no category.
    pub async fn delete(&self, id: i64) -> Result<(), CategoryServiceError> {
        if self
            .repo
            .get_by_id(id)
            .await
            .context("Failed to get category")?
            .is_none()
        {
            return Err(CategoryServiceError::NotFound(format!(
                "Category with ID {} not found",
                id
            )));
        }

        self.repo
            .delete(id)
            .await
            .context("Failed to delete category")?;

        self.invalidate_cache().await;

        Ok(())
    }

    async fn unique_slug(
        &self,
        base: &str,
        exclude_id: Option<i64>,
    ) -> Result<String, CategoryServiceError> {
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

    async fn invalidate_cache(&self) {
        let _ = self
            .cache
            .delete_pattern(&format!("{}*", CACHE_KEY_CATEGORY_BY_ID))
            .await;
        let _ = self
            .cache
            .delete_pattern(&format!("{}*", CACHE_KEY_CATEGORY_BY_SLUG))
            .await;
        let _ = self.cache.delete(CACHE_KEY_CATEGORY_LIST).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::create_cache;
    use crate::config::CacheConfig;
    use crate::db::repositories::SqlxCategoryRepository;
    use crate::db::{create_test_pool, migrations};

    async fn setup() -> CategoryService {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let repo = SqlxCategoryRepository::boxed(pool);
        let cache = create_cache(&CacheConfig::default());
        CategoryService::new(repo, cache)
    }

    #[tokio::test]
    async fn test_create_generates_slug() {
        let service = setup().await;

        let category = service
            .create(CreateCategoryInput::new("Cultura Afro-Brasileira"))
            .await
            .expect("create should succeed");

        assert!(category.id > 0);
        assert_eq!(category.slug, "cultura-afro-brasileira");
    }

    #[tokio::test]
    async fn test_create_with_custom_slug() {
        let service = setup().await;

        let category = service
            .create(CreateCategoryInput::new("Educação").with_slug("Custom Slug"))
            .await
            .expect("create should succeed");

        // Supplied slugs are normalized before saving
        assert_eq!(category.slug, "custom-slug");
    }

    #[tokio::test]
    async fn test_duplicate_names_get_suffixed_slugs() {
        let service = setup().await;

        let first = service
            .create(CreateCategoryInput::new("Evento"))
            .await
            .expect("create should succeed");
        let second = service
            .create(CreateCategoryInput::new("Evento"))
            .await
            .expect("create should succeed");
        let third = service
            .create(CreateCategoryInput::new("Evento"))
            .await
            .expect("create should succeed");

        assert_eq!(first.slug, "evento");
        assert_eq!(second.slug, "evento-1");
        assert_eq!(third.slug, "evento-2");
    }

    #[tokio::test]
    async fn test_create_empty_name_fails() {
        let service = setup().await;

        let result = service.create(CreateCategoryInput::new("   ")).await;
        assert!(matches!(
            result,
            Err(CategoryServiceError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn test_get_by_slug() {
        let service = setup().await;
        service
            .create(CreateCategoryInput::new("Literatura"))
            .await
            .expect("create");

        let found = service
            .get_by_slug("literatura")
            .await
            .expect("get")
            .expect("category should exist");
        assert_eq!(found.name, "Literatura");

        assert!(service.get_by_slug("missing").await.expect("get").is_none());
    }

    #[tokio::test]
    async fn test_list_sees_new_categories() {
        let service = setup().await;

        // Warm the cache, then create
        let _ = service.list().await;
        service
            .create(CreateCategoryInput::new("Ciência"))
            .await
            .expect("create");

        let list = service.list().await.expect("list");
        assert!(list.iter().any(|c| c.name == "Ciência"));
    }

    #[tokio::test]
    async fn test_update_slug_excludes_self() {
        let service = setup().await;
        let category = service
            .create(CreateCategoryInput::new("Arte"))
            .await
            .expect("create");

        // Re-saving the same slug is not a collision with itself
        let updated = service
            .update(
                category.id,
                UpdateCategoryInput {
                    name: Some("Artes".to_string()),
                    slug: Some("arte".to_string()),
                },
            )
            .await
            .expect("update should succeed");

        assert_eq!(updated.name, "Artes");
        assert_eq!(updated.slug, "arte");
    }

    #[tokio::test]
    async fn test_update_colliding_slug_gets_suffix() {
        let service = setup().await;
        service
            .create(CreateCategoryInput::new("Sociedade"))
            .await
            .expect("create");
        let other = service
            .create(CreateCategoryInput::new("Política"))
            .await
            .expect("create");

        let updated = service
            .update(
                other.id,
                UpdateCategoryInput {
                    name: None,
                    slug: Some("sociedade".to_string()),
                },
            )
            .await
            .expect("update should succeed");

        assert_eq!(updated.slug, "sociedade-1");
    }

    #[tokio::test]
    async fn test_update_missing_category_fails() {
        let service = setup().await;

        let result = service
            .update(99999, UpdateCategoryInput::default())
            .await;
        assert!(matches!(result, Err(CategoryServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete() {
        let service = setup().await;
        let category = service
            .create(CreateCategoryInput::new("Religião"))
            .await
            .expect("create");

        service.delete(category.id).await.expect("delete");
        assert!(service
            .get_by_id(category.id)
            .await
            .expect("get")
            .is_none());

        let result = service.delete(category.id).await;
        assert!(matches!(result, Err(CategoryServiceError::NotFound(_))));
    }
}
