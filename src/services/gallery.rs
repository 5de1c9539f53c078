//! Gallery service
//!
//! Business logic for the image gallery. The public page shows published
//! images only, optionally narrowed to a single event.

use crate::db::repositories::{EventRepository, GalleryRepository};
use crate::models::{
    CreateGalleryImageInput, GalleryImage, ListParams, PagedResult, UpdateGalleryImageInput,
};
use anyhow::{Context, Result};
use chrono::Utc;
use std::sync::Arc;

/// Error types for gallery service operations
#[derive(Debug, thiserror::Error)]
pub enum GalleryServiceError {
    /// Image not found
    #[error("Gallery image not found: {0}")]
    NotFound(i64),

    /// Referenced event does not exist
    #[error("Event not found: {0}")]
    EventNotFound(i64),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Gallery service
pub struct GalleryService {
    repo: Arc<dyn GalleryRepository>,
    event_repo: Arc<dyn EventRepository>,
}

impl GalleryService {
    pub fn new(repo: Arc<dyn GalleryRepository>, event_repo: Arc<dyn EventRepository>) -> Self {
        Self { repo, event_repo }
    }

    /// Add an image to the gallery.
    pub async fn create(
        &self,
        input: CreateGalleryImageInput,
    ) -> Result<GalleryImage, GalleryServiceError> {
        if input.title.trim().is_empty() {
            return Err(GalleryServiceError::ValidationError(
                "Title cannot be empty".to_string(),
            ));
        }
        if input.image.trim().is_empty() {
            return Err(GalleryServiceError::ValidationError(
                "An image file is required".to_string(),
            ));
        }

        if let Some(event_id) = input.event_id {
            if self
                .event_repo
                .get_by_id(event_id)
                .await
                .context("Failed to check event")?
                .is_none()
            {
                return Err(GalleryServiceError::EventNotFound(event_id));
            }
        }

        let image = GalleryImage {
            id: 0,
            title: input.title,
            description: input.description.unwrap_or_default(),
            image: input.image,
            event_id: input.event_id,
            published: input.published,
            uploaded_at: Utc::now(),
        };

        self.repo
            .create(&image)
            .await
            .context("Failed to create gallery image")
            .map_err(Into::into)
    }

    /// Get an image by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<GalleryImage>, GalleryServiceError> {
        self.repo
            .get_by_id(id)
            .await
            .context("Failed to get gallery image")
            .map_err(Into::into)
    }

    /// Public listing: published images, optional event filter.
    pub async fn list_published(
        &self,
        event_id: Option<i64>,
        params: &ListParams,
    ) -> Result<PagedResult<GalleryImage>, GalleryServiceError> {
        let items = self
            .repo
            .list_published(event_id, params.offset(), params.limit())
            .await
            .context("Failed to list published images")?;
        let total = self
            .repo
            .count_published(event_id)
            .await
            .context("Failed to count published images")?;

        Ok(PagedResult::new(items, total, params))
    }

    /// Admin listing: every image, newest-uploaded first.
    pub async fn list(
        &self,
        params: &ListParams,
    ) -> Result<PagedResult<GalleryImage>, GalleryServiceError> {
        let items = self
            .repo
            .list(params.offset(), params.limit())
            .await
            .context("Failed to list images")?;
        let total = self.repo.count().await.context("Failed to count images")?;

        Ok(PagedResult::new(items, total, params))
    }

    /// Count all images (dashboard).
    pub async fn count(&self) -> Result<i64, GalleryServiceError> {
        self.repo
            .count()
            .await
            .context("Failed to count images")
            .map_err(Into::into)
    }

    /// Update an image record.
    pub async fn update(
        &self,
        id: i64,
        input: UpdateGalleryImageInput,
    ) -> Result<GalleryImage, GalleryServiceError> {
        let mut image = self
            .repo
            .get_by_id(id)
            .await
            .context("Failed to get gallery image")?
            .ok_or(GalleryServiceError::NotFound(id))?;

        if let Some(title) = input.title {
            if title.trim().is_empty() {
                return Err(GalleryServiceError::ValidationError(
                    "Title cannot be empty".to_string(),
                ));
            }
            image.title = title;
        }
        if let Some(description) = input.description {
            image.description = description;
        }
        if let Some(path) = input.image {
            if path.trim().is_empty() {
                return Err(GalleryServiceError::ValidationError(
                    "An image file is required".to_string(),
                ));
            }
            image.image = path;
        }
        if let Some(event_id) = input.event_id {
            if let Some(event_id) = event_id {
                if self
                    .event_repo
                    .get_by_id(event_id)
                    .await
                    .context("Failed to check event")?
                    .is_none()
                {
                    return Err(GalleryServiceError::EventNotFound(event_id));
                }
            }
            image.event_id = event_id;
        }
        if let Some(published) = input.published {
            image.published = published;
        }

        self.repo
            .update(&image)
            .await
            .context("Failed to update gallery image")
            .map_err(Into::into)
    }

    /// Delete an image record. The file under the media root stays; media
    /// cleanup is an operator task.
    pub async fn delete(&self, id: i64) -> Result<(), GalleryServiceError> {
        if self
            .repo
            .get_by_id(id)
            .await
            .context("Failed to get gallery image")?
            .is_none()
        {
            return Err(GalleryServiceError::NotFound(id));
        }

        self.repo
            .delete(id)
            .await
            .context("Failed to delete gallery image")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{SqlxEventRepository, SqlxGalleryRepository};
    use crate::db::{create_test_pool, migrations};

    async fn setup() -> GalleryService {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        GalleryService::new(
            SqlxGalleryRepository::boxed(pool.clone()),
            SqlxEventRepository::boxed(pool),
        )
    }

    fn sample_input(title: &str, published: bool) -> CreateGalleryImageInput {
        CreateGalleryImageInput {
            title: title.to_string(),
            description: None,
            image: "/media/foto.jpg".to_string(),
            event_id: None,
            published,
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let service = setup().await;

        let image = service
            .create(sample_input("Abertura do evento", true))
            .await
            .expect("create");

        assert!(image.id > 0);
        assert!(service
            .get_by_id(image.id)
            .await
            .expect("get")
            .is_some());
    }

    #[tokio::test]
    async fn test_create_requires_image_path() {
        let service = setup().await;

        let mut input = sample_input("Sem arquivo", true);
        input.image = "  ".to_string();
        let result = service.create(input).await;
        assert!(matches!(
            result,
            Err(GalleryServiceError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn test_create_unknown_event_fails() {
        let service = setup().await;

        let mut input = sample_input("Foto", true);
        input.event_id = Some(777);
        let result = service.create(input).await;
        assert!(matches!(result, Err(GalleryServiceError::EventNotFound(_))));
    }

    #[tokio::test]
    async fn test_public_list_hides_unpublished() {
        let service = setup().await;
        service
            .create(sample_input("Pública", true))
            .await
            .expect("create");
        service
            .create(sample_input("Privada", false))
            .await
            .expect("create");

        let page = service
            .list_published(None, &ListParams::new(1, 12))
            .await
            .expect("list");
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].title, "Pública");

        let all = service.list(&ListParams::new(1, 20)).await.expect("list");
        assert_eq!(all.total, 2);
    }

    #[tokio::test]
    async fn test_unpublish_via_update() {
        let service = setup().await;
        let image = service
            .create(sample_input("Temporária", true))
            .await
            .expect("create");

        service
            .update(
                image.id,
                UpdateGalleryImageInput {
                    published: Some(false),
                    ..Default::default()
                },
            )
            .await
            .expect("update");

        let page = service
            .list_published(None, &ListParams::new(1, 12))
            .await
            .expect("list");
        assert_eq!(page.total, 0);
    }

    #[tokio::test]
    async fn test_delete() {
        let service = setup().await;
        let image = service
            .create(sample_input("Apagar", true))
            .await
            .expect("create");

        service.delete(image.id).await.expect("delete");
        assert!(service.get_by_id(image.id).await.expect("get").is_none());
    }
}
