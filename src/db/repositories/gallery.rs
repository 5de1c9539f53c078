//! Gallery image repository

use crate::db::DbPool;
use crate::models::GalleryImage;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use std::sync::Arc;

/// Gallery image repository trait
#[async_trait]
pub trait GalleryRepository: Send + Sync {
    /// Store a new gallery image, returning it with its assigned ID
    async fn create(&self, image: &GalleryImage) -> Result<GalleryImage>;

    /// Get gallery image by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<GalleryImage>>;

    /// List images for the admin screen, newest-uploaded first
    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<GalleryImage>>;

    /// Count all images
    async fn count(&self) -> Result<i64>;

    /// List published images, optionally filtered by event, newest first
    async fn list_published(
        &self,
        event_id: Option<i64>,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<GalleryImage>>;

    /// Count published images matching the event filter
    async fn count_published(&self, event_id: Option<i64>) -> Result<i64>;

    /// Persist changes to an existing image
    async fn update(&self, image: &GalleryImage) -> Result<GalleryImage>;

    /// Delete an image record
    async fn delete(&self, id: i64) -> Result<()>;
}

/// SQLx-based gallery repository implementation
pub struct SqlxGalleryRepository {
    pool: DbPool,
}

impl SqlxGalleryRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DbPool) -> Arc<dyn GalleryRepository> {
        Arc::new(Self::new(pool))
    }
}

const GALLERY_COLUMNS: &str = "id, title, description, image, event_id, published, uploaded_at";

#[async_trait]
impl GalleryRepository for SqlxGalleryRepository {
    async fn create(&self, image: &GalleryImage) -> Result<GalleryImage> {
        let result = sqlx::query(
            r#"
            INSERT INTO gallery_images (title, description, image, event_id, published, uploaded_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&image.title)
        .bind(&image.description)
        .bind(&image.image)
        .bind(image.event_id)
        .bind(image.published)
        .bind(image.uploaded_at)
        .execute(&self.pool)
        .await
        .context("Failed to create gallery image")?;

        let mut created = image.clone();
        created.id = result.last_insert_rowid();
        Ok(created)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<GalleryImage>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM gallery_images WHERE id = ?",
            GALLERY_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get gallery image by ID")?;

        row.map(|r| row_to_gallery_image(&r)).transpose()
    }

    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<GalleryImage>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM gallery_images ORDER BY uploaded_at DESC LIMIT ? OFFSET ?",
            GALLERY_COLUMNS
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list gallery images")?;

        rows.iter().map(row_to_gallery_image).collect()
    }

    async fn count(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM gallery_images")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count gallery images")?;

        Ok(row.get("count"))
    }

    async fn list_published(
        &self,
        event_id: Option<i64>,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<GalleryImage>> {
        let event_id = event_id.unwrap_or(0);

        let rows = sqlx::query(&format!(
            r#"
            SELECT {}
            FROM gallery_images
            WHERE published = TRUE AND (? = 0 OR event_id = ?)
            ORDER BY uploaded_at DESC
            LIMIT ? OFFSET ?
            "#,
            GALLERY_COLUMNS
        ))
        .bind(event_id)
        .bind(event_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list published gallery images")?;

        rows.iter().map(row_to_gallery_image).collect()
    }

    async fn count_published(&self, event_id: Option<i64>) -> Result<i64> {
        let event_id = event_id.unwrap_or(0);

        let row = sqlx::query(
            "SELECT COUNT(*) as count FROM gallery_images WHERE published = TRUE AND (? = 0 OR event_id = ?)",
        )
        .bind(event_id)
        .bind(event_id)
        .fetch_one(&self.pool)
        .await
        .context("Failed to count published gallery images")?;

        Ok(row.get("count"))
    }

    async fn update(&self, image: &GalleryImage) -> Result<GalleryImage> {
        sqlx::query(
            r#"
            UPDATE gallery_images
            SET title = ?, description = ?, image = ?, event_id = ?, published = ?
            WHERE id = ?
            "#,
        )
        .bind(&image.title)
        .bind(&image.description)
        .bind(&image.image)
        .bind(image.event_id)
        .bind(image.published)
        .bind(image.id)
        .execute(&self.pool)
        .await
        .context("Failed to update gallery image")?;

        self.get_by_id(image.id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Gallery image not found after update"))
    }

    async fn delete(&self, id: i64) -> Result<()> {
        sqlx::query("DELETE FROM gallery_images WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete gallery image")?;

        Ok(())
    }
}

fn row_to_gallery_image(row: &SqliteRow) -> Result<GalleryImage> {
    Ok(GalleryImage {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        image: row.get("image"),
        event_id: row.get("event_id"),
        published: row.get("published"),
        uploaded_at: row.get("uploaded_at"),
    })
}
