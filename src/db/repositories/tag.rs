//! Tag repository
//!
//! Tags are shared across posts, events and projects through the
//! `post_tags`, `event_tags` and `project_tags` join tables; the lookup
//! side of those joins lives here.

use crate::db::DbPool;
use crate::models::Tag;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use std::sync::Arc;

/// Tag repository trait
#[async_trait]
pub trait TagRepository: Send + Sync {
    /// Create a new tag, returning it with its assigned ID
    async fn create(&self, tag: &Tag) -> Result<Tag>;

    /// Get tag by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Tag>>;

    /// Get tag by slug
    async fn get_by_slug(&self, slug: &str) -> Result<Option<Tag>>;

    /// List all tags ordered by name
    async fn list(&self) -> Result<Vec<Tag>>;

    /// Persist changes to an existing tag
    async fn update(&self, tag: &Tag) -> Result<Tag>;

    /// Delete a tag
    async fn delete(&self, id: i64) -> Result<()>;

    /// Check if a name already exists
    async fn exists_by_name(&self, name: &str) -> Result<bool>;

    /// Check if a slug already exists
    async fn exists_by_slug(&self, slug: &str) -> Result<bool>;

    /// Check if a slug exists for a different tag (for updates)
    async fn exists_by_slug_excluding(&self, slug: &str, exclude_id: i64) -> Result<bool>;

    /// Tags attached to a post
    async fn list_for_post(&self, post_id: i64) -> Result<Vec<Tag>>;

    /// Tags attached to an event
    async fn list_for_event(&self, event_id: i64) -> Result<Vec<Tag>>;

    /// Tags attached to a project
    async fn list_for_project(&self, project_id: i64) -> Result<Vec<Tag>>;
}

/// SQLx-based tag repository implementation
pub struct SqlxTagRepository {
    pool: DbPool,
}

impl SqlxTagRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DbPool) -> Arc<dyn TagRepository> {
        Arc::new(Self::new(pool))
    }

    async fn list_for(&self, join_table: &str, fk_column: &str, owner_id: i64) -> Result<Vec<Tag>> {
        let query = format!(
            r#"
            SELECT t.id, t.name, t.slug, t.created_at
            FROM tags t
            INNER JOIN {join} j ON t.id = j.tag_id
            WHERE j.{fk} = ?
            ORDER BY t.name
            "#,
            join = join_table,
            fk = fk_column,
        );

        let rows = sqlx::query(&query)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await
            .with_context(|| format!("Failed to list tags via {}", join_table))?;

        rows.iter().map(row_to_tag).collect()
    }
}

#[async_trait]
impl TagRepository for SqlxTagRepository {
    async fn create(&self, tag: &Tag) -> Result<Tag> {
        let result = sqlx::query("INSERT INTO tags (name, slug, created_at) VALUES (?, ?, ?)")
            .bind(&tag.name)
            .bind(&tag.slug)
            .bind(tag.created_at)
            .execute(&self.pool)
            .await
            .context("Failed to create tag")?;

        let mut created = tag.clone();
        created.id = result.last_insert_rowid();
        Ok(created)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Tag>> {
        let row = sqlx::query("SELECT id, name, slug, created_at FROM tags WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to get tag by ID")?;

        row.map(|r| row_to_tag(&r)).transpose()
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Option<Tag>> {
        let row = sqlx::query("SELECT id, name, slug, created_at FROM tags WHERE slug = ?")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to get tag by slug")?;

        row.map(|r| row_to_tag(&r)).transpose()
    }

    async fn list(&self) -> Result<Vec<Tag>> {
        let rows = sqlx::query("SELECT id, name, slug, created_at FROM tags ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .context("Failed to list tags")?;

        rows.iter().map(row_to_tag).collect()
    }

    async fn update(&self, tag: &Tag) -> Result<Tag> {
        sqlx::query("UPDATE tags SET name = ?, slug = ? WHERE id = ?")
            .bind(&tag.name)
            .bind(&tag.slug)
            .bind(tag.id)
            .execute(&self.pool)
            .await
            .context("Failed to update tag")?;

        self.get_by_id(tag.id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Tag not found after update"))
    }

    async fn delete(&self, id: i64) -> Result<()> {
        sqlx::query("DELETE FROM tags WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete tag")?;

        Ok(())
    }

    async fn exists_by_name(&self, name: &str) -> Result<bool> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM tags WHERE name = ?")
            .bind(name)
            .fetch_one(&self.pool)
            .await
            .context("Failed to check tag name existence")?;

        let count: i64 = row.get("count");
        Ok(count > 0)
    }

    async fn exists_by_slug(&self, slug: &str) -> Result<bool> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM tags WHERE slug = ?")
            .bind(slug)
            .fetch_one(&self.pool)
            .await
            .context("Failed to check tag slug existence")?;

        let count: i64 = row.get("count");
        Ok(count > 0)
    }

    async fn exists_by_slug_excluding(&self, slug: &str, exclude_id: i64) -> Result<bool> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM tags WHERE slug = ? AND id != ?")
            .bind(slug)
            .bind(exclude_id)
            .fetch_one(&self.pool)
            .await
            .context("Failed to check tag slug existence")?;

        let count: i64 = row.get("count");
        Ok(count > 0)
    }

    async fn list_for_post(&self, post_id: i64) -> Result<Vec<Tag>> {
        self.list_for("post_tags", "post_id", post_id).await
    }

    async fn list_for_event(&self, event_id: i64) -> Result<Vec<Tag>> {
        self.list_for("event_tags", "event_id", event_id).await
    }

    async fn list_for_project(&self, project_id: i64) -> Result<Vec<Tag>> {
        self.list_for("project_tags", "project_id", project_id).await
    }
}

fn row_to_tag(row: &SqliteRow) -> Result<Tag> {
    Ok(Tag {
        id: row.get("id"),
        name: row.get("name"),
        slug: row.get("slug"),
        created_at: row.get("created_at"),
    })
}
