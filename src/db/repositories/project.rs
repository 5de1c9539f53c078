//! Project repository

use crate::db::DbPool;
use crate::models::Project;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use std::sync::Arc;

/// Project repository trait
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Create a new project, returning it with its assigned ID
    async fn create(&self, project: &Project) -> Result<Project>;

    /// Get project by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Project>>;

    /// Get project by slug
    async fn get_by_slug(&self, slug: &str) -> Result<Option<Project>>;

    /// List all projects for the admin screen, newest-created first
    async fn list(&self) -> Result<Vec<Project>>;

    /// List active projects for the public page, newest-created first
    async fn list_active(&self) -> Result<Vec<Project>>;

    /// Persist changes to an existing project
    async fn update(&self, project: &Project) -> Result<Project>;

    /// Delete a project
    async fn delete(&self, id: i64) -> Result<()>;

    /// Check if a slug already exists
    async fn exists_by_slug(&self, slug: &str) -> Result<bool>;

    /// Check if a slug exists for a different project (for updates)
    async fn exists_by_slug_excluding(&self, slug: &str, exclude_id: i64) -> Result<bool>;

    /// Replace the set of tags attached to a project
    async fn set_tags(&self, project_id: i64, tag_ids: &[i64]) -> Result<()>;
}

/// SQLx-based project repository implementation
pub struct SqlxProjectRepository {
    pool: DbPool,
}

impl SqlxProjectRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DbPool) -> Arc<dyn ProjectRepository> {
        Arc::new(Self::new(pool))
    }
}

const PROJECT_COLUMNS: &str = "id, slug, title, description, image, category_id, link_to_join, is_active, featured, created_at, updated_at";

#[async_trait]
impl ProjectRepository for SqlxProjectRepository {
    async fn create(&self, project: &Project) -> Result<Project> {
        let result = sqlx::query(
            r#"
            INSERT INTO projects (slug, title, description, image, category_id, link_to_join, is_active, featured, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&project.slug)
        .bind(&project.title)
        .bind(&project.description)
        .bind(&project.image)
        .bind(project.category_id)
        .bind(&project.link_to_join)
        .bind(project.is_active)
        .bind(project.featured)
        .bind(project.created_at)
        .bind(project.updated_at)
        .execute(&self.pool)
        .await
        .context("Failed to create project")?;

        let mut created = project.clone();
        created.id = result.last_insert_rowid();
        Ok(created)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Project>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM projects WHERE id = ?",
            PROJECT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get project by ID")?;

        row.map(|r| row_to_project(&r)).transpose()
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Option<Project>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM projects WHERE slug = ?",
            PROJECT_COLUMNS
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get project by slug")?;

        row.map(|r| row_to_project(&r)).transpose()
    }

    async fn list(&self) -> Result<Vec<Project>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM projects ORDER BY created_at DESC",
            PROJECT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .context("Failed to list projects")?;

        rows.iter().map(row_to_project).collect()
    }

    async fn list_active(&self) -> Result<Vec<Project>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM projects WHERE is_active = TRUE ORDER BY created_at DESC",
            PROJECT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .context("Failed to list active projects")?;

        rows.iter().map(row_to_project).collect()
    }

    async fn update(&self, project: &Project) -> Result<Project> {
        sqlx::query(
            r#"
            UPDATE projects
            SET slug = ?, title = ?, description = ?, image = ?, category_id = ?,
                link_to_join = ?, is_active = ?, featured = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&project.slug)
        .bind(&project.title)
        .bind(&project.description)
        .bind(&project.image)
        .bind(project.category_id)
        .bind(&project.link_to_join)
        .bind(project.is_active)
        .bind(project.featured)
        .bind(project.updated_at)
        .bind(project.id)
        .execute(&self.pool)
        .await
        .context("Failed to update project")?;

        self.get_by_id(project.id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Project not found after update"))
    }

    async fn delete(&self, id: i64) -> Result<()> {
        sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete project")?;

        Ok(())
    }

    async fn exists_by_slug(&self, slug: &str) -> Result<bool> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM projects WHERE slug = ?")
            .bind(slug)
            .fetch_one(&self.pool)
            .await
            .context("Failed to check project slug existence")?;

        let count: i64 = row.get("count");
        Ok(count > 0)
    }

    async fn exists_by_slug_excluding(&self, slug: &str, exclude_id: i64) -> Result<bool> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM projects WHERE slug = ? AND id != ?")
            .bind(slug)
            .bind(exclude_id)
            .fetch_one(&self.pool)
            .await
            .context("Failed to check project slug existence")?;

        let count: i64 = row.get("count");
        Ok(count > 0)
    }

    async fn set_tags(&self, project_id: i64, tag_ids: &[i64]) -> Result<()> {
        sqlx::query("DELETE FROM project_tags WHERE project_id = ?")
            .bind(project_id)
            .execute(&self.pool)
            .await
            .context("Failed to clear project tags")?;

        for tag_id in tag_ids {
            sqlx::query("INSERT OR IGNORE INTO project_tags (project_id, tag_id) VALUES (?, ?)")
                .bind(project_id)
                .bind(tag_id)
                .execute(&self.pool)
                .await
                .context("Failed to attach project tag")?;
        }

        Ok(())
    }
}

fn row_to_project(row: &SqliteRow) -> Result<Project> {
    Ok(Project {
        id: row.get("id"),
        slug: row.get("slug"),
        title: row.get("title"),
        description: row.get("description"),
        image: row.get("image"),
        category_id: row.get("category_id"),
        link_to_join: row.get("link_to_join"),
        is_active: row.get("is_active"),
        featured: row.get("featured"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}
