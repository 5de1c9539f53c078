//! Post repository
//!
//! Database operations for blog posts, including the public
//! published-only listing with free-text search and category filtering,
//! and the single-statement view/like counter updates.

use crate::db::DbPool;
use crate::models::{Post, PostFilter, PostStatus};
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use std::sync::Arc;

/// Post repository trait
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Create a new post, returning it with its assigned ID
    async fn create(&self, post: &Post) -> Result<Post>;

    /// Get post by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Post>>;

    /// Get post by slug (any status)
    async fn get_by_slug(&self, slug: &str) -> Result<Option<Post>>;

    /// List posts for the admin screen, newest-created first
    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<Post>>;

    /// Count all posts
    async fn count(&self) -> Result<i64>;

    /// List published posts matching the filter, newest-published first
    async fn list_published(&self, filter: &PostFilter, offset: i64, limit: i64)
        -> Result<Vec<Post>>;

    /// Count published posts matching the filter
    async fn count_published(&self, filter: &PostFilter) -> Result<i64>;

    /// Featured published posts for the highlight strip
    async fn list_featured(&self, limit: i64) -> Result<Vec<Post>>;

    /// Most recently created posts (dashboard)
    async fn list_recent(&self, limit: i64) -> Result<Vec<Post>>;

    /// Persist changes to an existing post
    async fn update(&self, post: &Post) -> Result<Post>;

    /// Delete a post
    async fn delete(&self, id: i64) -> Result<()>;

    /// Increment the view counter by one
    async fn increment_views(&self, id: i64) -> Result<()>;

    /// Increment the like counter by one
    async fn increment_likes(&self, id: i64) -> Result<()>;

    /// Check if a slug already exists
    async fn exists_by_slug(&self, slug: &str) -> Result<bool>;

    /// Check if a slug exists for a different post (for updates)
    async fn exists_by_slug_excluding(&self, slug: &str, exclude_id: i64) -> Result<bool>;

    /// Replace the set of tags attached to a post
    async fn set_tags(&self, post_id: i64, tag_ids: &[i64]) -> Result<()>;
}

/// SQLx-based post repository implementation
pub struct SqlxPostRepository {
    pool: DbPool,
}

impl SqlxPostRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DbPool) -> Arc<dyn PostRepository> {
        Arc::new(Self::new(pool))
    }
}

const POST_COLUMNS: &str = "p.id, p.slug, p.title, p.excerpt, p.content, p.content_html, p.author_id, p.category_id, p.status, p.published_date, p.read_time, p.image, p.views, p.likes, p.featured, p.created_at, p.updated_at";

#[async_trait]
impl PostRepository for SqlxPostRepository {
    async fn create(&self, post: &Post) -> Result<Post> {
        let result = sqlx::query(
            r#"
            INSERT INTO posts (slug, title, excerpt, content, content_html, author_id, category_id, status, published_date, read_time, image, views, likes, featured, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&post.slug)
        .bind(&post.title)
        .bind(&post.excerpt)
        .bind(&post.content)
        .bind(&post.content_html)
        .bind(post.author_id)
        .bind(post.category_id)
        .bind(post.status.as_str())
        .bind(post.published_date)
        .bind(&post.read_time)
        .bind(&post.image)
        .bind(post.views)
        .bind(post.likes)
        .bind(post.featured)
        .bind(post.created_at)
        .bind(post.updated_at)
        .execute(&self.pool)
        .await
        .context("Failed to create post")?;

        let mut created = post.clone();
        created.id = result.last_insert_rowid();
        Ok(created)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Post>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM posts p WHERE p.id = ?",
            POST_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get post by ID")?;

        row.map(|r| row_to_post(&r)).transpose()
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Option<Post>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM posts p WHERE p.slug = ?",
            POST_COLUMNS
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get post by slug")?;

        row.map(|r| row_to_post(&r)).transpose()
    }

    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<Post>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM posts p ORDER BY p.created_at DESC LIMIT ? OFFSET ?",
            POST_COLUMNS
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list posts")?;

        rows.iter().map(row_to_post).collect()
    }

    async fn count(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM posts")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count posts")?;

        Ok(row.get("count"))
    }

    async fn list_published(
        &self,
        filter: &PostFilter,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Post>> {
        let search = filter.search.clone().unwrap_or_default();
        let pattern = format!("%{}%", search);
        let category = filter.category.clone().unwrap_or_default();

        let rows = sqlx::query(&format!(
            r#"
            SELECT {}
            FROM posts p
            LEFT JOIN users u ON p.author_id = u.id
            LEFT JOIN categories c ON p.category_id = c.id
            WHERE p.status = 'published'
              AND (? = '' OR p.title LIKE ? OR p.excerpt LIKE ? OR p.content LIKE ? OR COALESCE(u.username, '') LIKE ?)
              AND (? = '' OR c.name = ?)
            ORDER BY p.published_date DESC
            LIMIT ? OFFSET ?
            "#,
            POST_COLUMNS
        ))
        .bind(&search)
        .bind(&pattern)
        .bind(&pattern)
        .bind(&pattern)
        .bind(&pattern)
        .bind(&category)
        .bind(&category)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list published posts")?;

        rows.iter().map(row_to_post).collect()
    }

    async fn count_published(&self, filter: &PostFilter) -> Result<i64> {
        let search = filter.search.clone().unwrap_or_default();
        let pattern = format!("%{}%", search);
        let category = filter.category.clone().unwrap_or_default();

        let row = sqlx::query(
            r#"
            SELECT COUNT(*) as count
            FROM posts p
            LEFT JOIN users u ON p.author_id = u.id
            LEFT JOIN categories c ON p.category_id = c.id
            WHERE p.status = 'published'
              AND (? = '' OR p.title LIKE ? OR p.excerpt LIKE ? OR p.content LIKE ? OR COALESCE(u.username, '') LIKE ?)
              AND (? = '' OR c.name = ?)
            "#,
        )
        .bind(&search)
        .bind(&pattern)
        .bind(&pattern)
        .bind(&pattern)
        .bind(&pattern)
        .bind(&category)
        .bind(&category)
        .fetch_one(&self.pool)
        .await
        .context("Failed to count published posts")?;

        Ok(row.get("count"))
    }

    async fn list_featured(&self, limit: i64) -> Result<Vec<Post>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {}
            FROM posts p
            WHERE p.status = 'published' AND p.featured = TRUE
            ORDER BY p.published_date DESC
            LIMIT ?
            "#,
            POST_COLUMNS
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list featured posts")?;

        rows.iter().map(row_to_post).collect()
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<Post>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM posts p ORDER BY p.created_at DESC LIMIT ?",
            POST_COLUMNS
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list recent posts")?;

        rows.iter().map(row_to_post).collect()
    }

    async fn update(&self, post: &Post) -> Result<Post> {
        sqlx::query(
            r#"
            UPDATE posts
            SET slug = ?, title = ?, excerpt = ?, content = ?, content_html = ?,
                category_id = ?, status = ?, published_date = ?, read_time = ?,
                image = ?, featured = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&post.slug)
        .bind(&post.title)
        .bind(&post.excerpt)
        .bind(&post.content)
        .bind(&post.content_html)
        .bind(post.category_id)
        .bind(post.status.as_str())
        .bind(post.published_date)
        .bind(&post.read_time)
        .bind(&post.image)
        .bind(post.featured)
        .bind(post.updated_at)
        .bind(post.id)
        .execute(&self.pool)
        .await
        .context("Failed to update post")?;

        self.get_by_id(post.id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Post not found after update"))
    }

    async fn delete(&self, id: i64) -> Result<()> {
        // post_tags rows go with it via ON DELETE CASCADE
        sqlx::query("DELETE FROM posts WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete post")?;

        Ok(())
    }

    async fn increment_views(&self, id: i64) -> Result<()> {
        sqlx::query("UPDATE posts SET views = views + 1 WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to increment post views")?;

        Ok(())
    }

    async fn increment_likes(&self, id: i64) -> Result<()> {
        sqlx::query("UPDATE posts SET likes = likes + 1 WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to increment post likes")?;

        Ok(())
    }

    async fn exists_by_slug(&self, slug: &str) -> Result<bool> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM posts WHERE slug = ?")
            .bind(slug)
            .fetch_one(&self.pool)
            .await
            .context("Failed to check post slug existence")?;

        let count: i64 = row.get("count");
        Ok(count > 0)
    }

    async fn exists_by_slug_excluding(&self, slug: &str, exclude_id: i64) -> Result<bool> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM posts WHERE slug = ? AND id != ?")
            .bind(slug)
            .bind(exclude_id)
            .fetch_one(&self.pool)
            .await
            .context("Failed to check post slug existence")?;

        let count: i64 = row.get("count");
        Ok(count > 0)
    }

    async fn set_tags(&self, post_id: i64, tag_ids: &[i64]) -> Result<()> {
        sqlx::query("DELETE FROM post_tags WHERE post_id = ?")
            .bind(post_id)
            .execute(&self.pool)
            .await
            .context("Failed to clear post tags")?;

        for tag_id in tag_ids {
            sqlx::query("INSERT OR IGNORE INTO post_tags (post_id, tag_id) VALUES (?, ?)")
                .bind(post_id)
                .bind(tag_id)
                .execute(&self.pool)
                .await
                .context("Failed to attach post tag")?;
        }

        Ok(())
    }
}

fn row_to_post(row: &SqliteRow) -> Result<Post> {
    let status: String = row.get("status");

    Ok(Post {
        id: row.get("id"),
        slug: row.get("slug"),
        title: row.get("title"),
        excerpt: row.get("excerpt"),
        content: row.get("content"),
        content_html: row.get("content_html"),
        author_id: row.get("author_id"),
        category_id: row.get("category_id"),
        status: PostStatus::from_str(&status)
            .ok_or_else(|| anyhow::anyhow!("Invalid post status: {}", status))?,
        published_date: row.get("published_date"),
        read_time: row.get("read_time"),
        image: row.get("image"),
        views: row.get("views"),
        likes: row.get("likes"),
        featured: row.get("featured"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}
