//! Post service
//!
//! Business logic for blog posts:
//! - Creation with slug generation and markdown rendering
//! - Public visibility rules (published only, drafts and archived are
//!   invisible to list, search and detail)
//! - View counting on detail fetches and like counting
//! - Slug regeneration when the title changes on update

use crate::db::repositories::{CategoryRepository, PostRepository};
use crate::models::{
    CreatePostInput, ListParams, PagedResult, Post, PostFilter, PostStatus, UpdatePostInput,
};
use crate::services::markdown::MarkdownRenderer;
use crate::services::slug::{candidate, slugify};
use anyhow::{Context, Result};
use chrono::Utc;
use std::sync::Arc;

/// Maximum excerpt length, matching the original form constraint
const MAX_EXCERPT_LEN: usize = 300;

/// Error types for post service operations
#[derive(Debug, thiserror::Error)]
pub enum PostServiceError {
    /// Post not found (or not visible to the public)
    #[error("Post not found: {0}")]
    NotFound(String),

    /// Referenced category does not exist
    #[error("Category not found: {0}")]
    CategoryNotFound(i64),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Post service
pub struct PostService {
    repo: Arc<dyn PostRepository>,
    category_repo: Arc<dyn CategoryRepository>,
    markdown: MarkdownRenderer,
}

impl PostService {
    pub fn new(repo: Arc<dyn PostRepository>, category_repo: Arc<dyn CategoryRepository>) -> Self {
        Self {
            repo,
            category_repo,
            markdown: MarkdownRenderer::new(),
        }
    }

    /// Create a new post.
    pub async fn create(&self, input: CreatePostInput) -> Result<Post, PostServiceError> {
        self.validate_create_input(&input)?;

        if self
            .category_repo
            .get_by_id(input.category_id)
            .await
            .context("Failed to check category")?
            .is_none()
        {
            return Err(PostServiceError::CategoryNotFound(input.category_id));
        }

        let base = slugify(input.slug.as_deref().unwrap_or(&input.title));
        if base.is_empty() {
            return Err(PostServiceError::ValidationError(
                "Title does not produce a valid slug".to_string(),
            ));
        }
        let slug = self.unique_slug(&base, None).await?;

        let now = Utc::now();
        let post = Post {
            id: 0,
            slug,
            title: input.title,
            excerpt: input.excerpt,
            content_html: self.markdown.render(&input.content),
            content: input.content,
            author_id: input.author_id,
            category_id: input.category_id,
            status: input.status.unwrap_or_default(),
            published_date: now,
            read_time: input.read_time.unwrap_or_else(|| "5 min".to_string()),
            image: input.image,
            views: 0,
            likes: 0,
            featured: input.featured,
            created_at: now,
            updated_at: now,
        };

        let created = self.repo.create(&post).await.context("Failed to create post")?;

        if !input.tag_ids.is_empty() {
            self.repo
                .set_tags(created.id, &input.tag_ids)
                .await
                .context("Failed to attach tags")?;
        }

        Ok(created)
    }

    /// Fetch a published post by slug for public display, incrementing its
    /// view counter. Draft and archived posts resolve to `NotFound` so they
    /// never leak.
    pub async fn get_published_by_slug(&self, slug: &str) -> Result<Post, PostServiceError> {
        let post = self
            .repo
            .get_by_slug(slug)
            .await
            .context("Failed to get post")?
            .filter(|p| p.status == PostStatus::Published)
            .ok_or_else(|| PostServiceError::NotFound(slug.to_string()))?;

        self.repo
            .increment_views(post.id)
            .await
            .context("Failed to increment views")?;

        // Return the counter the reader just caused
        let mut post = post;
        post.views += 1;
        Ok(post)
    }

    /// Like a published post.
    pub async fn like(&self, slug: &str) -> Result<i64, PostServiceError> {
        let post = self
            .repo
            .get_by_slug(slug)
            .await
            .context("Failed to get post")?
            .filter(|p| p.status == PostStatus::Published)
            .ok_or_else(|| PostServiceError::NotFound(slug.to_string()))?;

        self.repo
            .increment_likes(post.id)
            .await
            .context("Failed to increment likes")?;

        Ok(post.likes + 1)
    }

    /// Get a post by slug regardless of status (admin screens).
    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<Post>, PostServiceError> {
        self.repo
            .get_by_slug(slug)
            .await
            .context("Failed to get post")
            .map_err(Into::into)
    }

    /// Public listing: published posts only, filtered and paginated.
    pub async fn list_published(
        &self,
        filter: &PostFilter,
        params: &ListParams,
    ) -> Result<PagedResult<Post>, PostServiceError> {
        let items = self
            .repo
            .list_published(filter, params.offset(), params.limit())
            .await
            .context("Failed to list published posts")?;
        let total = self
            .repo
            .count_published(filter)
            .await
            .context("Failed to count published posts")?;

        Ok(PagedResult::new(items, total, params))
    }

    /// Featured published posts for the highlight strip.
    pub async fn list_featured(&self, limit: i64) -> Result<Vec<Post>, PostServiceError> {
        self.repo
            .list_featured(limit)
            .await
            .context("Failed to list featured posts")
            .map_err(Into::into)
    }

    /// Admin listing: every status, newest-created first.
    pub async fn list(&self, params: &ListParams) -> Result<PagedResult<Post>, PostServiceError> {
        let items = self
            .repo
            .list(params.offset(), params.limit())
            .await
            .context("Failed to list posts")?;
        let total = self.repo.count().await.context("Failed to count posts")?;

        Ok(PagedResult::new(items, total, params))
    }

    /// Most recently created posts (dashboard).
    pub async fn list_recent(&self, limit: i64) -> Result<Vec<Post>, PostServiceError> {
        self.repo
            .list_recent(limit)
            .await
            .context("Failed to list recent posts")
            .map_err(Into::into)
    }

    /// Total and published post counts (dashboard).
    pub async fn counts(&self) -> Result<(i64, i64), PostServiceError> {
        let total = self.repo.count().await.context("Failed to count posts")?;
        let published = self
            .repo
            .count_published(&PostFilter::default())
            .await
            .context("Failed to count published posts")?;
        Ok((total, published))
    }

    /// Update a post. A changed title regenerates the slug; changed content
    /// is re-rendered.
    pub async fn update(
        &self,
        slug: &str,
        input: UpdatePostInput,
    ) -> Result<Post, PostServiceError> {
        let mut post = self
            .repo
            .get_by_slug(slug)
            .await
            .context("Failed to get post")?
            .ok_or_else(|| PostServiceError::NotFound(slug.to_string()))?;

        if let Some(title) = input.title {
            if title.trim().is_empty() {
                return Err(PostServiceError::ValidationError(
                    "Title cannot be empty".to_string(),
                ));
            }
            if title != post.title {
                let base = slugify(&title);
                if base.is_empty() {
                    return Err(PostServiceError::ValidationError(
                        "Title does not produce a valid slug".to_string(),
                    ));
                }
                post.slug = self.unique_slug(&base, Some(post.id)).await?;
                post.title = title;
            }
        }

        if let Some(excerpt) = input.excerpt {
            if excerpt.chars().count() > MAX_EXCERPT_LEN {
                return Err(PostServiceError::ValidationError(format!(
                    "Excerpt must be at most {} characters",
                    MAX_EXCERPT_LEN
                )));
            }
            post.excerpt = excerpt;
        }

        if let Some(content) = input.content {
            post.content_html = self.markdown.render(&content);
            post.content = content;
        }

        if let Some(category_id) = input.category_id {
            if self
                .category_repo
                .get_by_id(category_id)
                .await
                .context("Failed to check category")?
                .is_none()
            {
                return Err(PostServiceError::CategoryNotFound(category_id));
            }
            post.category_id = category_id;
        }

        if let Some(status) = input.status {
            post.status = status;
        }
        if let Some(read_time) = input.read_time {
            post.read_time = read_time;
        }
        if let Some(image) = input.image {
            post.image = Some(image);
        }
        if let Some(featured) = input.featured {
            post.featured = featured;
        }

        post.updated_at = Utc::now();

        let updated = self.repo.update(&post).await.context("Failed to update post")?;

        if let Some(ref tag_ids) = input.tag_ids {
            self.repo
                .set_tags(updated.id, tag_ids)
                .await
                .context("Failed to replace tags")?;
        }

        Ok(updated)
    }

    /// Delete a post by slug.
    pub async fn delete(&self, slug: &str) -> Result<(), PostServiceError> {
        let post = self
            .repo
            .get_by_slug(slug)
            .await
            .context("Failed to get post")?
            .ok_or_else(|| PostServiceError::NotFound(slug.to_string()))?;

        self.repo
            .delete(post.id)
            .await
            .context("Failed to delete post")?;

        Ok(())
    }

    fn validate_create_input(&self, input: &CreatePostInput) -> Result<(), PostServiceError> {
        if input.title.trim().is_empty() {
            return Err(PostServiceError::ValidationError(
                "Title cannot be empty".to_string(),
            ));
        }
        if input.content.trim().is_empty() {
            return Err(PostServiceError::ValidationError(
                "Content cannot be empty".to_string(),
            ));
        }
        if input.excerpt.chars().count() > MAX_EXCERPT_LEN {
            return Err(PostServiceError::ValidationError(format!(
                "Excerpt must be at most {} characters",
                MAX_EXCERPT_LEN
            )));
        }
        Ok(())
    }

    async fn unique_slug(
        &self,
        base: &str,
        exclude_id: Option<i64>,
    ) -> Result<String, PostServiceError> {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::create_cache;
    use crate::config::CacheConfig;
    use crate::db::repositories::{
        SqlxCategoryRepository, SqlxPostRepository,
    };
    use crate::db::{create_test_pool, migrations};
    use crate::models::CreateCategoryInput;
    use crate::services::category::CategoryService;

    async fn setup() -> (PostService, i64) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let category_repo = SqlxCategoryRepository::boxed(pool.clone());
        let category_service = CategoryService::new(
            category_repo.clone(),
            create_cache(&CacheConfig::default()),
        );
        let category = category_service
            .create(CreateCategoryInput::new("Educação"))
            .await
            .expect("Failed to create category");

        let service = PostService::new(SqlxPostRepository::boxed(pool), category_repo);
        (service, category.id)
    }

    fn sample_input(title: &str, category_id: i64) -> CreatePostInput {
        CreatePostInput {
            title: title.to_string(),
            slug: None,
            excerpt: "Resumo do post".to_string(),
            content: "Conteúdo **completo** do post".to_string(),
            author_id: None,
            category_id,
            status: None,
            read_time: None,
            image: None,
            featured: false,
            tag_ids: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_create_generates_slug_and_html() {
        let (service, category_id) = setup().await;

        let post = service
            .create(sample_input("Primeiro Post", category_id))
            .await
            .expect("create should succeed");

        assert_eq!(post.slug, "primeiro-post");
        assert_eq!(post.status, PostStatus::Published);
        assert!(post.content_html.contains("<strong>completo</strong>"));
        assert_eq!(post.views, 0);
    }

    #[tokio::test]
    async fn test_same_title_gets_distinct_slugs() {
        let (service, category_id) = setup().await;

        let first = service
            .create(sample_input("Evento", category_id))
            .await
            .expect("create");
        let second = service
            .create(sample_input("Evento", category_id))
            .await
            .expect("create");

        assert_eq!(first.slug, "evento");
        assert_eq!(second.slug, "evento-1");
    }

    #[tokio::test]
    async fn test_create_unknown_category_fails() {
        let (service, _) = setup().await;

        let result = service.create(sample_input("Post", 99999)).await;
        assert!(matches!(result, Err(PostServiceError::CategoryNotFound(_))));
    }

    #[tokio::test]
    async fn test_create_long_excerpt_fails() {
        let (service, category_id) = setup().await;

        let mut input = sample_input("Post", category_id);
        input.excerpt = "x".repeat(301);
        let result = service.create(input).await;
        assert!(matches!(result, Err(PostServiceError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_detail_increments_views_once_per_fetch() {
        let (service, category_id) = setup().await;
        service
            .create(sample_input("Contagem", category_id))
            .await
            .expect("create");

        let first = service
            .get_published_by_slug("contagem")
            .await
            .expect("fetch");
        assert_eq!(first.views, 1);

        let second = service
            .get_published_by_slug("contagem")
            .await
            .expect("fetch");
        assert_eq!(second.views, 2);
    }

    #[tokio::test]
    async fn test_draft_is_invisible_to_public_detail() {
        let (service, category_id) = setup().await;

        let mut input = sample_input("Rascunho", category_id);
        input.status = Some(PostStatus::Draft);
        service.create(input).await.expect("create");

        let result = service.get_published_by_slug("rascunho").await;
        assert!(matches!(result, Err(PostServiceError::NotFound(_))));

        // Still visible to the admin lookup
        assert!(service
            .get_by_slug("rascunho")
            .await
            .expect("get")
            .is_some());
    }

    #[tokio::test]
    async fn test_public_list_excludes_non_published() {
        let (service, category_id) = setup().await;

        service
            .create(sample_input("Publicado", category_id))
            .await
            .expect("create");

        let mut draft = sample_input("Rascunho", category_id);
        draft.status = Some(PostStatus::Draft);
        service.create(draft).await.expect("create");

        let mut archived = sample_input("Arquivado", category_id);
        archived.status = Some(PostStatus::Archived);
        service.create(archived).await.expect("create");

        let page = service
            .list_published(&PostFilter::default(), &ListParams::new(1, 9))
            .await
            .expect("list");

        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].title, "Publicado");
    }

    #[tokio::test]
    async fn test_search_matches_title_and_content() {
        let (service, category_id) = setup().await;

        let mut input = sample_input("História dos Quilombos", category_id);
        input.content = "Resistência e memória".to_string();
        service.create(input).await.expect("create");
        service
            .create(sample_input("Outro assunto", category_id))
            .await
            .expect("create");

        let filter = PostFilter {
            search: Some("Quilombos".to_string()),
            category: None,
        };
        let page = service
            .list_published(&filter, &ListParams::new(1, 9))
            .await
            .expect("list");
        assert_eq!(page.total, 1);

        let filter = PostFilter {
            search: Some("memória".to_string()),
            category: None,
        };
        let page = service
            .list_published(&filter, &ListParams::new(1, 9))
            .await
            .expect("list");
        assert_eq!(page.total, 1);

        let filter = PostFilter {
            search: Some("inexistente".to_string()),
            category: None,
        };
        let page = service
            .list_published(&filter, &ListParams::new(1, 9))
            .await
            .expect("list");
        assert_eq!(page.total, 0);
    }

    #[tokio::test]
    async fn test_category_filter() {
        let (service, category_id) = setup().await;

        service
            .create(sample_input("Na categoria", category_id))
            .await
            .expect("create");

        let filter = PostFilter {
            search: None,
            category: Some("Educação".to_string()),
        };
        let page = service
            .list_published(&filter, &ListParams::new(1, 9))
            .await
            .expect("list");
        assert_eq!(page.total, 1);

        let filter = PostFilter {
            search: None,
            category: Some("Outra".to_string()),
        };
        let page = service
            .list_published(&filter, &ListParams::new(1, 9))
            .await
            .expect("list");
        assert_eq!(page.total, 0);
    }

    #[tokio::test]
    async fn test_update_title_regenerates_slug() {
        let (service, category_id) = setup().await;
        service
            .create(sample_input("Título Antigo", category_id))
            .await
            .expect("create");

        let updated = service
            .update(
                "título-antigo",
                UpdatePostInput {
                    title: Some("Título Novo".to_string()),
                    ..Default::default()
                },
            )
            .await
            .expect("update");

        assert_eq!(updated.slug, "título-novo");
        assert_eq!(updated.title, "Título Novo");
    }

    #[tokio::test]
    async fn test_update_content_rerenders_html() {
        let (service, category_id) = setup().await;
        service
            .create(sample_input("Post", category_id))
            .await
            .expect("create");

        let updated = service
            .update(
                "post",
                UpdatePostInput {
                    content: Some("Novo *texto*".to_string()),
                    ..Default::default()
                },
            )
            .await
            .expect("update");

        assert!(updated.content_html.contains("<em>texto</em>"));
    }

    #[tokio::test]
    async fn test_like_increments() {
        let (service, category_id) = setup().await;
        service
            .create(sample_input("Curtidas", category_id))
            .await
            .expect("create");

        assert_eq!(service.like("curtidas").await.expect("like"), 1);
        assert_eq!(service.like("curtidas").await.expect("like"), 2);
    }

    #[tokio::test]
    async fn test_delete() {
        let (service, category_id) = setup().await;
        service
            .create(sample_input("Apagar", category_id))
            .await
            .expect("create");

        service.delete("apagar").await.expect("delete");
        assert!(service.get_by_slug("apagar").await.expect("get").is_none());

        let result = service.delete("apagar").await;
        assert!(matches!(result, Err(PostServiceError::NotFound(_))));
    }
}
