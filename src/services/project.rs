//! Project service
//!
//! Business logic for NEABI projects. The public page only lists active
//! projects; the admin screen sees everything.

use crate::db::repositories::ProjectRepository;
use crate::models::{CreateProjectInput, Project, UpdateProjectInput};
use crate::services::slug::{candidate, slugify};
use anyhow::{Context, Result};
use chrono::Utc;
use std::sync::Arc;

/// Error types for project service operations
#[derive(Debug, thiserror::Error)]
pub enum ProjectServiceError {
    /// Project not found
    #[error("Project not found: {0}")]
    NotFound(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Project service
pub struct ProjectService {
    repo: Arc<dyn ProjectRepository>,
}

impl ProjectService {
    pub fn new(repo: Arc<dyn ProjectRepository>) -> Self {
        Self { repo }
    }

    /// Create a new project.
    pub async fn create(&self, input: CreateProjectInput) -> Result<Project, ProjectServiceError> {
        if input.title.trim().is_empty() {
            return Err(ProjectServiceError::ValidationError(
                "Title cannot be empty".to_string(),
            ));
        }
        if input.description.trim().is_empty() {
            return Err(ProjectServiceError::ValidationError(
                "Description cannot be empty".to_string(),
            ));
        }

        let base = slugify(input.slug.as_deref().unwrap_or(&input.title));
        if base.is_empty() {
            return Err(ProjectServiceError::ValidationError(
                "Title does not produce a valid slug".to_string(),
            ));
        }
        let slug = self.unique_slug(&base, None).await?;

        let now = Utc::now();
        let project = Project {
            id: 0,
            slug,
            title: input.title,
            description: input.description,
            image: input.image,
            category_id: input.category_id,
            link_to_join: input.link_to_join,
            is_active: input.is_active,
            featured: input.featured,
            created_at: now,
            updated_at: now,
        };

        let created = self
            .repo
            .create(&project)
            .await
            .context("Failed to create project")?;

        if !input.tag_ids.is_empty() {
            self.repo
                .set_tags(created.id, &input.tag_ids)
                .await
                .context("Failed to attach tags")?;
        }

        Ok(created)
    }

    /// Get a project by slug.
    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<Project>, ProjectServiceError> {
        self.repo
            .get_by_slug(slug)
            .await
            .context("Failed to get project")
            .map_err(Into::into)
    }

    /// Get a project by ID (admin screens address projects by ID).
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Project>, ProjectServiceError> {
        self.repo
            .get_by_id(id)
            .await
            .context("Failed to get project")
            .map_err(Into::into)
    }

    /// Active projects for the public page, newest first.
    pub async fn list_active(&self) -> Result<Vec<Project>, ProjectServiceError> {
        self.repo
            .list_active()
            .await
            .context("Failed to list active projects")
            .map_err(Into::into)
    }

    /// All projects for the admin screen.
    pub async fn list(&self) -> Result<Vec<Project>, ProjectServiceError> {
        self.repo
            .list()
            .await
            .context("Failed to list projects")
            .map_err(Into::into)
    }

    /// Update a project. A changed title regenerates the slug.
    pub async fn update(
        &self,
        id: i64,
        input: UpdateProjectInput,
    ) -> Result<Project, ProjectServiceError> {
        let mut project = self
            .repo
            .get_by_id(id)
            .await
            .context("Failed to get project")?
            .ok_or_else(|| {
                ProjectServiceError::NotFound(format!("Project with ID {} not found", id))
            })?;

        if let Some(title) = input.title {
            if title.trim().is_empty() {
                return Err(ProjectServiceError::ValidationError(
                    "Title cannot be empty".to_string(),
                ));
            }
            if title != project.title {
                let base = slugify(&title);
                if base.is_empty() {
                    return Err(ProjectServiceError::ValidationError(
                        "Title does not produce a valid slug".to_string(),
                    ));
                }
                project.slug = self.unique_slug(&base, Some(id)).await?;
                project.title = title;
            }
        }

        if let Some(description) = input.description {
            project.description = description;
        }
        if let Some(image) = input.image {
            project.image = Some(image);
        }
        if let Some(category_id) = input.category_id {
            project.category_id = category_id;
        }
        if let Some(link_to_join) = input.link_to_join {
            project.link_to_join = link_to_join;
        }
        if let Some(is_active) = input.is_active {
            project.is_active = is_active;
        }
        if let Some(featured) = input.featured {
            project.featured = featured;
        }

        project.updated_at = Utc::now();

        let updated = self
            .repo
            .update(&project)
            .await
            .context("Failed to update project")?;

        if let Some(ref tag_ids) = input.tag_ids {
            self.repo
                .set_tags(updated.id, tag_ids)
                .await
                .context("Failed to replace tags")?;
        }

        Ok(updated)
    }

    /// Delete a project.
    pub async fn delete(&self, id: i64) -> Result<(), ProjectServiceError> {
        if self
            .repo
            .get_by_id(id)
            .await
            .context("Failed to get project")?
            .is_none()
        {
            return Err(ProjectServiceError::NotFound(format!(
                "Project with ID {} not found",
                id
            )));
        }

        self.repo
            .delete(id)
            .await
            .context("Failed to delete project")?;

        Ok(())
    }

    async fn unique_slug(
        &self,
        base: &str,
        exclude_id: Option<i64>,
    ) -> Result<String, ProjectServiceError> {
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
    use crate::db::repositories::SqlxProjectRepository;
    use crate::db::{create_test_pool, migrations};

    async fn setup() -> ProjectService {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        ProjectService::new(SqlxProjectRepository::boxed(pool))
    }

    fn sample_input(title: &str, active: bool) -> CreateProjectInput {
        CreateProjectInput {
            title: title.to_string(),
            slug: None,
            description: "Projeto de extensão".to_string(),
            image: None,
            category_id: None,
            link_to_join: None,
            is_active: active,
            featured: false,
            tag_ids: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_create_generates_slug() {
        let service = setup().await;

        let project = service
            .create(sample_input("Letramento Racial", true))
            .await
            .expect("create");

        assert_eq!(project.slug, "letramento-racial");
        assert!(project.is_active);
    }

    #[tokio::test]
    async fn test_same_title_gets_distinct_slugs() {
        let service = setup().await;

        let first = service
            .create(sample_input("Projeto", true))
            .await
            .expect("create");
        let second = service
            .create(sample_input("Projeto", true))
            .await
            .expect("create");

        assert_eq!(first.slug, "projeto");
        assert_eq!(second.slug, "projeto-1");
    }

    #[tokio::test]
    async fn test_public_list_hides_inactive() {
        let service = setup().await;
        service
            .create(sample_input("Ativo", true))
            .await
            .expect("create");
        service
            .create(sample_input("Inativo", false))
            .await
            .expect("create");

        let active = service.list_active().await.expect("list");
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].title, "Ativo");

        let all = service.list().await.expect("list");
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_update_title_regenerates_slug() {
        let service = setup().await;
        let project = service
            .create(sample_input("Antigo", true))
            .await
            .expect("create");

        let updated = service
            .update(
                project.id,
                UpdateProjectInput {
                    title: Some("Novo Nome".to_string()),
                    ..Default::default()
                },
            )
            .await
            .expect("update");

        assert_eq!(updated.slug, "novo-nome");
    }

    #[tokio::test]
    async fn test_deactivate_via_update() {
        let service = setup().await;
        let project = service
            .create(sample_input("Pausado", true))
            .await
            .expect("create");

        service
            .update(
                project.id,
                UpdateProjectInput {
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .expect("update");

        assert!(service.list_active().await.expect("list").is_empty());
    }

    #[tokio::test]
    async fn test_delete_missing_fails() {
        let service = setup().await;
        let result = service.delete(9999).await;
        assert!(matches!(result, Err(ProjectServiceError::NotFound(_))));
    }
}
