//! Contact message service
//!
//! Handles the public contact form and the admin-side message list.
//! Messages are never created from the admin area and never edited; the
//! only mutation is marking them read, which is idempotent.

use crate::db::repositories::ContactRepository;
use crate::models::{ContactMessage, CreateContactMessageInput, ListParams, PagedResult};
use anyhow::{Context, Result};
use chrono::Utc;
use std::sync::Arc;

/// Error types for contact service operations
#[derive(Debug, thiserror::Error)]
pub enum ContactServiceError {
    /// Message not found
    #[error("Message not found: {0}")]
    NotFound(i64),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Contact message service
pub struct ContactService {
    repo: Arc<dyn ContactRepository>,
}

impl ContactService {
    pub fn new(repo: Arc<dyn ContactRepository>) -> Self {
        Self { repo }
    }

    /// Submit a message from the public contact form.
    ///
    /// All fields are required; nothing is persisted on invalid input.
    pub async fn submit(
        &self,
        input: CreateContactMessageInput,
    ) -> Result<ContactMessage, ContactServiceError> {
        if input.name.trim().is_empty() {
            return Err(ContactServiceError::ValidationError(
                "Name is required".to_string(),
            ));
        }
        if input.email.trim().is_empty() || !input.email.contains('@') {
            return Err(ContactServiceError::ValidationError(
                "A valid email address is required".to_string(),
            ));
        }
        if input.subject.trim().is_empty() {
            return Err(ContactServiceError::ValidationError(
                "Subject is required".to_string(),
            ));
        }
        if input.message.trim().is_empty() {
            return Err(ContactServiceError::ValidationError(
                "Message is required".to_string(),
            ));
        }

        let message = ContactMessage {
            id: 0,
            name: input.name,
            email: input.email,
            subject: input.subject,
            message: input.message,
            is_read: false,
            created_at: Utc::now(),
        };

        self.repo
            .create(&message)
            .await
            .context("Failed to store contact message")
            .map_err(Into::into)
    }

    /// Admin listing: newest first.
    pub async fn list(
        &self,
        params: &ListParams,
    ) -> Result<PagedResult<ContactMessage>, ContactServiceError> {
        let items = self
            .repo
            .list(params.offset(), params.limit())
            .await
            .context("Failed to list messages")?;
        let total = self.repo.count().await.context("Failed to count messages")?;

        Ok(PagedResult::new(items, total, params))
    }

    /// Number of unread messages.
    pub async fn count_unread(&self) -> Result<i64, ContactServiceError> {
        self.repo
            .count_unread()
            .await
            .context("Failed to count unread messages")
            .map_err(Into::into)
    }

    /// Most recent unread messages (dashboard).
    pub async fn list_recent_unread(
        &self,
        limit: i64,
    ) -> Result<Vec<ContactMessage>, ContactServiceError> {
        self.repo
            .list_recent_unread(limit)
            .await
            .context("Failed to list unread messages")
            .map_err(Into::into)
    }

    /// Mark a message read. Marking an already-read message is a no-op.
    pub async fn mark_read(&self, id: i64) -> Result<ContactMessage, ContactServiceError> {
        if self
            .repo
            .get_by_id(id)
            .await
            .context("Failed to get message")?
            .is_none()
        {
            return Err(ContactServiceError::NotFound(id));
        }

        self.repo
            .mark_read(id)
            .await
            .context("Failed to mark message read")?;

        self.repo
            .get_by_id(id)
            .await
            .context("Failed to reload message")?
            .ok_or(ContactServiceError::NotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::SqlxContactRepository;
    use crate::db::{create_test_pool, migrations};

    async fn setup() -> ContactService {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        ContactService::new(SqlxContactRepository::boxed(pool))
    }

    fn sample_input() -> CreateContactMessageInput {
        CreateContactMessageInput {
            name: "Maria".to_string(),
            email: "maria@example.com".to_string(),
            subject: "Dúvida".to_string(),
            message: "Como participo dos eventos?".to_string(),
        }
    }

    #[tokio::test]
    async fn test_submit_starts_unread() {
        let service = setup().await;

        let message = service.submit(sample_input()).await.expect("submit");
        assert!(!message.is_read);
        assert!(message.id > 0);
    }

    #[tokio::test]
    async fn test_submit_missing_fields_persists_nothing() {
        let service = setup().await;

        let mut input = sample_input();
        input.message = "  ".to_string();
        let result = service.submit(input).await;
        assert!(matches!(
            result,
            Err(ContactServiceError::ValidationError(_))
        ));

        let page = service.list(&ListParams::new(1, 20)).await.expect("list");
        assert_eq!(page.total, 0);
    }

    #[tokio::test]
    async fn test_submit_invalid_email_fails() {
        let service = setup().await;

        let mut input = sample_input();
        input.email = "sem-arroba".to_string();
        let result = service.submit(input).await;
        assert!(matches!(
            result,
            Err(ContactServiceError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn test_mark_read_is_idempotent() {
        let service = setup().await;
        let message = service.submit(sample_input()).await.expect("submit");

        let once = service.mark_read(message.id).await.expect("mark read");
        assert!(once.is_read);

        // Second call succeeds and leaves the flag set
        let twice = service.mark_read(message.id).await.expect("mark read again");
        assert!(twice.is_read);

        assert_eq!(service.count_unread().await.expect("count"), 0);
    }

    #[tokio::test]
    async fn test_mark_read_unknown_fails() {
        let service = setup().await;
        let result = service.mark_read(555).await;
        assert!(matches!(result, Err(ContactServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_unread_count_tracks_submissions() {
        let service = setup().await;

        let first = service.submit(sample_input()).await.expect("submit");
        service.submit(sample_input()).await.expect("submit");
        assert_eq!(service.count_unread().await.expect("count"), 2);

        service.mark_read(first.id).await.expect("mark read");
        assert_eq!(service.count_unread().await.expect("count"), 1);
    }
}
