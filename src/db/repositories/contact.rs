//! Contact message repository
//!
//! Messages are append-only: the only mutation after creation is the
//! `is_read` flag.

use crate::db::DbPool;
use crate::models::ContactMessage;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use std::sync::Arc;

/// Contact message repository trait
#[async_trait]
pub trait ContactRepository: Send + Sync {
    /// Store a new message, returning it with its assigned ID
    async fn create(&self, message: &ContactMessage) -> Result<ContactMessage>;

    /// Get message by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<ContactMessage>>;

    /// List messages, newest first
    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<ContactMessage>>;

    /// Count all messages
    async fn count(&self) -> Result<i64>;

    /// Count unread messages
    async fn count_unread(&self) -> Result<i64>;

    /// Most recent unread messages (dashboard)
    async fn list_recent_unread(&self, limit: i64) -> Result<Vec<ContactMessage>>;

    /// Set the `is_read` flag. Idempotent.
    async fn mark_read(&self, id: i64) -> Result<()>;
}

/// SQLx-based contact repository implementation
pub struct SqlxContactRepository {
    pool: DbPool,
}

impl SqlxContactRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DbPool) -> Arc<dyn ContactRepository> {
        Arc::new(Self::new(pool))
    }
}

const CONTACT_COLUMNS: &str = "id, name, email, subject, message, is_read, created_at";

#[async_trait]
impl ContactRepository for SqlxContactRepository {
    async fn create(&self, message: &ContactMessage) -> Result<ContactMessage> {
        let result = sqlx::query(
            r#"
            INSERT INTO contact_messages (name, email, subject, message, is_read, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&message.name)
        .bind(&message.email)
        .bind(&message.subject)
        .bind(&message.message)
        .bind(message.is_read)
        .bind(message.created_at)
        .execute(&self.pool)
        .await
        .context("Failed to create contact message")?;

        let mut created = message.clone();
        created.id = result.last_insert_rowid();
        Ok(created)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<ContactMessage>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM contact_messages WHERE id = ?",
            CONTACT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get contact message by ID")?;

        row.map(|r| row_to_message(&r)).transpose()
    }

    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<ContactMessage>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM contact_messages ORDER BY created_at DESC LIMIT ? OFFSET ?",
            CONTACT_COLUMNS
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list contact messages")?;

        rows.iter().map(row_to_message).collect()
    }

    async fn count(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM contact_messages")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count contact messages")?;

        Ok(row.get("count"))
    }

    async fn count_unread(&self) -> Result<i64> {
        let row =
            sqlx::query("SELECT COUNT(*) as count FROM contact_messages WHERE is_read = FALSE")
                .fetch_one(&self.pool)
                .await
                .context("Failed to count unread contact messages")?;

        Ok(row.get("count"))
    }

    async fn list_recent_unread(&self, limit: i64) -> Result<Vec<ContactMessage>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM contact_messages WHERE is_read = FALSE ORDER BY created_at DESC LIMIT ?",
            CONTACT_COLUMNS
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list unread contact messages")?;

        rows.iter().map(row_to_message).collect()
    }

    async fn mark_read(&self, id: i64) -> Result<()> {
        sqlx::query("UPDATE contact_messages SET is_read = TRUE WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to mark contact message read")?;

        Ok(())
    }
}

fn row_to_message(row: &SqliteRow) -> Result<ContactMessage> {
    Ok(ContactMessage {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        subject: row.get("subject"),
        message: row.get("message"),
        is_read: row.get("is_read"),
        created_at: row.get("created_at"),
    })
}
