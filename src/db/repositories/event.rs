//! Event repository
//!
//! Database operations for events. Public listings exclude cancelled
//! events and run in chronological order; the registration counter is a
//! single-statement update.

use crate::db::DbPool;
use crate::models::{Event, EventFilter, EventStatus, EventType};
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use std::sync::Arc;

/// Event repository trait
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Create a new event, returning it with its assigned ID
    async fn create(&self, event: &Event) -> Result<Event>;

    /// Get event by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Event>>;

    /// Get event by slug
    async fn get_by_slug(&self, slug: &str) -> Result<Option<Event>>;

    /// List events for the admin screen, newest-created first
    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<Event>>;

    /// Count all events
    async fn count(&self) -> Result<i64>;

    /// List non-cancelled events matching the filter, chronological
    async fn list_public(&self, filter: &EventFilter, offset: i64, limit: i64)
        -> Result<Vec<Event>>;

    /// Count non-cancelled events matching the filter
    async fn count_public(&self, filter: &EventFilter) -> Result<i64>;

    /// Featured upcoming events for the highlight strip
    async fn list_featured_upcoming(&self, limit: i64) -> Result<Vec<Event>>;

    /// Next upcoming events (dashboard)
    async fn list_upcoming(&self, limit: i64) -> Result<Vec<Event>>;

    /// Persist changes to an existing event
    async fn update(&self, event: &Event) -> Result<Event>;

    /// Delete an event
    async fn delete(&self, id: i64) -> Result<()>;

    /// Increment the registration counter by one
    async fn increment_registered(&self, id: i64) -> Result<()>;

    /// Check if a slug already exists
    async fn exists_by_slug(&self, slug: &str) -> Result<bool>;

    /// Check if a slug exists for a different event (for updates)
    async fn exists_by_slug_excluding(&self, slug: &str, exclude_id: i64) -> Result<bool>;

    /// Replace the set of tags attached to an event
    async fn set_tags(&self, event_id: i64, tag_ids: &[i64]) -> Result<()>;
}

/// SQLx-based event repository implementation
pub struct SqlxEventRepository {
    pool: DbPool,
}

impl SqlxEventRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DbPool) -> Arc<dyn EventRepository> {
        Arc::new(Self::new(pool))
    }
}

const EVENT_COLUMNS: &str = "id, slug, title, description, date, start_time, end_time, location, category_id, event_type, status, capacity, registered, organizer, speakers, image, featured, registration_required, price, registration_link, created_at, updated_at";

#[async_trait]
impl EventRepository for SqlxEventRepository {
    async fn create(&self, event: &Event) -> Result<Event> {
        let result = sqlx::query(
            r#"
            INSERT INTO events (slug, title, description, date, start_time, end_time, location, category_id, event_type, status, capacity, registered, organizer, speakers, image, featured, registration_required, price, registration_link, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&event.slug)
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.date)
        .bind(event.start_time)
        .bind(event.end_time)
        .bind(&event.location)
        .bind(event.category_id)
        .bind(event.event_type.as_str())
        .bind(event.status.as_str())
        .bind(event.capacity)
        .bind(event.registered)
        .bind(&event.organizer)
        .bind(&event.speakers)
        .bind(&event.image)
        .bind(event.featured)
        .bind(event.registration_required)
        .bind(&event.price)
        .bind(&event.registration_link)
        .bind(event.created_at)
        .bind(event.updated_at)
        .execute(&self.pool)
        .await
        .context("Failed to create event")?;

        let mut created = event.clone();
        created.id = result.last_insert_rowid();
        Ok(created)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Event>> {
        let row = sqlx::query(&format!("SELECT {} FROM events WHERE id = ?", EVENT_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to get event by ID")?;

        row.map(|r| row_to_event(&r)).transpose()
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Option<Event>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM events WHERE slug = ?",
            EVENT_COLUMNS
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get event by slug")?;

        row.map(|r| row_to_event(&r)).transpose()
    }

    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<Event>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM events ORDER BY created_at DESC LIMIT ? OFFSET ?",
            EVENT_COLUMNS
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list events")?;

        rows.iter().map(row_to_event).collect()
    }

    async fn count(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM events")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count events")?;

        Ok(row.get("count"))
    }

    async fn list_public(
        &self,
        filter: &EventFilter,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Event>> {
        let category_id = filter.category_id.unwrap_or(0);
        let event_type = filter
            .event_type
            .map(|t| t.as_str().to_string())
            .unwrap_or_default();

        let rows = sqlx::query(&format!(
            r#"
            SELECT {}
            FROM events
            WHERE status != 'cancelled'
              AND (? = 0 OR category_id = ?)
              AND (? = '' OR event_type = ?)
            ORDER BY date, start_time
            LIMIT ? OFFSET ?
            "#,
            EVENT_COLUMNS
        ))
        .bind(category_id)
        .bind(category_id)
        .bind(&event_type)
        .bind(&event_type)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list public events")?;

        rows.iter().map(row_to_event).collect()
    }

    async fn count_public(&self, filter: &EventFilter) -> Result<i64> {
        let category_id = filter.category_id.unwrap_or(0);
        let event_type = filter
            .event_type
            .map(|t| t.as_str().to_string())
            .unwrap_or_default();

        let row = sqlx::query(
            r#"
            SELECT COUNT(*) as count
            FROM events
            WHERE status != 'cancelled'
              AND (? = 0 OR category_id = ?)
              AND (? = '' OR event_type = ?)
            "#,
        )
        .bind(category_id)
        .bind(category_id)
        .bind(&event_type)
        .bind(&event_type)
        .fetch_one(&self.pool)
        .await
        .context("Failed to count public events")?;

        Ok(row.get("count"))
    }

    async fn list_featured_upcoming(&self, limit: i64) -> Result<Vec<Event>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {}
            FROM events
            WHERE featured = TRUE AND status = 'upcoming'
            ORDER BY date, start_time
            LIMIT ?
            "#,
            EVENT_COLUMNS
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list featured events")?;

        rows.iter().map(row_to_event).collect()
    }

    async fn list_upcoming(&self, limit: i64) -> Result<Vec<Event>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {}
            FROM events
            WHERE status = 'upcoming'
            ORDER BY date, start_time
            LIMIT ?
            "#,
            EVENT_COLUMNS
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list upcoming events")?;

        rows.iter().map(row_to_event).collect()
    }

    async fn update(&self, event: &Event) -> Result<Event> {
        sqlx::query(
            r#"
            UPDATE events
            SET slug = ?, title = ?, description = ?, date = ?, start_time = ?, end_time = ?,
                location = ?, category_id = ?, event_type = ?, status = ?, capacity = ?,
                organizer = ?, speakers = ?, image = ?, featured = ?, registration_required = ?,
                price = ?, registration_link = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&event.slug)
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.date)
        .bind(event.start_time)
        .bind(event.end_time)
        .bind(&event.location)
        .bind(event.category_id)
        .bind(event.event_type.as_str())
        .bind(event.status.as_str())
        .bind(event.capacity)
        .bind(&event.organizer)
        .bind(&event.speakers)
        .bind(&event.image)
        .bind(event.featured)
        .bind(event.registration_required)
        .bind(&event.price)
        .bind(&event.registration_link)
        .bind(event.updated_at)
        .bind(event.id)
        .execute(&self.pool)
        .await
        .context("Failed to update event")?;

        self.get_by_id(event.id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Event not found after update"))
    }

    async fn delete(&self, id: i64) -> Result<()> {
        sqlx::query("DELETE FROM events WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete event")?;

        Ok(())
    }

    async fn increment_registered(&self, id: i64) -> Result<()> {
        sqlx::query("UPDATE events SET registered = registered + 1 WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to increment event registrations")?;

        Ok(())
    }

    async fn exists_by_slug(&self, slug: &str) -> Result<bool> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM events WHERE slug = ?")
            .bind(slug)
            .fetch_one(&self.pool)
            .await
            .context("Failed to check event slug existence")?;

        let count: i64 = row.get("count");
        Ok(count > 0)
    }

    async fn exists_by_slug_excluding(&self, slug: &str, exclude_id: i64) -> Result<bool> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM events WHERE slug = ? AND id != ?")
            .bind(slug)
            .bind(exclude_id)
            .fetch_one(&self.pool)
            .await
            .context("Failed to check event slug existence")?;

        let count: i64 = row.get("count");
        Ok(count > 0)
    }

    async fn set_tags(&self, event_id: i64, tag_ids: &[i64]) -> Result<()> {
        sqlx::query("DELETE FROM event_tags WHERE event_id = ?")
            .bind(event_id)
            .execute(&self.pool)
            .await
            .context("Failed to clear event tags")?;

        for tag_id in tag_ids {
            sqlx::query("INSERT OR IGNORE INTO event_tags (event_id, tag_id) VALUES (?, ?)")
                .bind(event_id)
                .bind(tag_id)
                .execute(&self.pool)
                .await
                .context("Failed to attach event tag")?;
        }

        Ok(())
    }
}

fn row_to_event(row: &SqliteRow) -> Result<Event> {
    let status: String = row.get("status");
    let event_type: String = row.get("event_type");

    Ok(Event {
        id: row.get("id"),
        slug: row.get("slug"),
        title: row.get("title"),
        description: row.get("description"),
        date: row.get("date"),
        start_time: row.get("start_time"),
        end_time: row.get("end_time"),
        location: row.get("location"),
        category_id: row.get("category_id"),
        event_type: EventType::from_str(&event_type)
            .ok_or_else(|| anyhow::anyhow!("Invalid event type: {}", event_type))?,
        status: EventStatus::from_str(&status)
            .ok_or_else(|| anyhow::anyhow!("Invalid event status: {}", status))?,
        capacity: row.get("capacity"),
        registered: row.get("registered"),
        organizer: row.get("organizer"),
        speakers: row.get("speakers"),
        image: row.get("image"),
        featured: row.get("featured"),
        registration_required: row.get("registration_required"),
        price: row.get("price"),
        registration_link: row.get("registration_link"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}
