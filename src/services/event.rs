//! Event service
//!
//! Business logic for events:
//! - Creation with slug generation, updates with slug regeneration
//! - Public listing that hides cancelled events and runs chronologically
//! - Registration with the capacity check
//!
//! Registration is a bare counter: the original system records no attendee
//! identity, so repeated registrations from the same person each count.

use crate::db::repositories::EventRepository;
use crate::models::{
    CreateEventInput, Event, EventFilter, ListParams, PagedResult, UpdateEventInput,
};
use crate::services::slug::{candidate, slugify};
use anyhow::{Context, Result};
use chrono::Utc;
use std::sync::Arc;

/// Error types for event service operations
#[derive(Debug, thiserror::Error)]
pub enum EventServiceError {
    /// Event not found
    #[error("Event not found: {0}")]
    NotFound(String),

    /// Event does not take registrations
    #[error("This event does not require registration")]
    RegistrationNotRequired,

    /// Event is at capacity
    #[error("Event is full")]
    EventFull,

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Event service
pub struct EventService {
    repo: Arc<dyn EventRepository>,
}

impl EventService {
    pub fn new(repo: Arc<dyn EventRepository>) -> Self {
        Self { repo }
    }

    /// Create a new event.
    pub async fn create(&self, input: CreateEventInput) -> Result<Event, EventServiceError> {
        if input.title.trim().is_empty() {
            return Err(EventServiceError::ValidationError(
                "Title cannot be empty".to_string(),
            ));
        }
        if input.capacity < 0 {
            return Err(EventServiceError::ValidationError(
                "Capacity cannot be negative".to_string(),
            ));
        }
        if input.end_time < input.start_time {
            return Err(EventServiceError::ValidationError(
                "End time cannot precede start time".to_string(),
            ));
        }

        let base = slugify(input.slug.as_deref().unwrap_or(&input.title));
        if base.is_empty() {
            return Err(EventServiceError::ValidationError(
                "Title does not produce a valid slug".to_string(),
            ));
        }
        let slug = self.unique_slug(&base, None).await?;

        let now = Utc::now();
        let event = Event {
            id: 0,
            slug,
            title: input.title,
            description: input.description,
            date: input.date,
            start_time: input.start_time,
            end_time: input.end_time,
            location: input.location,
            category_id: input.category_id,
            event_type: input.event_type.unwrap_or_default(),
            status: input.status.unwrap_or_default(),
            capacity: input.capacity,
            registered: 0,
            organizer: input.organizer,
            speakers: input.speakers,
            image: input.image,
            featured: input.featured,
            registration_required: input.registration_required,
            price: input.price.unwrap_or_else(|| "Gratuito".to_string()),
            registration_link: input.registration_link,
            created_at: now,
            updated_at: now,
        };

        let created = self
            .repo
            .create(&event)
            .await
            .context("Failed to create event")?;

        if !input.tag_ids.is_empty() {
            self.repo
                .set_tags(created.id, &input.tag_ids)
                .await
                .context("Failed to attach tags")?;
        }

        Ok(created)
    }

    /// Get an event by slug.
    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<Event>, EventServiceError> {
        self.repo
            .get_by_slug(slug)
            .await
            .context("Failed to get event")
            .map_err(Into::into)
    }

    /// Register one attendance for an event.
    ///
    /// Rejects events that do not take registrations and events already at
    /// capacity. The capacity check and the increment are separate
    /// statements; a race can overshoot by one, which the domain accepts.
    pub async fn register(&self, slug: &str) -> Result<Event, EventServiceError> {
        let event = self
            .repo
            .get_by_slug(slug)
            .await
            .context("Failed to get event")?
            .ok_or_else(|| EventServiceError::NotFound(slug.to_string()))?;

        if !event.registration_required {
            return Err(EventServiceError::RegistrationNotRequired);
        }
        if event.is_full() {
            return Err(EventServiceError::EventFull);
        }

        self.repo
            .increment_registered(event.id)
            .await
            .context("Failed to increment registrations")?;

        let mut event = event;
        event.registered += 1;
        Ok(event)
    }

    /// Public listing: everything except cancelled events, chronological.
    pub async fn list_public(
        &self,
        filter: &EventFilter,
        params: &ListParams,
    ) -> Result<PagedResult<Event>, EventServiceError> {
        let items = self
            .repo
            .list_public(filter, params.offset(), params.limit())
            .await
            .context("Failed to list events")?;
        let total = self
            .repo
            .count_public(filter)
            .await
            .context("Failed to count events")?;

        Ok(PagedResult::new(items, total, params))
    }

    /// Featured upcoming events for the highlight strip.
    pub async fn list_featured_upcoming(
        &self,
        limit: i64,
    ) -> Result<Vec<Event>, EventServiceError> {
        self.repo
            .list_featured_upcoming(limit)
            .await
            .context("Failed to list featured events")
            .map_err(Into::into)
    }

    /// Next upcoming events (dashboard).
    pub async fn list_upcoming(&self, limit: i64) -> Result<Vec<Event>, EventServiceError> {
        self.repo
            .list_upcoming(limit)
            .await
            .context("Failed to list upcoming events")
            .map_err(Into::into)
    }

    /// Admin listing: every status, newest-created first.
    pub async fn list(&self, params: &ListParams) -> Result<PagedResult<Event>, EventServiceError> {
        let items = self
            .repo
            .list(params.offset(), params.limit())
            .await
            .context("Failed to list events")?;
        let total = self.repo.count().await.context("Failed to count events")?;

        Ok(PagedResult::new(items, total, params))
    }

    /// Count all events (dashboard).
    pub async fn count(&self) -> Result<i64, EventServiceError> {
        self.repo
            .count()
            .await
            .context("Failed to count events")
            .map_err(Into::into)
    }

    /// Update an event. A changed title regenerates the slug.
    pub async fn update(
        &self,
        slug: &str,
        input: UpdateEventInput,
    ) -> Result<Event, EventServiceError> {
        let mut event = self
            .repo
            .get_by_slug(slug)
            .await
            .context("Failed to get event")?
            .ok_or_else(|| EventServiceError::NotFound(slug.to_string()))?;

        if let Some(title) = input.title {
            if title.trim().is_empty() {
                return Err(EventServiceError::ValidationError(
                    "Title cannot be empty".to_string(),
                ));
            }
            if title != event.title {
                let base = slugify(&title);
                if base.is_empty() {
                    return Err(EventServiceError::ValidationError(
                        "Title does not produce a valid slug".to_string(),
                    ));
                }
                event.slug = self.unique_slug(&base, Some(event.id)).await?;
                event.title = title;
            }
        }

        if let Some(description) = input.description {
            event.description = description;
        }
        if let Some(date) = input.date {
            event.date = date;
        }
        if let Some(start_time) = input.start_time {
            event.start_time = start_time;
        }
        if let Some(end_time) = input.end_time {
            event.end_time = end_time;
        }
        if event.end_time < event.start_time {
            return Err(EventServiceError::ValidationError(
                "End time cannot precede start time".to_string(),
            ));
        }
        if let Some(location) = input.location {
            event.location = location;
        }
        if let Some(category_id) = input.category_id {
            event.category_id = category_id;
        }
        if let Some(event_type) = input.event_type {
            event.event_type = event_type;
        }
        if let Some(status) = input.status {
            event.status = status;
        }
        if let Some(capacity) = input.capacity {
            if capacity < 0 {
                return Err(EventServiceError::ValidationError(
                    "Capacity cannot be negative".to_string(),
                ));
            }
            event.capacity = capacity;
        }
        if let Some(organizer) = input.organizer {
            event.organizer = organizer;
        }
        if let Some(speakers) = input.speakers {
            event.speakers = speakers;
        }
        if let Some(image) = input.image {
            event.image = Some(image);
        }
        if let Some(featured) = input.featured {
            event.featured = featured;
        }
        if let Some(registration_required) = input.registration_required {
            event.registration_required = registration_required;
        }
        if let Some(price) = input.price {
            event.price = price;
        }
        if let Some(registration_link) = input.registration_link {
            event.registration_link = registration_link;
        }

        event.updated_at = Utc::now();

        let updated = self
            .repo
            .update(&event)
            .await
            .context("Failed to update event")?;

        if let Some(ref tag_ids) = input.tag_ids {
            self.repo
                .set_tags(updated.id, tag_ids)
                .await
                .context("Failed to replace tags")?;
        }

        Ok(updated)
    }

    /// Delete an event by slug.
    pub async fn delete(&self, slug: &str) -> Result<(), EventServiceError> {
        let event = self
            .repo
            .get_by_slug(slug)
            .await
            .context("Failed to get event")?
            .ok_or_else(|| EventServiceError::NotFound(slug.to_string()))?;

        self.repo
            .delete(event.id)
            .await
            .context("Failed to delete event")?;

        Ok(())
    }

    async fn unique_slug(
        &self,
        base: &str,
        exclude_id: Option<i64>,
    ) -> Result<String, EventServiceError> {
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
    use crate::db::repositories::SqlxEventRepository;
    use crate::db::{create_test_pool, migrations};
    use crate::models::{EventStatus, EventType};
    use chrono::{NaiveDate, NaiveTime};
    use proptest::prelude::*;

    async fn setup() -> EventService {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        EventService::new(SqlxEventRepository::boxed(pool))
    }

    fn sample_input(title: &str, capacity: i64) -> CreateEventInput {
        CreateEventInput {
            title: title.to_string(),
            slug: None,
            description: "Descrição do evento".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 11, 20).unwrap(),
            start_time: NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(21, 0, 0).unwrap(),
            location: "Auditório Central".to_string(),
            category_id: None,
            event_type: None,
            status: None,
            capacity,
            organizer: "NEABI".to_string(),
            speakers: String::new(),
            image: None,
            featured: false,
            registration_required: true,
            price: None,
            registration_link: None,
            tag_ids: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_create_defaults() {
        let service = setup().await;

        let event = service
            .create(sample_input("Semana da Consciência Negra", 100))
            .await
            .expect("create should succeed");

        assert_eq!(event.slug, "semana-da-consciência-negra");
        assert_eq!(event.status, EventStatus::Upcoming);
        assert_eq!(event.event_type, EventType::Presencial);
        assert_eq!(event.price, "Gratuito");
        assert_eq!(event.registered, 0);
    }

    #[tokio::test]
    async fn test_same_title_gets_distinct_slugs() {
        let service = setup().await;

        let first = service.create(sample_input("Evento", 10)).await.expect("create");
        let second = service.create(sample_input("Evento", 10)).await.expect("create");

        assert_eq!(first.slug, "evento");
        assert_eq!(second.slug, "evento-1");
    }

    #[tokio::test]
    async fn test_register_increments() {
        let service = setup().await;
        service.create(sample_input("Oficina", 2)).await.expect("create");

        let event = service.register("oficina").await.expect("register");
        assert_eq!(event.registered, 1);

        let event = service.register("oficina").await.expect("register");
        assert_eq!(event.registered, 2);
    }

    #[tokio::test]
    async fn test_register_rejects_when_full() {
        let service = setup().await;
        service.create(sample_input("Lotado", 1)).await.expect("create");

        service.register("lotado").await.expect("first registration");
        let result = service.register("lotado").await;
        assert!(matches!(result, Err(EventServiceError::EventFull)));

        // Counter stays at capacity
        let event = service
            .get_by_slug("lotado")
            .await
            .expect("get")
            .expect("event exists");
        assert_eq!(event.registered, 1);
    }

    #[tokio::test]
    async fn test_register_rejects_zero_capacity() {
        let service = setup().await;
        service.create(sample_input("Sem vagas", 0)).await.expect("create");

        let result = service.register("sem-vagas").await;
        assert!(matches!(result, Err(EventServiceError::EventFull)));
    }

    #[tokio::test]
    async fn test_register_not_required_rejected() {
        let service = setup().await;
        let mut input = sample_input("Aberto", 50);
        input.registration_required = false;
        service.create(input).await.expect("create");

        let result = service.register("aberto").await;
        assert!(matches!(
            result,
            Err(EventServiceError::RegistrationNotRequired)
        ));
    }

    #[tokio::test]
    async fn test_register_unknown_event() {
        let service = setup().await;
        let result = service.register("fantasma").await;
        assert!(matches!(result, Err(EventServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_public_list_excludes_cancelled() {
        let service = setup().await;

        service.create(sample_input("Visível", 10)).await.expect("create");
        let mut cancelled = sample_input("Cancelado", 10);
        cancelled.status = Some(EventStatus::Cancelled);
        service.create(cancelled).await.expect("create");

        let page = service
            .list_public(&EventFilter::default(), &ListParams::new(1, 6))
            .await
            .expect("list");

        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].title, "Visível");
    }

    #[tokio::test]
    async fn test_public_list_orders_chronologically() {
        let service = setup().await;

        let mut late = sample_input("Depois", 10);
        late.date = NaiveDate::from_ymd_opt(2025, 12, 1).unwrap();
        service.create(late).await.expect("create");

        let mut early = sample_input("Antes", 10);
        early.date = NaiveDate::from_ymd_opt(2025, 10, 1).unwrap();
        service.create(early).await.expect("create");

        let page = service
            .list_public(&EventFilter::default(), &ListParams::new(1, 6))
            .await
            .expect("list");

        let titles: Vec<&str> = page.items.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Antes", "Depois"]);
    }

    #[tokio::test]
    async fn test_type_filter() {
        let service = setup().await;

        let mut online = sample_input("Online", 10);
        online.event_type = Some(EventType::Online);
        service.create(online).await.expect("create");
        service.create(sample_input("Presencial", 10)).await.expect("create");

        let filter = EventFilter {
            category_id: None,
            event_type: Some(EventType::Online),
        };
        let page = service
            .list_public(&filter, &ListParams::new(1, 6))
            .await
            .expect("list");

        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].title, "Online");
    }

    #[tokio::test]
    async fn test_update_title_regenerates_slug() {
        let service = setup().await;
        service.create(sample_input("Nome Antigo", 10)).await.expect("create");

        let updated = service
            .update(
                "nome-antigo",
                UpdateEventInput {
                    title: Some("Nome Novo".to_string()),
                    ..Default::default()
                },
            )
            .await
            .expect("update");

        assert_eq!(updated.slug, "nome-novo");
    }

    #[tokio::test]
    async fn test_update_invalid_time_window() {
        let service = setup().await;
        service.create(sample_input("Horário", 10)).await.expect("create");

        let result = service
            .update(
                "horário",
                UpdateEventInput {
                    end_time: Some(NaiveTime::from_hms_opt(8, 0, 0).unwrap()),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(EventServiceError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_delete() {
        let service = setup().await;
        service.create(sample_input("Remover", 10)).await.expect("create");

        service.delete("remover").await.expect("delete");
        assert!(service.get_by_slug("remover").await.expect("get").is_none());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(10))]

        /// Registering up to capacity always succeeds and the next attempt
        /// is always rejected, for any capacity.
        #[test]
        fn registration_respects_capacity(capacity in 0i64..8) {
            let rt = tokio::runtime::Runtime::new().unwrap();
            let result: Result<(), TestCaseError> = rt.block_on(async {
                let service = setup().await;
                service
                    .create(sample_input("Capacidade", capacity))
                    .await
                    .expect("create");

                for _ in 0..capacity {
                    prop_assert!(service.register("capacidade").await.is_ok());
                }

                let over = service.register("capacidade").await;
                prop_assert!(matches!(over, Err(EventServiceError::EventFull)));

                let event = service
                    .get_by_slug("capacidade")
                    .await
                    .expect("get")
                    .expect("event exists");
                prop_assert_eq!(event.registered, capacity);

                Ok(())
            });
            result?;
        }
    }
}
