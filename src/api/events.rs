//! Event endpoints
//!
//! Public:
//! - GET /events - non-cancelled events, filters, pagination
//! - GET /events/{slug} - event detail
//! - POST /events/{slug}/register - register one attendance
//!
//! Admin area:
//! - GET    /admin-area/events
//! - POST   /admin-area/events/create
//! - GET    /admin-area/events/delete/{slug} (confirmation fetch)
//! - PUT    /admin-area/events/edit/{slug}
//! - DELETE /admin-area/events/delete/{slug}

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::api::middleware::{ApiError, AppState};
use crate::api::responses::{EventResponse, MessageResponse};
use crate::models::{
    CreateEventInput, Event, EventFilter, EventStatus, EventType, ListParams, UpdateEventInput,
};
use crate::services::EventServiceError;

/// Public events page size
const EVENTS_PAGE_SIZE: u32 = 6;
/// Featured events shown on the events page
const FEATURED_EVENTS: i64 = 2;
/// Admin event list page size
const ADMIN_PAGE_SIZE: u32 = 20;

/// Query parameters for the public events listing
#[derive(Debug, Deserialize)]
pub struct EventsQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    /// Category ID filter
    pub category: Option<i64>,
    /// Delivery format filter ("Todos" disables it)
    #[serde(rename = "type")]
    pub event_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AdminListQuery {
    #[serde(default = "default_page")]
    pub page: u32,
}

fn default_page() -> u32 {
    1
}

/// Response for the public events page
#[derive(Debug, Serialize)]
pub struct EventsPageResponse {
    pub events: Vec<EventResponse>,
    pub total: i64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
    pub featured_events: Vec<EventResponse>,
}

/// Response for the admin event list
#[derive(Debug, Serialize)]
pub struct EventListResponse {
    pub events: Vec<EventResponse>,
    pub total: i64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
}

/// Request body for creating an event
#[derive(Debug, Deserialize)]
pub struct CreateEventRequest {
    pub title: String,
    pub slug: Option<String>,
    pub description: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub location: String,
    pub category_id: Option<i64>,
    pub event_type: Option<String>,
    pub status: Option<String>,
    pub capacity: i64,
    pub organizer: String,
    #[serde(default)]
    pub speakers: String,
    pub image: Option<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default = "default_registration_required")]
    pub registration_required: bool,
    pub price: Option<String>,
    pub registration_link: Option<String>,
    #[serde(default)]
    pub tag_ids: Vec<i64>,
}

fn default_registration_required() -> bool {
    true
}

/// Request body for updating an event
#[derive(Debug, Default, Deserialize)]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub location: Option<String>,
    pub category_id: Option<i64>,
    pub event_type: Option<String>,
    pub status: Option<String>,
    pub capacity: Option<i64>,
    pub organizer: Option<String>,
    pub speakers: Option<String>,
    pub image: Option<String>,
    pub featured: Option<bool>,
    pub registration_required: Option<bool>,
    pub price: Option<String>,
    pub registration_link: Option<String>,
    pub tag_ids: Option<Vec<i64>>,
}

fn parse_event_type(value: Option<&str>) -> Result<Option<EventType>, ApiError> {
    match value {
        None => Ok(None),
        Some(s) => EventType::from_str(s)
            .map(Some)
            .ok_or_else(|| ApiError::validation_error(format!("Invalid event type: {}", s))),
    }
}

fn parse_event_status(value: Option<&str>) -> Result<Option<EventStatus>, ApiError> {
    match value {
        None => Ok(None),
        Some(s) => EventStatus::from_str(s)
            .map(Some)
            .ok_or_else(|| ApiError::validation_error(format!("Invalid event status: {}", s))),
    }
}

fn map_error(e: EventServiceError) -> ApiError {
    match e {
        EventServiceError::NotFound(slug) => {
            ApiError::not_found(format!("Event not found: {}", slug))
        }
        EventServiceError::RegistrationNotRequired => {
            ApiError::validation_error("This event does not require registration")
        }
        EventServiceError::EventFull => ApiError::conflict("Event is full"),
        EventServiceError::ValidationError(msg) => ApiError::validation_error(msg),
        EventServiceError::InternalError(e) => {
            tracing::error!("Event operation failed: {:#}", e);
            ApiError::internal_error("Internal error")
        }
    }
}

async fn enrich(state: &AppState, event: Event) -> EventResponse {
    let category = match event.category_id {
        Some(id) => state.category_service.get_by_id(id).await.ok().flatten(),
        None => None,
    };
    let tags = state
        .tag_service
        .list_for_event(event.id)
        .await
        .unwrap_or_default();

    EventResponse::from(event)
        .with_category(category)
        .with_tags(tags)
}

/// GET /events - public events listing
pub async fn list_public(
    State(state): State<AppState>,
    Query(query): Query<EventsQuery>,
) -> Result<Json<EventsPageResponse>, ApiError> {
    let event_type = match query.event_type.as_deref() {
        Some("Todos") | None => None,
        Some(s) => parse_event_type(Some(s))?,
    };
    let filter = EventFilter {
        category_id: query.category,
        event_type,
    };
    let params = ListParams::new(query.page, EVENTS_PAGE_SIZE);

    let page = state
        .event_service
        .list_public(&filter, &params)
        .await
        .map_err(map_error)?;

    let total = page.total;
    let total_pages = page.total_pages();

    let mut events = Vec::with_capacity(page.items.len());
    for event in page.items {
        events.push(enrich(&state, event).await);
    }

    let featured = state
        .event_service
        .list_featured_upcoming(FEATURED_EVENTS)
        .await
        .map_err(map_error)?;
    let mut featured_events = Vec::with_capacity(featured.len());
    for event in featured {
        featured_events.push(enrich(&state, event).await);
    }

    Ok(Json(EventsPageResponse {
        events,
        total,
        page: params.page,
        page_size: EVENTS_PAGE_SIZE,
        total_pages,
        featured_events,
    }))
}

/// GET /events/{slug} - public event detail
pub async fn get_public(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<EventResponse>, ApiError> {
    let event = state
        .event_service
        .get_by_slug(&slug)
        .await
        .map_err(map_error)?
        .ok_or_else(|| ApiError::not_found(format!("Event not found: {}", slug)))?;

    Ok(Json(enrich(&state, event).await))
}

/// POST /events/{slug}/register - register one attendance
///
/// Rejected when the event does not take registrations or is full.
pub async fn register(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<RegisterResponse>, ApiError> {
    let event = state.event_service.register(&slug).await.map_err(map_error)?;

    Ok(Json(RegisterResponse {
        message: format!("Registration confirmed for \"{}\"", event.title),
        registered: event.registered,
        spots_remaining: event.spots_remaining(),
    }))
}

/// Response for the registration endpoint
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub registered: i64,
    pub spots_remaining: i64,
}

/// GET /admin-area/events - admin event list
pub async fn admin_list(
    State(state): State<AppState>,
    Query(query): Query<AdminListQuery>,
) -> Result<Json<EventListResponse>, ApiError> {
    let params = ListParams::new(query.page, ADMIN_PAGE_SIZE);
    let page = state.event_service.list(&params).await.map_err(map_error)?;

    let total = page.total;
    let total_pages = page.total_pages();

    let mut events = Vec::with_capacity(page.items.len());
    for event in page.items {
        events.push(enrich(&state, event).await);
    }

    Ok(Json(EventListResponse {
        events,
        total,
        page: params.page,
        page_size: ADMIN_PAGE_SIZE,
        total_pages,
    }))
}

/// POST /admin-area/events/create - create an event
pub async fn admin_create(
    State(state): State<AppState>,
    Json(body): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<EventResponse>), ApiError> {
    let input = CreateEventInput {
        title: body.title,
        slug: body.slug,
        description: body.description,
        date: body.date,
        start_time: body.start_time,
        end_time: body.end_time,
        location: body.location,
        category_id: body.category_id,
        event_type: parse_event_type(body.event_type.as_deref())?,
        status: parse_event_status(body.status.as_deref())?,
        capacity: body.capacity,
        organizer: body.organizer,
        speakers: body.speakers,
        image: body.image,
        featured: body.featured,
        registration_required: body.registration_required,
        price: body.price,
        registration_link: body.registration_link,
        tag_ids: body.tag_ids,
    };

    let event = state.event_service.create(input).await.map_err(map_error)?;

    Ok((StatusCode::CREATED, Json(enrich(&state, event).await)))
}

/// GET /admin-area/events/delete/{slug} - fetch an event for the delete
/// confirmation screen
pub async fn admin_get(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<EventResponse>, ApiError> {
    let event = state
        .event_service
        .get_by_slug(&slug)
        .await
        .map_err(map_error)?
        .ok_or_else(|| ApiError::not_found(format!("Event not found: {}", slug)))?;

    Ok(Json(enrich(&state, event).await))
}

/// PUT /admin-area/events/edit/{slug} - update an event
pub async fn admin_update(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(body): Json<UpdateEventRequest>,
) -> Result<Json<EventResponse>, ApiError> {
    let input = UpdateEventInput {
        title: body.title,
        description: body.description,
        date: body.date,
        start_time: body.start_time,
        end_time: body.end_time,
        location: body.location,
        category_id: body.category_id.map(Some),
        event_type: parse_event_type(body.event_type.as_deref())?,
        status: parse_event_status(body.status.as_deref())?,
        capacity: body.capacity,
        organizer: body.organizer,
        speakers: body.speakers,
        image: body.image,
        featured: body.featured,
        registration_required: body.registration_required,
        price: body.price,
        registration_link: body.registration_link.map(Some),
        tag_ids: body.tag_ids,
    };

    let event = state
        .event_service
        .update(&slug, input)
        .await
        .map_err(map_error)?;

    Ok(Json(enrich(&state, event).await))
}

/// DELETE /admin-area/events/delete/{slug} - delete an event
pub async fn admin_delete(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.event_service.delete(&slug).await.map_err(map_error)?;
    Ok(Json(MessageResponse::new("Event deleted successfully")))
}
