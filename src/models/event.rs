//! Event model
//!
//! This module provides:
//! - `Event` entity with its date/time window and registration counters
//! - `EventStatus` and `EventType` enums
//! - Input types for creating and updating events

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Event entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Unique identifier
    pub id: i64,
    /// URL-friendly slug
    pub slug: String,
    /// Event title
    pub title: String,
    /// Event description
    pub description: String,
    /// Event date
    pub date: NaiveDate,
    /// Start time
    pub start_time: NaiveTime,
    /// End time
    pub end_time: NaiveTime,
    /// Venue or meeting address
    pub location: String,
    /// Category ID (optional)
    pub category_id: Option<i64>,
    /// Delivery format
    pub event_type: EventType,
    /// Lifecycle status
    pub status: EventStatus,
    /// Maximum number of attendees
    pub capacity: i64,
    /// Current registration count
    #[serde(default)]
    pub registered: i64,
    /// Organizing group or person
    pub organizer: String,
    /// Comma-separated speaker list
    pub speakers: String,
    /// Cover image path under the media root
    pub image: Option<String>,
    /// Whether the event is highlighted on public pages
    #[serde(default)]
    pub featured: bool,
    /// Whether attendees must register
    pub registration_required: bool,
    /// Price label (free events keep the default)
    pub price: String,
    /// External registration link (optional)
    pub registration_link: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Whether the event has reached capacity.
    pub fn is_full(&self) -> bool {
        self.registered >= self.capacity
    }

    /// Remaining registration slots (never negative).
    pub fn spots_remaining(&self) -> i64 {
        (self.capacity - self.registered).max(0)
    }

    /// Speakers split out of the comma-separated column.
    pub fn speakers_list(&self) -> Vec<String> {
        self.speakers
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    }
}

/// Event lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    /// Scheduled in the future
    Upcoming,
    /// Currently running
    Ongoing,
    /// Finished
    Completed,
    /// Cancelled - hidden from public listings
    Cancelled,
}

impl Default for EventStatus {
    fn default() -> Self {
        Self::Upcoming
    }
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Upcoming => "upcoming",
            EventStatus::Ongoing => "ongoing",
            EventStatus::Completed => "completed",
            EventStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "upcoming" => Some(EventStatus::Upcoming),
            "ongoing" => Some(EventStatus::Ongoing),
            "completed" => Some(EventStatus::Completed),
            "cancelled" => Some(EventStatus::Cancelled),
            _ => None,
        }
    }
}

impl std::fmt::Display for EventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Event delivery format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    /// In person
    Presencial,
    /// Online only
    Online,
    /// Mixed in-person and online
    Hibrido,
}

impl Default for EventType {
    fn default() -> Self {
        Self::Presencial
    }
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Presencial => "presencial",
            EventType::Online => "online",
            EventType::Hibrido => "hibrido",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "presencial" => Some(EventType::Presencial),
            "online" => Some(EventType::Online),
            "hibrido" => Some(EventType::Hibrido),
            _ => None,
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Input for creating a new event
#[derive(Debug, Clone)]
pub struct CreateEventInput {
    pub title: String,
    /// Explicit slug (optional, generated from the title when absent)
    pub slug: Option<String>,
    pub description: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub location: String,
    pub category_id: Option<i64>,
    pub event_type: Option<EventType>,
    pub status: Option<EventStatus>,
    pub capacity: i64,
    pub organizer: String,
    pub speakers: String,
    pub image: Option<String>,
    pub featured: bool,
    pub registration_required: bool,
    pub price: Option<String>,
    pub registration_link: Option<String>,
    pub tag_ids: Vec<i64>,
}

/// Input for updating an existing event
#[derive(Debug, Clone, Default)]
pub struct UpdateEventInput {
    /// New title (optional; regenerates the slug when changed)
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub location: Option<String>,
    pub category_id: Option<Option<i64>>,
    pub event_type: Option<EventType>,
    pub status: Option<EventStatus>,
    pub capacity: Option<i64>,
    pub organizer: Option<String>,
    pub speakers: Option<String>,
    pub image: Option<String>,
    pub featured: Option<bool>,
    pub registration_required: Option<bool>,
    pub price: Option<String>,
    pub registration_link: Option<Option<String>>,
    pub tag_ids: Option<Vec<i64>>,
}

/// Filters for the public events listing
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Category ID filter
    pub category_id: Option<i64>,
    /// Delivery format filter
    pub event_type: Option<EventType>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_event(capacity: i64, registered: i64) -> Event {
        let now = Utc::now();
        Event {
            id: 1,
            slug: "roda-de-conversa".to_string(),
            title: "Roda de Conversa".to_string(),
            description: "Encontro mensal".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 11, 20).unwrap(),
            start_time: NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(21, 0, 0).unwrap(),
            location: "Auditório Central".to_string(),
            category_id: None,
            event_type: EventType::Presencial,
            status: EventStatus::Upcoming,
            capacity,
            registered,
            organizer: "NEABI".to_string(),
            speakers: "Maria, João , ,Ana".to_string(),
            image: None,
            featured: false,
            registration_required: true,
            price: "Gratuito".to_string(),
            registration_link: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_is_full() {
        assert!(!sample_event(10, 9).is_full());
        assert!(sample_event(10, 10).is_full());
        assert!(sample_event(10, 11).is_full());
    }

    #[test]
    fn test_spots_remaining_never_negative() {
        assert_eq!(sample_event(10, 4).spots_remaining(), 6);
        assert_eq!(sample_event(10, 12).spots_remaining(), 0);
    }

    #[test]
    fn test_speakers_list_trims_and_skips_empty() {
        let event = sample_event(10, 0);
        assert_eq!(event.speakers_list(), vec!["Maria", "João", "Ana"]);
    }

    #[test]
    fn test_event_status_round_trip() {
        assert_eq!(EventStatus::from_str("cancelled"), Some(EventStatus::Cancelled));
        assert_eq!(EventStatus::from_str("UPCOMING"), Some(EventStatus::Upcoming));
        assert_eq!(EventStatus::from_str("unknown"), None);
    }

    #[test]
    fn test_event_type_round_trip() {
        assert_eq!(EventType::from_str("hibrido"), Some(EventType::Hibrido));
        assert_eq!(EventType::Online.as_str(), "online");
        assert_eq!(EventType::from_str("tv"), None);
    }
}
