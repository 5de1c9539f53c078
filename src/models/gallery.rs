//! Gallery image model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Image shown in the public gallery, optionally tied to an event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryImage {
    /// Unique identifier
    pub id: i64,
    /// Image title
    pub title: String,
    /// Image description
    pub description: String,
    /// Image file path under the media root
    pub image: String,
    /// Related event ID (optional)
    pub event_id: Option<i64>,
    /// Whether the image appears in the public gallery
    pub published: bool,
    /// Upload timestamp
    pub uploaded_at: DateTime<Utc>,
}

/// Input for adding an image to the gallery
#[derive(Debug, Clone)]
pub struct CreateGalleryImageInput {
    pub title: String,
    pub description: Option<String>,
    /// Image file path, as returned by the upload endpoint
    pub image: String,
    pub event_id: Option<i64>,
    pub published: bool,
}

/// Input for updating a gallery image
#[derive(Debug, Clone, Default)]
pub struct UpdateGalleryImageInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub event_id: Option<Option<i64>>,
    pub published: Option<bool>,
}
