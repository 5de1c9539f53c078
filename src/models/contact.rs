//! Contact message model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Message submitted through the public contact form.
///
/// Immutable after creation except for the `is_read` flag; the admin area
/// can only list messages and mark them read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactMessage {
    /// Unique identifier
    pub id: i64,
    /// Sender name
    pub name: String,
    /// Sender email
    pub email: String,
    /// Message subject
    pub subject: String,
    /// Message body
    pub message: String,
    /// Whether an admin has read the message
    pub is_read: bool,
    /// Submission timestamp
    pub created_at: DateTime<Utc>,
}

/// Input for submitting a contact message
#[derive(Debug, Clone)]
pub struct CreateContactMessageInput {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}
