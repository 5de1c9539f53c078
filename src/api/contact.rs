//! Contact form endpoint
//!
//! - POST /contact - submit a message
//!
//! Validation failures surface inline as a 400; nothing is persisted on
//! invalid input. The admin-side message list lives in `api::admin`.

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;

use crate::api::middleware::{ApiError, AppState};
use crate::api::responses::MessageResponse;
use crate::models::CreateContactMessageInput;
use crate::services::ContactServiceError;

/// Request body for the contact form
#[derive(Debug, Deserialize)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

/// POST /contact - submit a contact message
pub async fn submit(
    State(state): State<AppState>,
    Json(body): Json<ContactRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    state
        .contact_service
        .submit(CreateContactMessageInput {
            name: body.name,
            email: body.email,
            subject: body.subject,
            message: body.message,
        })
        .await
        .map_err(|e| match e {
            ContactServiceError::ValidationError(msg) => ApiError::validation_error(msg),
            other => {
                tracing::error!("Contact submission failed: {}", other);
                ApiError::internal_error("Internal error")
            }
        })?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Message sent successfully")),
    ))
}
