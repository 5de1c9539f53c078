//! Authentication endpoints
//!
//! - POST /auth/register - create an account (reader role)
//! - POST /auth/login - login by username or email, sets a session cookie
//! - POST /auth/logout - delete the session
//! - GET  /auth/me - current user

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::api::middleware::{extract_session_token, ApiError, AppState, AuthenticatedUser};
use crate::api::responses::{MessageResponse, UserResponse};
use crate::services::{LoginInput, RegisterInput, UserServiceError};

/// Session cookie lifetime, matching the session expiration (7 days)
const SESSION_COOKIE_MAX_AGE: i64 = 7 * 24 * 60 * 60;

/// Request body for user registration
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Request body for user login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Username or email address
    pub username: String,
    pub password: String,
}

/// Response for successful authentication
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub token: String,
    pub message: String,
}

fn map_error(e: UserServiceError) -> ApiError {
    match e {
        UserServiceError::AuthenticationError(msg) => ApiError::unauthorized(msg),
        UserServiceError::ValidationError(msg) => ApiError::validation_error(msg),
        UserServiceError::UserExists(msg) => ApiError::conflict(msg),
        UserServiceError::NotFound(msg) => ApiError::not_found(msg),
        UserServiceError::InternalError(e) => {
            tracing::error!("User operation failed: {:#}", e);
            ApiError::internal_error("Internal error")
        }
    }
}

fn session_cookie(token: &str, max_age: i64) -> HeaderMap {
    let cookie = format!(
        "session={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        token, max_age
    );

    let mut headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(&cookie) {
        headers.insert(header::SET_COOKIE, value);
    }
    headers
}

/// POST /auth/register - create an account
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .user_service
        .register(RegisterInput::new(
            body.username,
            body.email,
            body.password.clone(),
        ))
        .await
        .map_err(map_error)?;

    // Log the new account straight in, as the original signup flow did
    let (user, session) = state
        .user_service
        .login(LoginInput::new(&user.username, &body.password))
        .await
        .map_err(map_error)?;

    let headers = session_cookie(&session.id, SESSION_COOKIE_MAX_AGE);

    Ok((
        StatusCode::CREATED,
        headers,
        Json(AuthResponse {
            user: user.into(),
            token: session.id,
            message: "Account created successfully".to_string(),
        }),
    ))
}

/// POST /auth/login - login with username or email
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (user, session) = state
        .user_service
        .login(LoginInput::new(body.username, body.password))
        .await
        .map_err(map_error)?;

    let message = format!("Welcome, {}!", user.full_name());
    let headers = session_cookie(&session.id, SESSION_COOKIE_MAX_AGE);

    Ok((
        StatusCode::OK,
        headers,
        Json(AuthResponse {
            user: user.into(),
            token: session.id,
            message,
        }),
    ))
}

/// POST /auth/logout - delete the current session
pub async fn logout(
    State(state): State<AppState>,
    request: Request,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(token) = extract_session_token(&request) {
        state.user_service.logout(&token).await.map_err(map_error)?;
    }

    // Expire the cookie regardless of whether a session existed
    let headers = session_cookie("", 0);

    Ok((
        StatusCode::OK,
        headers,
        Json(MessageResponse::new("Logged out successfully")),
    ))
}

/// GET /auth/me - current user
pub async fn me(AuthenticatedUser(user): AuthenticatedUser) -> Json<UserResponse> {
    Json(user.into())
}
