//! User service
//!
//! Business logic for accounts and authentication:
//! - Registration (new accounts start as readers)
//! - Login by username or email, session creation
//! - Session validation and logout
//! - Admin-side user management and the permission screen

use crate::db::repositories::{SessionRepository, UserRepository};
use crate::models::{
    Session, UpdatePermissionsInput, UpdateUserInput, User, UserRole,
};
use crate::services::password::{hash_password, verify_password};
use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use std::sync::Arc;
use uuid::Uuid;

/// Default session expiration time in days
const DEFAULT_SESSION_EXPIRATION_DAYS: i64 = 7;

/// Error types for user service operations
#[derive(Debug, thiserror::Error)]
pub enum UserServiceError {
    /// Authentication failed (invalid credentials or inactive account)
    #[error("Authentication failed: {0}")]
    AuthenticationError(String),

    /// Validation error (invalid input)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// User already exists
    #[error("User already exists: {0}")]
    UserExists(String),

    /// User not found
    #[error("User not found: {0}")]
    NotFound(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Input for user registration
#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl RegisterInput {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Input for user login
#[derive(Debug, Clone)]
pub struct LoginInput {
    /// Username or email address
    pub username_or_email: String,
    pub password: String,
}

impl LoginInput {
    pub fn new(username_or_email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username_or_email: username_or_email.into(),
            password: password.into(),
        }
    }
}

/// User service for managing users and authentication
pub struct UserService {
    user_repo: Arc<dyn UserRepository>,
    session_repo: Arc<dyn SessionRepository>,
    session_expiration_days: i64,
}

impl UserService {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        session_repo: Arc<dyn SessionRepository>,
    ) -> Self {
        Self {
            user_repo,
            session_repo,
            session_expiration_days: DEFAULT_SESSION_EXPIRATION_DAYS,
        }
    }

    /// Register a new user. New accounts always start with the reader role;
    /// roles are elevated through the permission screen.
    pub async fn register(&self, input: RegisterInput) -> Result<User, UserServiceError> {
        self.validate_register_input(&input)?;

        if self
            .user_repo
            .get_by_username(&input.username)
            .await
            .context("Failed to check username")?
            .is_some()
        {
            return Err(UserServiceError::UserExists(format!(
                "Username '{}' is already taken",
                input.username
            )));
        }

        if self
            .user_repo
            .get_by_email(&input.email)
            .await
            .context("Failed to check email")?
            .is_some()
        {
            return Err(UserServiceError::UserExists(format!(
                "Email '{}' is already registered",
                input.email
            )));
        }

        let password_hash = hash_password(&input.password).context("Failed to hash password")?;
        let user = User::new(input.username, input.email, password_hash, UserRole::Reader);

        let created = self
            .user_repo
            .create(&user)
            .await
            .context("Failed to create user")?;

        Ok(created)
    }

    /// Login with username or email.
    ///
    /// Falls back to an email lookup when no username matches, as the
    /// original login form accepts either.
    pub async fn login(&self, input: LoginInput) -> Result<(User, Session), UserServiceError> {
        let user = match self
            .user_repo
            .get_by_username(&input.username_or_email)
            .await
            .context("Failed to look up user")?
        {
            Some(user) => Some(user),
            None => self
                .user_repo
                .get_by_email(&input.username_or_email)
                .await
                .context("Failed to look up user by email")?,
        };

        let user = user.ok_or_else(|| {
            UserServiceError::AuthenticationError("Invalid username or password".to_string())
        })?;

        if !user.is_active {
            return Err(UserServiceError::AuthenticationError(
                "Account is disabled".to_string(),
            ));
        }

        let valid = verify_password(&input.password, &user.password_hash)
            .context("Failed to verify password")?;
        if !valid {
            return Err(UserServiceError::AuthenticationError(
                "Invalid username or password".to_string(),
            ));
        }

        let now = Utc::now();
        let session = Session {
            id: Uuid::new_v4().to_string(),
            user_id: user.id,
            expires_at: now + Duration::days(self.session_expiration_days),
            created_at: now,
        };

        self.session_repo
            .create(&session)
            .await
            .context("Failed to create session")?;

        Ok((user, session))
    }

    /// Delete a session token.
    pub async fn logout(&self, token: &str) -> Result<(), UserServiceError> {
        self.session_repo
            .delete(token)
            .await
            .context("Failed to delete session")?;
        Ok(())
    }

    /// Resolve a session token to its user.
    ///
    /// Expired sessions are deleted on sight; inactive users resolve to
    /// nothing.
    pub async fn validate_session(&self, token: &str) -> Result<Option<User>, UserServiceError> {
        let session = match self
            .session_repo
            .get_by_id(token)
            .await
            .context("Failed to load session")?
        {
            Some(session) => session,
            None => return Ok(None),
        };

        if session.is_expired() {
            self.session_repo
                .delete(token)
                .await
                .context("Failed to delete expired session")?;
            return Ok(None);
        }

        let user = self
            .user_repo
            .get_by_id(session.user_id)
            .await
            .context("Failed to load session user")?;

        Ok(user.filter(|u| u.is_active))
    }

    /// List all users.
    pub async fn list(&self) -> Result<Vec<User>, UserServiceError> {
        self.user_repo
            .list()
            .await
            .context("Failed to list users")
            .map_err(Into::into)
    }

    /// Get a user by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<User>, UserServiceError> {
        self.user_repo
            .get_by_id(id)
            .await
            .context("Failed to get user")
            .map_err(Into::into)
    }

    /// Count all users.
    pub async fn count(&self) -> Result<i64, UserServiceError> {
        self.user_repo
            .count()
            .await
            .context("Failed to count users")
            .map_err(Into::into)
    }

    /// Update a user's basic details from the admin edit screen.
    pub async fn update(
        &self,
        id: i64,
        input: UpdateUserInput,
    ) -> Result<User, UserServiceError> {
        let mut user = self
            .user_repo
            .get_by_id(id)
            .await
            .context("Failed to get user")?
            .ok_or_else(|| UserServiceError::NotFound(format!("User with ID {} not found", id)))?;

        if let Some(ref username) = input.username {
            if username.trim().is_empty() {
                return Err(UserServiceError::ValidationError(
                    "Username cannot be empty".to_string(),
                ));
            }
            if username != &user.username {
                if self
                    .user_repo
                    .get_by_username(username)
                    .await
                    .context("Failed to check username")?
                    .is_some()
                {
                    return Err(UserServiceError::UserExists(format!(
                        "Username '{}' is already taken",
                        username
                    )));
                }
                user.username = username.clone();
            }
        }

        if let Some(ref email) = input.email {
            if email != &user.email {
                if self
                    .user_repo
                    .get_by_email(email)
                    .await
                    .context("Failed to check email")?
                    .is_some()
                {
                    return Err(UserServiceError::UserExists(format!(
                        "Email '{}' is already registered",
                        email
                    )));
                }
                user.email = email.clone();
            }
        }

        if let Some(first_name) = input.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = input.last_name {
            user.last_name = last_name;
        }

        user.updated_at = Utc::now();

        self.user_repo
            .update(&user)
            .await
            .context("Failed to update user")
            .map_err(Into::into)
    }

    /// Apply the permission screen: active flag and role, with the
    /// staff/superuser flags resynchronized from the role (admin gets both,
    /// reader keeps staff only).
    pub async fn update_permissions(
        &self,
        id: i64,
        input: UpdatePermissionsInput,
    ) -> Result<User, UserServiceError> {
        let mut user = self
            .user_repo
            .get_by_id(id)
            .await
            .context("Failed to get user")?
            .ok_or_else(|| UserServiceError::NotFound(format!("User with ID {} not found", id)))?;

        user.is_active = input.is_active;
        user.role = input.role;
        match input.role {
            UserRole::Admin => {
                user.is_staff = true;
                user.is_superuser = true;
            }
            UserRole::Reader => {
                user.is_staff = true;
                user.is_superuser = false;
            }
        }
        user.updated_at = Utc::now();

        self.user_repo
            .update(&user)
            .await
            .context("Failed to update permissions")
            .map_err(Into::into)
    }

    /// Delete a user and all of their sessions.
    pub async fn delete(&self, id: i64) -> Result<(), UserServiceError> {
        if self
            .user_repo
            .get_by_id(id)
            .await
            .context("Failed to get user")?
            .is_none()
        {
            return Err(UserServiceError::NotFound(format!(
                "User with ID {} not found",
                id
            )));
        }

        self.session_repo
            .delete_for_user(id)
            .await
            .context("Failed to delete user sessions")?;
        self.user_repo
            .delete(id)
            .await
            .context("Failed to delete user")?;

        Ok(())
    }

    fn validate_register_input(&self, input: &RegisterInput) -> Result<(), UserServiceError> {
        if input.username.trim().is_empty() {
            return Err(UserServiceError::ValidationError(
                "Username cannot be empty".to_string(),
            ));
        }
        if input.email.trim().is_empty() || !input.email.contains('@') {
            return Err(UserServiceError::ValidationError(
                "A valid email address is required".to_string(),
            ));
        }
        if input.password.len() < 4 {
            return Err(UserServiceError::ValidationError(
                "Password must be at least 4 characters".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{SqlxSessionRepository, SqlxUserRepository};
    use crate::db::{create_test_pool, migrations};

    async fn setup() -> UserService {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        UserService::new(
            SqlxUserRepository::boxed(pool.clone()),
            SqlxSessionRepository::boxed(pool),
        )
    }

    #[tokio::test]
    async fn test_register_creates_reader() {
        let service = setup().await;

        let user = service
            .register(RegisterInput::new("maria", "maria@example.com", "senha123"))
            .await
            .expect("register should succeed");

        assert_eq!(user.role, UserRole::Reader);
        assert!(!user.is_admin());
        assert_ne!(user.password_hash, "senha123");
    }

    #[tokio::test]
    async fn test_register_duplicate_username_fails() {
        let service = setup().await;

        service
            .register(RegisterInput::new("maria", "maria@example.com", "senha123"))
            .await
            .expect("first register should succeed");

        let result = service
            .register(RegisterInput::new("maria", "other@example.com", "senha123"))
            .await;

        assert!(matches!(result, Err(UserServiceError::UserExists(_))));
    }

    #[tokio::test]
    async fn test_register_duplicate_email_fails() {
        let service = setup().await;

        service
            .register(RegisterInput::new("maria", "maria@example.com", "senha123"))
            .await
            .expect("first register should succeed");

        let result = service
            .register(RegisterInput::new("joana", "maria@example.com", "senha123"))
            .await;

        assert!(matches!(result, Err(UserServiceError::UserExists(_))));
    }

    #[tokio::test]
    async fn test_register_short_password_fails() {
        let service = setup().await;

        let result = service
            .register(RegisterInput::new("maria", "maria@example.com", "abc"))
            .await;

        assert!(matches!(result, Err(UserServiceError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_login_by_username_and_email() {
        let service = setup().await;
        service
            .register(RegisterInput::new("maria", "maria@example.com", "senha123"))
            .await
            .expect("register");

        let (user, session) = service
            .login(LoginInput::new("maria", "senha123"))
            .await
            .expect("login by username should succeed");
        assert_eq!(user.username, "maria");
        assert!(!session.is_expired());

        let (user, _) = service
            .login(LoginInput::new("maria@example.com", "senha123"))
            .await
            .expect("login by email should succeed");
        assert_eq!(user.username, "maria");
    }

    #[tokio::test]
    async fn test_login_wrong_password_fails() {
        let service = setup().await;
        service
            .register(RegisterInput::new("maria", "maria@example.com", "senha123"))
            .await
            .expect("register");

        let result = service.login(LoginInput::new("maria", "errada")).await;
        assert!(matches!(
            result,
            Err(UserServiceError::AuthenticationError(_))
        ));
    }

    #[tokio::test]
    async fn test_login_unknown_user_fails() {
        let service = setup().await;

        let result = service.login(LoginInput::new("ghost", "senha123")).await;
        assert!(matches!(
            result,
            Err(UserServiceError::AuthenticationError(_))
        ));
    }

    #[tokio::test]
    async fn test_validate_session_round_trip() {
        let service = setup().await;
        service
            .register(RegisterInput::new("maria", "maria@example.com", "senha123"))
            .await
            .expect("register");
        let (_, session) = service
            .login(LoginInput::new("maria", "senha123"))
            .await
            .expect("login");

        let user = service
            .validate_session(&session.id)
            .await
            .expect("validate")
            .expect("session should resolve");
        assert_eq!(user.username, "maria");

        service.logout(&session.id).await.expect("logout");
        let user = service.validate_session(&session.id).await.expect("validate");
        assert!(user.is_none());
    }

    #[tokio::test]
    async fn test_validate_unknown_session() {
        let service = setup().await;
        let user = service.validate_session("no-such-token").await.expect("validate");
        assert!(user.is_none());
    }

    #[tokio::test]
    async fn test_update_permissions_sync_rule() {
        let service = setup().await;
        let user = service
            .register(RegisterInput::new("maria", "maria@example.com", "senha123"))
            .await
            .expect("register");

        let updated = service
            .update_permissions(
                user.id,
                UpdatePermissionsInput {
                    is_active: true,
                    role: UserRole::Admin,
                },
            )
            .await
            .expect("permissions update");

        assert_eq!(updated.role, UserRole::Admin);
        assert!(updated.is_staff);
        assert!(updated.is_superuser);

        let demoted = service
            .update_permissions(
                user.id,
                UpdatePermissionsInput {
                    is_active: true,
                    role: UserRole::Reader,
                },
            )
            .await
            .expect("permissions update");

        assert_eq!(demoted.role, UserRole::Reader);
        assert!(demoted.is_staff);
        assert!(!demoted.is_superuser);
    }

    #[tokio::test]
    async fn test_deactivated_user_cannot_login_or_resolve() {
        let service = setup().await;
        let user = service
            .register(RegisterInput::new("maria", "maria@example.com", "senha123"))
            .await
            .expect("register");
        let (_, session) = service
            .login(LoginInput::new("maria", "senha123"))
            .await
            .expect("login");

        service
            .update_permissions(
                user.id,
                UpdatePermissionsInput {
                    is_active: false,
                    role: UserRole::Reader,
                },
            )
            .await
            .expect("deactivate");

        let result = service.login(LoginInput::new("maria", "senha123")).await;
        assert!(matches!(
            result,
            Err(UserServiceError::AuthenticationError(_))
        ));

        let resolved = service.validate_session(&session.id).await.expect("validate");
        assert!(resolved.is_none());
    }

    #[tokio::test]
    async fn test_delete_user_removes_sessions() {
        let service = setup().await;
        let user = service
            .register(RegisterInput::new("maria", "maria@example.com", "senha123"))
            .await
            .expect("register");
        let (_, session) = service
            .login(LoginInput::new("maria", "senha123"))
            .await
            .expect("login");

        service.delete(user.id).await.expect("delete");

        assert!(service.get_by_id(user.id).await.expect("get").is_none());
        assert!(service
            .validate_session(&session.id)
            .await
            .expect("validate")
            .is_none());
    }
}
