//! User model
//!
//! Defines the `User` entity and the role/flag set that drives access to
//! the admin area. Role-based permissions combine the `role` field with the
//! `is_staff`/`is_superuser` flags carried over from the original site data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// User entity representing a registered account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: i64,
    /// Username (unique)
    pub username: String,
    /// Email address (unique)
    pub email: String,
    /// Password hash (argon2)
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// User role
    pub role: UserRole,
    /// Whether the account can log in
    pub is_active: bool,
    /// Staff flag (grants admin-area access)
    pub is_staff: bool,
    /// Superuser flag (grants admin-area access and user management)
    pub is_superuser: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new User with the given parameters.
    ///
    /// The password must already be hashed; use
    /// `services::password::hash_password()`.
    pub fn new(username: String, email: String, password_hash: String, role: UserRole) -> Self {
        let now = Utc::now();
        Self {
            id: 0, // Will be set by the database
            username,
            email,
            password_hash,
            first_name: String::new(),
            last_name: String::new(),
            role,
            is_active: true,
            is_staff: false,
            is_superuser: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Full display name, falling back to the username.
    pub fn full_name(&self) -> String {
        let name = format!("{} {}", self.first_name, self.last_name);
        let name = name.trim();
        if name.is_empty() {
            self.username.clone()
        } else {
            name.to_string()
        }
    }

    /// Check whether this user may access the admin area.
    ///
    /// True when the user is staff, a superuser, or carries the admin role.
    pub fn is_admin(&self) -> bool {
        self.is_staff || self.is_superuser || self.role == UserRole::Admin
    }
}

/// User role for authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Administrator - full access to the admin area
    Admin,
    /// Reader - public site only
    Reader,
}

impl Default for UserRole {
    fn default() -> Self {
        Self::Reader
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRole::Admin => write!(f, "admin"),
            UserRole::Reader => write!(f, "reader"),
        }
    }
}

impl FromStr for UserRole {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(UserRole::Admin),
            "reader" => Ok(UserRole::Reader),
            _ => Err(anyhow::anyhow!("Invalid user role: {}", s)),
        }
    }
}

/// Input for updating a user's basic details
#[derive(Debug, Clone, Default)]
pub struct UpdateUserInput {
    /// New username (optional)
    pub username: Option<String>,
    /// New email (optional)
    pub email: Option<String>,
    /// New first name (optional)
    pub first_name: Option<String>,
    /// New last name (optional)
    pub last_name: Option<String>,
}

/// Input for the permission-management screen.
///
/// Changing the role also resynchronizes the staff/superuser flags.
#[derive(Debug, Clone)]
pub struct UpdatePermissionsInput {
    /// Whether the account stays active
    pub is_active: bool,
    /// New role
    pub role: UserRole,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_new_defaults() {
        let user = User::new(
            "testuser".to_string(),
            "test@example.com".to_string(),
            "hashed".to_string(),
            UserRole::Reader,
        );

        assert_eq!(user.id, 0);
        assert_eq!(user.role, UserRole::Reader);
        assert!(user.is_active);
        assert!(!user.is_staff);
        assert!(!user.is_superuser);
    }

    #[test]
    fn test_is_admin_by_role() {
        let user = User::new(
            "admin".to_string(),
            "admin@example.com".to_string(),
            "hash".to_string(),
            UserRole::Admin,
        );
        assert!(user.is_admin());
    }

    #[test]
    fn test_is_admin_by_flags() {
        let mut user = User::new(
            "staff".to_string(),
            "staff@example.com".to_string(),
            "hash".to_string(),
            UserRole::Reader,
        );
        assert!(!user.is_admin());

        user.is_staff = true;
        assert!(user.is_admin());

        user.is_staff = false;
        user.is_superuser = true;
        assert!(user.is_admin());
    }

    #[test]
    fn test_full_name_fallback() {
        let mut user = User::new(
            "joana".to_string(),
            "joana@example.com".to_string(),
            "hash".to_string(),
            UserRole::Reader,
        );
        assert_eq!(user.full_name(), "joana");

        user.first_name = "Joana".to_string();
        user.last_name = "Silva".to_string();
        assert_eq!(user.full_name(), "Joana Silva");
    }

    #[test]
    fn test_user_role_round_trip() {
        assert_eq!(UserRole::from_str("admin").unwrap(), UserRole::Admin);
        assert_eq!(UserRole::from_str("READER").unwrap(), UserRole::Reader);
        assert!(UserRole::from_str("editor").is_err());
        assert_eq!(UserRole::Admin.to_string(), "admin");
    }
}
