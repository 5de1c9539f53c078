//! Session model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Authenticated session backed by an opaque token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Session token (UUID v4)
    pub id: String,
    /// Owning user ID
    pub user_id: i64,
    /// Expiration timestamp
    pub expires_at: DateTime<Utc>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Whether the session has passed its expiration time.
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_session_expiry() {
        let now = Utc::now();
        let live = Session {
            id: "token".to_string(),
            user_id: 1,
            expires_at: now + Duration::hours(1),
            created_at: now,
        };
        let dead = Session {
            id: "token2".to_string(),
            user_id: 1,
            expires_at: now - Duration::hours(1),
            created_at: now,
        };

        assert!(!live.is_expired());
        assert!(dead.is_expired());
    }
}
