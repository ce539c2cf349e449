use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// A row of the `tokens` ledger.
///
/// Rows are only ever appended (at login) or flipped to inactive (at logout);
/// expired rows stay in place and are filtered out by the validity check.
#[derive(Debug, Clone, FromRow)]
pub struct SessionToken {
    pub id: i32,
    pub user_id: i32,
    pub token: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub is_active: bool,
}

impl SessionToken {
    /// Whether this ledger entry still authorizes requests at `now`.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.is_active && now < self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn entry(expires_at: DateTime<Utc>, is_active: bool) -> SessionToken {
        SessionToken {
            id: 1,
            user_id: 1,
            token: "t".to_string(),
            created_at: Utc::now(),
            expires_at,
            is_active,
        }
    }

    #[test]
    fn test_validity_window() {
        let now = Utc::now();
        let expires_at = now + Duration::hours(24);

        assert!(entry(expires_at, true).is_valid_at(now));
        assert!(!entry(expires_at, false).is_valid_at(now));
        // Expiry is exclusive.
        assert!(!entry(expires_at, true).is_valid_at(expires_at));
        assert!(!entry(expires_at, true).is_valid_at(expires_at + Duration::seconds(1)));
    }
}
