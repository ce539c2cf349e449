use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::error::AppError;

/// Server-side record of issued session tokens.
///
/// A token is only accepted while its ledger entry is active and unexpired,
/// independently of the expiry embedded in the token itself.
#[async_trait]
pub trait TokenLedger: Send + Sync {
    /// Appends a new, active entry.
    async fn insert(
        &self,
        user_id: i32,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AppError>;

    /// True iff an entry with exactly this token is active and `expires_at` is
    /// strictly in the future at the time of the call.
    async fn is_valid(&self, token: &str) -> Result<bool, AppError>;

    /// Marks every entry for this token inactive. Unknown or already inactive
    /// tokens are a no-op.
    async fn deactivate(&self, token: &str) -> Result<(), AppError>;
}

pub struct PgTokenLedger {
    pool: PgPool,
}

impl PgTokenLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TokenLedger for PgTokenLedger {
    async fn insert(
        &self,
        user_id: i32,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        sqlx::query("INSERT INTO tokens (user_id, token, expires_at) VALUES ($1, $2, $3)")
            .bind(user_id)
            .bind(token)
            .bind(expires_at)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn is_valid(&self, token: &str) -> Result<bool, AppError> {
        let valid: bool = sqlx::query_scalar(
            "SELECT EXISTS(
                SELECT 1 FROM tokens
                WHERE token = $1 AND is_active = TRUE AND expires_at > NOW()
            )",
        )
        .bind(token)
        .fetch_one(&self.pool)
        .await?;

        Ok(valid)
    }

    async fn deactivate(&self, token: &str) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE tokens SET is_active = FALSE WHERE token = $1")
            .bind(token)
            .execute(&self.pool)
            .await?;

        log::debug!("deactivated {} ledger entries", result.rows_affected());
        Ok(())
    }
}
