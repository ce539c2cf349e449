use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::{is_unique_violation, AppError};
use crate::models::{User, UserProfile};

/// Persisted user records. No hashing happens here; callers hand over the
/// finished password hash.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Returns the user with this exact email, if any.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Inserts a user and returns its id.
    ///
    /// Fails with `AppError::Conflict` if the email is already taken.
    async fn create(
        &self,
        full_name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<i32, AppError>;

    /// Returns the public projection of a user.
    async fn find_by_id(&self, id: i32) -> Result<Option<UserProfile>, AppError>;

    /// Succeeds when the backing store answers queries and holds the users table.
    async fn ping(&self) -> Result<(), AppError>;
}

/// The conflict reported when an email is already registered.
pub(crate) fn email_taken() -> AppError {
    AppError::Conflict("User with this email already exists".into())
}

pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, full_name, email, password_hash FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn create(
        &self,
        full_name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<i32, AppError> {
        // `email` is the only unique column on `users`.
        let (id,) = sqlx::query_as::<_, (i32,)>(
            "INSERT INTO users (full_name, email, password_hash) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(full_name)
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                email_taken()
            } else {
                AppError::from(e)
            }
        })?;

        Ok(id)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<UserProfile>, AppError> {
        let profile = sqlx::query_as::<_, UserProfile>(
            "SELECT id, full_name, email FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;

        let has_users: bool = sqlx::query_scalar("SELECT to_regclass('users') IS NOT NULL")
            .fetch_one(&self.pool)
            .await?;
        if !has_users {
            return Err(AppError::StoreFailure("users table not found".into()));
        }

        Ok(())
    }
}
