use std::sync::Arc;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::token::TokenKeys;
use crate::auth::AuthenticatedUser;
use crate::error::AppError;
use crate::models::UserProfile;
use crate::store::users::email_taken;
use crate::store::{CredentialStore, TokenLedger};

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user: UserProfile,
}

/// Registration, login, logout and bearer-token authentication.
///
/// All secret handling (password hashing, token signing) happens here; the
/// stores only ever see finished hashes and tokens.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn CredentialStore>,
    ledger: Arc<dyn TokenLedger>,
    keys: TokenKeys,
    bcrypt_cost: u32,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn CredentialStore>,
        ledger: Arc<dyn TokenLedger>,
        keys: TokenKeys,
        bcrypt_cost: u32,
    ) -> Self {
        Self {
            users,
            ledger,
            keys,
            bcrypt_cost,
        }
    }

    /// Creates an account. Does not log the user in.
    pub async fn register(
        &self,
        full_name: &str,
        email: &str,
        password: &str,
    ) -> Result<i32, AppError> {
        if full_name.is_empty() || email.is_empty() || password.is_empty() {
            return Err(AppError::ValidationError("All fields are required".into()));
        }

        if self.users.find_by_email(email).await?.is_some() {
            return Err(email_taken());
        }

        let password_hash = hash_password(password, self.bcrypt_cost)?;
        let id = self.users.create(full_name, email, &password_hash).await?;

        log::info!("User registered successfully: {}", id);
        Ok(id)
    }

    /// Verifies credentials, then signs a token and records it in the ledger.
    ///
    /// Unknown email and wrong password both fail with `InvalidCredentials`.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, AppError> {
        let user = match self.users.find_by_email(email).await? {
            Some(user) => user,
            None => return Err(AppError::InvalidCredentials),
        };

        if !verify_password(password, &user.password_hash)? {
            return Err(AppError::InvalidCredentials);
        }

        let issued = self.keys.issue(user.id)?;
        self.ledger
            .insert(user.id, &issued.token, issued.expires_at)
            .await?;

        log::debug!("issued session token for user {}", user.id);
        Ok(Session {
            token: issued.token,
            user: user.into(),
        })
    }

    /// Soft-revokes `token`. Succeeds whether or not the token was active.
    pub async fn logout(&self, token: &str) -> Result<(), AppError> {
        self.ledger.deactivate(token).await
    }

    /// Accepts `token` only if its signature and claims verify *and* its
    /// ledger entry is still active and unexpired.
    pub async fn authenticate(&self, token: &str) -> Result<AuthenticatedUser, AppError> {
        let claims = self.keys.verify(token)?;

        if !self.ledger.is_valid(token).await? {
            log::debug!("token for user {} not valid in ledger", claims.sub);
            return Err(AppError::Unauthorized("Invalid or expired token".into()));
        }

        Ok(AuthenticatedUser {
            user_id: claims.sub,
            token: token.to_string(),
        })
    }

    pub async fn profile(&self, user_id: i32) -> Result<UserProfile, AppError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".into()))
    }

    /// Checks that the credential store is reachable and initialised.
    pub async fn ping(&self) -> Result<(), AppError> {
        self.users.ping().await
    }
}
