use crate::error::AppError;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How long an issued session token stays valid.
pub const TOKEN_LIFETIME_HOURS: i64 = 24;

/// Represents the claims encoded within a session JWT.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject of the token: the user's id.
    pub sub: i32,
    /// Issued-at, seconds since epoch.
    pub iat: i64,
    /// Expiration, seconds since epoch. Always `iat` + 24h.
    pub exp: i64,
    /// Random token id, so tokens issued in the same second differ.
    pub jti: String,
}

/// A freshly signed token together with the expiry the ledger must record.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub claims: Claims,
    pub expires_at: DateTime<Utc>,
}

/// Signing and verification keys, derived once from the configured secret.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenKeys {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // A token is rejected from the second its `exp` is reached.
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Signs a token for `user_id`, issued now and expiring in 24 hours.
    pub fn issue(&self, user_id: i32) -> Result<IssuedToken, AppError> {
        self.issue_at(user_id, Utc::now())
    }

    /// Signs a token for `user_id` as if issued at `issued_at`.
    pub fn issue_at(&self, user_id: i32, issued_at: DateTime<Utc>) -> Result<IssuedToken, AppError> {
        let iat = issued_at.timestamp();
        let exp = iat + Duration::hours(TOKEN_LIFETIME_HOURS).num_seconds();
        let expires_at = DateTime::<Utc>::from_timestamp(exp, 0).ok_or_else(|| {
            AppError::InternalServerError(format!("token expiry out of range: {}", exp))
        })?;

        let claims = Claims {
            sub: user_id,
            iat,
            exp,
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AppError::InternalServerError(format!("Failed to generate token: {}", e)))?;

        Ok(IssuedToken {
            token,
            claims,
            expires_at,
        })
    }

    /// Verifies the signature and expiry of `token` and returns its claims.
    ///
    /// Any failure, whether malformed input, a foreign signature or an expired
    /// claim, is `AppError::Unauthorized("Invalid token")`.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation)?;
        Ok(data.claims)
    }
}
