pub mod extractors;
pub mod middleware;
pub mod password;
pub mod service;
pub mod token;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::UserProfile;

pub use extractors::AuthenticatedUser;
pub use middleware::AuthMiddleware;
pub use password::{hash_password, verify_password};
pub use service::{AuthService, Session};
pub use token::{Claims, IssuedToken, TokenKeys};

/// Represents the payload for a user login request.
///
/// Missing fields deserialize as empty strings and simply fail to match a user.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Represents the payload for a new user registration request.
///
/// Accepts `fullName` as well as `full_name`. Missing fields deserialize as
/// empty strings so they are reported as a validation error, not a parse error.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(default, alias = "fullName")]
    #[validate(length(min = 1))]
    pub full_name: String,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub password: String,
}

/// Response body of a successful login.
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub message: String,
    /// The JWT to present as `Authorization: Bearer <token>`.
    pub token: String,
    pub user: UserProfile,
}

impl From<Session> for LoginResponse {
    fn from(session: Session) -> Self {
        Self {
            message: "Login successful".to_string(),
            token: session.token,
            user: session.user,
        }
    }
}
