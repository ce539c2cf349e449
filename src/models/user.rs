use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A registered user as stored in the `users` table.
///
/// Carries the password hash, so it is never serialized; handlers respond with
/// [`UserProfile`] instead.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i32,
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
}

/// Public projection of a user: the fields safe to hand back to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: i32,
    pub full_name: String,
    pub email: String,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name,
            email: user.email,
        }
    }
}
