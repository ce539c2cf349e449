use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use crate::error::AppError;

/// The identity attached to a request by `AuthMiddleware`.
///
/// Also usable directly as a handler argument on routes wrapped by the
/// middleware. Carries the raw bearer token so logout can revoke exactly the
/// token that authenticated the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: i32,
    pub token: String,
}

impl FromRequest for AuthenticatedUser {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<AuthenticatedUser>().cloned() {
            Some(user) => ready(Ok(user)),
            None => {
                log::warn!("{} reached a handler without AuthMiddleware", req.path());
                let err = AppError::Unauthorized("Access token required".to_string());
                ready(Err(err.into()))
            }
        }
    }
}
