pub mod auth;
pub mod health;
pub mod tasks;

use actix_web::{
    error::{JsonPayloadError, PathError},
    web, HttpRequest,
};

use crate::auth::AuthMiddleware;
use crate::error::AppError;

/// Registers the API routes. Mounted under `/api` by the caller.
///
/// `/register` and `/login` are public; `/logout`, `/profile` and everything
/// under `/tasks` sit behind `AuthMiddleware`.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .app_data(web::PathConfig::default().error_handler(path_error))
        .service(auth::register)
        .service(auth::login)
        .service(auth::logout)
        .service(auth::profile)
        .service(
            web::scope("/tasks")
                .wrap(AuthMiddleware)
                .service(tasks::get_tasks)
                .service(tasks::create_task)
                .service(tasks::update_task)
                .service(tasks::delete_task),
        );
}

/// Malformed or mistyped JSON bodies are reported like any other validation error.
fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::ValidationError(format!("Invalid request body: {}", err)).into()
}

/// A task id that does not parse can never name a task the caller owns.
fn path_error(err: PathError, req: &HttpRequest) -> actix_web::Error {
    log::debug!("Rejected path {}: {}", req.path(), err);
    tasks::access_denied().into()
}
