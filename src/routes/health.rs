use actix_web::{get, web, HttpResponse};
use chrono::Utc;
use serde_json::json;

use crate::AppState;

/// Readiness check. Needs no authentication; answers 200 only when the
/// credential store responds and its tables exist.
#[get("/health")]
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    match state.auth.ping().await {
        Ok(()) => HttpResponse::Ok().json(json!({
            "status": "ok",
            "message": "Database connection successful",
            "timestamp": Utc::now()
        })),
        Err(e) => {
            log::error!("Database connection test failed: {}", e);
            HttpResponse::InternalServerError().json(json!({
                "message": "Database connection failed"
            }))
        }
    }
}
