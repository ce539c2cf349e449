use crate::{
    auth::{AuthMiddleware, AuthenticatedUser, LoginRequest, LoginResponse, RegisterRequest},
    error::AppError,
    state::AppState,
};
use actix_web::{get, post, web, HttpResponse, Responder};
use serde_json::json;
use validator::Validate;

/// Register a new user
///
/// Creates the account only; the client logs in separately.
///
/// ## Responses:
/// - `201 Created`: `{"message": "Registration successful"}`
/// - `400 Bad Request`: a field is missing or empty.
/// - `409 Conflict`: the email is already registered.
#[post("/register")]
pub async fn register(
    state: web::Data<AppState>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    register_data.validate()?;

    state
        .auth
        .register(
            &register_data.full_name,
            &register_data.email,
            &register_data.password,
        )
        .await?;

    Ok(HttpResponse::Created().json(json!({ "message": "Registration successful" })))
}

/// Login user
///
/// ## Responses:
/// - `200 OK`: `{"message", "token", "user": {"id", "fullName", "email"}}`
/// - `401 Unauthorized`: `{"message": "Invalid credentials"}` for an unknown
///   email or a wrong password alike.
#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    let session = state
        .auth
        .login(&login_data.email, &login_data.password)
        .await?;

    Ok(HttpResponse::Ok().json(LoginResponse::from(session)))
}

/// Logout user
///
/// Revokes the token that authenticated this request. Other sessions of the
/// same user stay valid.
#[post("/logout", wrap = "AuthMiddleware")]
pub async fn logout(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    state.auth.logout(&user.token).await?;
    log::debug!("user {} logged out", user.user_id);

    Ok(HttpResponse::Ok().json(json!({ "message": "Logout successful" })))
}

/// Current user's profile
#[get("/profile", wrap = "AuthMiddleware")]
pub async fn profile(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let profile = state.auth.profile(user.user_id).await?;

    Ok(HttpResponse::Ok().json(json!({ "user": profile })))
}
