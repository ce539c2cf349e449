use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{http::StatusCode, test, web, App};
use pretty_assertions::assert_eq;
use serde_json::json;
use taskmate::auth::LoginResponse;
use taskmate::models::UserProfile;
use taskmate::routes::{self, health};
use taskmate::AppState;

// Lowest bcrypt cost; production uses the configured cost (default 10).
const TEST_BCRYPT_COST: u32 = 4;

fn test_state() -> AppState {
    AppState::in_memory("integration-test-secret", TEST_BCRYPT_COST)
}

#[actix_rt::test]
async fn test_register_login_logout_flow() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_state()))
            .wrap(Cors::permissive())
            .wrap(Logger::default())
            .service(health::health)
            .service(web::scope("/api").configure(routes::config)),
    )
    .await;

    let register_payload = json!({
        "fullName": "Jane",
        "email": "jane@x.com",
        "password": "pw123"
    });
    let req = test::TestRequest::post()
        .uri("/api/register")
        .set_json(&register_payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "message": "Registration successful" }));

    // Registration does not hand out a session.
    assert!(body.get("token").is_none());

    // Same email, different everything else.
    let req = test::TestRequest::post()
        .uri("/api/register")
        .set_json(json!({
            "fullName": "Impostor",
            "email": "jane@x.com",
            "password": "different"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let req = test::TestRequest::post()
        .uri("/api/login")
        .set_json(json!({ "email": "jane@x.com", "password": "wrong" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::post()
        .uri("/api/login")
        .set_json(json!({ "email": "jane@x.com", "password": "pw123" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let login: LoginResponse = test::read_body_json(resp).await;
    assert!(!login.token.is_empty());
    assert_eq!(login.user.full_name, "Jane");
    assert_eq!(login.user.email, "jane@x.com");

    let bearer = ("Authorization", format!("Bearer {}", login.token));

    let req = test::TestRequest::get()
        .uri("/api/profile")
        .insert_header(bearer.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    let profile: UserProfile = serde_json::from_value(body["user"].clone()).unwrap();
    assert_eq!(profile, login.user);

    let req = test::TestRequest::post()
        .uri("/api/logout")
        .insert_header(bearer.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    // The signature and claim expiry are still intact, but the ledger says no.
    for _ in 0..2 {
        let req = test::TestRequest::get()
            .uri("/api/profile")
            .insert_header(bearer.clone())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Invalid or expired token");
    }
}

#[actix_rt::test]
async fn test_logout_requires_token() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_state()))
            .service(web::scope("/api").configure(routes::config)),
    )
    .await;

    let req = test::TestRequest::post().uri("/api/logout").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Access token required");
}

#[actix_rt::test]
async fn test_sessions_are_revoked_independently() {
    let state = test_state();
    state.auth.register("Jane", "jane@x.com", "pw123").await.unwrap();
    let first = state.auth.login("jane@x.com", "pw123").await.unwrap();
    let second = state.auth.login("jane@x.com", "pw123").await.unwrap();

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state.clone()))
            .service(web::scope("/api").configure(routes::config)),
    )
    .await;

    state.auth.logout(&first.token).await.unwrap();
    assert!(state.auth.authenticate(&first.token).await.is_err());
    assert!(state.auth.authenticate(&second.token).await.is_ok());

    let req = test::TestRequest::post()
        .uri("/api/logout")
        .insert_header(("Authorization", format!("Bearer {}", second.token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    // Revoking an already revoked token is still a success.
    state.auth.logout(&second.token).await.unwrap();
    assert!(state.auth.authenticate(&first.token).await.is_err());
    assert!(state.auth.authenticate(&second.token).await.is_err());
}

#[actix_rt::test]
async fn test_invalid_registration_inputs() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_state()))
            .service(web::scope("/api").configure(routes::config)),
    )
    .await;

    let test_cases = vec![
        (json!({ "email": "a@x.com", "password": "pw" }), "missing full name"),
        (json!({ "fullName": "A", "password": "pw" }), "missing email"),
        (json!({ "fullName": "A", "email": "a@x.com" }), "missing password"),
        (
            json!({ "fullName": "", "email": "a@x.com", "password": "pw" }),
            "empty full name",
        ),
        (json!({ "fullName": 12, "email": "a@x.com" }), "wrong type"),
    ];

    for (payload, description) in test_cases {
        let req = test::TestRequest::post()
            .uri("/api/register")
            .set_json(&payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        let status = resp.status();
        let body: serde_json::Value = test::read_body_json(resp).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "{}: {}", description, body);
        assert!(body["message"].is_string(), "{}", description);
    }
}

#[actix_rt::test]
async fn test_login_failures_are_indistinguishable() {
    let state = test_state();
    state.auth.register("Jane", "jane@x.com", "pw123").await.unwrap();

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .service(web::scope("/api").configure(routes::config)),
    )
    .await;

    let mut bodies = Vec::new();
    for payload in [
        json!({ "email": "jane@x.com", "password": "wrong" }),
        json!({ "email": "nobody@x.com", "password": "pw123" }),
        json!({ "password": "pw123" }),
    ] {
        let req = test::TestRequest::post()
            .uri("/api/login")
            .set_json(&payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = test::read_body_json(resp).await;
        bodies.push(body);
    }

    assert_eq!(bodies[0], bodies[1]);
    assert_eq!(bodies[1], bodies[2]);
}
