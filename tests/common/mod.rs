use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use migration::{Migrator, MigratorTrait};
use serde_json::json;
use tower::ServiceExt;

use korfinder_api::config::{Config, Environment};
use korfinder_api::state::AppState;

/// Build a fresh app over an in-memory database with migrations applied.
pub async fn test_app() -> Router {
    let db = sea_orm::Database::connect("sqlite::memory:")
        .await
        .unwrap_or_default();
    Migrator::up(&db, None).await.unwrap_or_default();

    let state = AppState {
        db,
        config: Config {
            database_url: String::new(),
            server_host: std::net::IpAddr::from([127, 0, 0, 1]),
            server_port: 0,
            environment: Environment::Development,
            log_level: "warn".to_string(),
            jwt_secret: "test-secret-key-for-testing-only-32chars".to_string(),
            jwt_expiration_secs: 900,
            frontend_url: "http://localhost:3001".to_string(),
        },
    };

    korfinder_api::routes::router().with_state(state)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.clone().oneshot(request).await.unwrap_or_default();

    let status = response.status();
    let body = response
        .into_body()
        .collect()
        .await
        .map(http_body_util::Collected::to_bytes)
        .unwrap_or_default();
    let body_str = String::from_utf8(body.to_vec()).unwrap_or_default();

    (status, body_str)
}

/// Send a GET request and return (status, body).
pub async fn get(app: &Router, uri: &str) -> (StatusCode, String) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap_or_default();
    send(app, request).await
}

/// Send an authenticated GET request.
pub async fn get_with_auth(app: &Router, uri: &str, token: &str) -> (StatusCode, String) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap_or_default();
    send(app, request).await
}

/// Send a POST request with a JSON body.
pub async fn post_json(
    app: &Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, String) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap_or_default();
    send(app, request).await
}

/// Send an authenticated POST request with a JSON body.
pub async fn post_json_with_auth(
    app: &Router,
    uri: &str,
    body: &serde_json::Value,
    token: &str,
) -> (StatusCode, String) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap_or_default();
    send(app, request).await
}

/// Send an authenticated PATCH request with a JSON body.
pub async fn patch_json_with_auth(
    app: &Router,
    uri: &str,
    body: &serde_json::Value,
    token: &str,
) -> (StatusCode, String) {
    let request = Request::builder()
        .method("PATCH")
        .uri(uri)
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap_or_default();
    send(app, request).await
}

/// Send an authenticated DELETE request.
pub async fn delete_with_auth(app: &Router, uri: &str, token: &str) -> (StatusCode, String) {
    let request = Request::builder()
        .method("DELETE")
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap_or_default();
    send(app, request).await
}

/// Register a user and return their access token.
pub async fn register_user(app: &Router, email: &str, role: &str) -> String {
    let (status, body) = post_json(
        app,
        "/api/v1/auth/register",
        &json!({
            "first_name": "Test",
            "last_name": "User",
            "email": email,
            "role": role,
            "password": "Password123!",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
    let json: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    json["token"].as_str().unwrap_or_default().to_string()
}

/// Register a user with a specific first name (used in feed card assertions).
pub async fn register_named_user(
    app: &Router,
    email: &str,
    first_name: &str,
    role: &str,
) -> String {
    let (status, body) = post_json(
        app,
        "/api/v1/auth/register",
        &json!({
            "first_name": first_name,
            "last_name": "User",
            "email": email,
            "role": role,
            "password": "Password123!",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
    let json: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    json["token"].as_str().unwrap_or_default().to_string()
}

/// Fetch the caller's profile via `/auth/me`.
pub async fn me(app: &Router, token: &str) -> serde_json::Value {
    let (status, body) = get_with_auth(app, "/api/v1/auth/me", token).await;
    assert_eq!(status, StatusCode::OK, "me failed: {body}");
    serde_json::from_str(&body).unwrap_or_default()
}

/// Complete onboarding with a minimal payload.
pub async fn onboard(app: &Router, token: &str, payload: &serde_json::Value) {
    let (status, body) = post_json_with_auth(app, "/api/v1/onboarding", payload, token).await;
    assert_eq!(status, StatusCode::OK, "onboarding failed: {body}");
}
