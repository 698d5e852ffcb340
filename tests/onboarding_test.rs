mod common;

use axum::http::StatusCode;
use serde_json::json;

/// Look up a seeded subject id by name via the public catalog.
async fn subject_id(app: &axum::Router, name: &str) -> i64 {
    let (status, body) = common::get(app, "/api/v1/subjects").await;
    assert_eq!(status, StatusCode::OK, "subjects failed: {body}");
    let json: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    let empty = vec![];
    json.as_array()
        .unwrap_or(&empty)
        .iter()
        .find(|s| s["name"] == name)
        .and_then(|s| s["id"].as_i64())
        .unwrap_or_default()
}

#[tokio::test]
async fn subjects_catalog_is_seeded_and_sorted() {
    let app = common::test_app().await;
    let (status, body) = common::get(&app, "/api/v1/subjects").await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    let empty = vec![];
    let subjects = json.as_array().unwrap_or(&empty);
    assert!(!subjects.is_empty());
    let names: Vec<&str> = subjects
        .iter()
        .filter_map(|s| s["name"].as_str())
        .collect();
    let mut sorted = names.clone();
    sorted.sort_unstable();
    assert_eq!(names, sorted);
}

#[tokio::test]
async fn onboarding_marks_user_done() {
    let app = common::test_app().await;
    let token = common::register_user(&app, "student@example.com", "student").await;

    common::onboard(
        &app,
        &token,
        &json!({
            "online": true,
            "offline": false,
            "city": "Warsaw",
            "hourly_rate": 60.0,
            "types": ["exam prep"],
        }),
    )
    .await;

    let me = common::me(&app, &token).await;
    assert_eq!(me["onboarding_done"], true);
}

#[tokio::test]
async fn onboarding_rejects_comma_in_types() {
    let app = common::test_app().await;
    let token = common::register_user(&app, "commas@example.com", "student").await;

    let (status, _body) = common::post_json_with_auth(
        &app,
        "/api/v1/onboarding",
        &json!({ "types": ["exam,prep"] }),
        &token,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn tutor_onboarding_creates_single_listing() {
    let app = common::test_app().await;
    let token = common::register_user(&app, "tutor@example.com", "tutor").await;
    let math = subject_id(&app, "Mathematics").await;

    common::onboard(
        &app,
        &token,
        &json!({
            "online": true,
            "offline": true,
            "city": "Krakow",
            "hourly_rate": 100.0,
            "subjects": [math],
        }),
    )
    .await;

    let (status, body) = common::get_with_auth(&app, "/api/v1/listings/me", &token).await;
    assert_eq!(status, StatusCode::OK, "listings failed: {body}");
    let json: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    let empty = vec![];
    let listings = json.as_array().unwrap_or(&empty);
    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0]["title"], "Tutoring in Mathematics");
    assert_eq!(listings[0]["subject"], "Mathematics");
    assert_eq!(listings[0]["city"], "Krakow");
    assert_eq!(listings[0]["price_per_hour"], 100.0);
    assert_eq!(listings[0]["is_published"], true);
}

#[tokio::test]
async fn repeated_onboarding_upserts_instead_of_appending() {
    let app = common::test_app().await;
    let token = common::register_user(&app, "repeat@example.com", "tutor").await;
    let math = subject_id(&app, "Mathematics").await;
    let physics = subject_id(&app, "Physics").await;

    common::onboard(&app, &token, &json!({ "subjects": [math], "city": "Lodz" })).await;
    common::onboard(
        &app,
        &token,
        &json!({ "subjects": [physics], "city": "Gdansk", "hourly_rate": 90.0 }),
    )
    .await;

    let (status, body) = common::get_with_auth(&app, "/api/v1/listings/me", &token).await;
    assert_eq!(status, StatusCode::OK, "listings failed: {body}");
    let json: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    let empty = vec![];
    let listings = json.as_array().unwrap_or(&empty);

    // Still exactly one listing, resynced to the latest profile
    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0]["title"], "Tutoring in Physics");
    assert_eq!(listings[0]["city"], "Gdansk");
    assert_eq!(listings[0]["price_per_hour"], 90.0);
}

#[tokio::test]
async fn onboarding_requires_auth() {
    let app = common::test_app().await;
    let (status, _body) = common::post_json(&app, "/api/v1/onboarding", &json!({})).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
