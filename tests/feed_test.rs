mod common;

use axum::http::StatusCode;
use serde_json::json;

async fn subject_id(app: &axum::Router, name: &str) -> i64 {
    let (_status, body) = common::get(app, "/api/v1/subjects").await;
    let json: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    let empty = vec![];
    json.as_array()
        .unwrap_or(&empty)
        .iter()
        .find(|s| s["name"] == name)
        .and_then(|s| s["id"].as_i64())
        .unwrap_or_default()
}

async fn create_listing(app: &axum::Router, token: &str, title: &str) -> i64 {
    let math = subject_id(app, "Mathematics").await;
    let (status, body) = common::post_json_with_auth(
        app,
        "/api/v1/listings",
        &json!({ "subject_id": math, "title": title, "description": "d" }),
        token,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {body}");
    let card: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    card["id"].as_i64().unwrap_or_default()
}

async fn feed(app: &axum::Router, token: &str, query: &str) -> Vec<serde_json::Value> {
    let uri = if query.is_empty() {
        "/api/v1/feed".to_string()
    } else {
        format!("/api/v1/feed?{query}")
    };
    let (status, body) = common::get_with_auth(app, &uri, token).await;
    assert_eq!(status, StatusCode::OK, "feed failed: {body}");
    let json: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    json.as_array().cloned().unwrap_or_default()
}

#[tokio::test]
async fn student_feed_shows_published_tutor_listings() {
    let app = common::test_app().await;
    let tutor = common::register_named_user(&app, "tutor@example.com", "Anna", "tutor").await;
    let student = common::register_user(&app, "student@example.com", "student").await;
    let listing_id = create_listing(&app, &tutor, "Calculus").await;

    let cards = feed(&app, &student, "").await;
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0]["id"].as_i64(), Some(listing_id));
    assert_eq!(cards[0]["title"], "Calculus");
    assert_eq!(cards[0]["subject"], "Mathematics");
    assert_eq!(cards[0]["role"], "tutor");
}

#[tokio::test]
async fn student_feed_collapses_to_newest_listing_per_tutor() {
    let app = common::test_app().await;
    let tutor = common::register_user(&app, "tutor@example.com", "tutor").await;
    let student = common::register_user(&app, "student@example.com", "student").await;

    create_listing(&app, &tutor, "First").await;
    create_listing(&app, &tutor, "Second").await;
    let newest = create_listing(&app, &tutor, "Third").await;

    let cards = feed(&app, &student, "").await;
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0]["id"].as_i64(), Some(newest));
    assert_eq!(cards[0]["title"], "Third");
}

#[tokio::test]
async fn student_feed_omits_unpublished_listings() {
    let app = common::test_app().await;
    let tutor = common::register_user(&app, "tutor@example.com", "tutor").await;
    let student = common::register_user(&app, "student@example.com", "student").await;
    let math = subject_id(&app, "Mathematics").await;

    let (status, _body) = common::post_json_with_auth(
        &app,
        "/api/v1/listings",
        &json!({
            "subject_id": math,
            "title": "Draft",
            "description": "d",
            "is_published": false,
        }),
        &tutor,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    assert!(feed(&app, &student, "").await.is_empty());
}

#[tokio::test]
async fn student_feed_respects_exclusions() {
    let app = common::test_app().await;
    let tutor_a = common::register_user(&app, "a@example.com", "tutor").await;
    let tutor_b = common::register_user(&app, "b@example.com", "tutor").await;
    let student = common::register_user(&app, "student@example.com", "student").await;
    let seen = create_listing(&app, &tutor_a, "Seen").await;
    let fresh = create_listing(&app, &tutor_b, "Fresh").await;

    let cards = feed(&app, &student, &format!("exclude_ids={seen}")).await;
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0]["id"].as_i64(), Some(fresh));
}

#[tokio::test]
async fn tutor_feed_shows_onboarded_students_as_synthetic_cards() {
    let app = common::test_app().await;
    let tutor = common::register_user(&app, "tutor@example.com", "tutor").await;
    let student = common::register_named_user(&app, "kasia@example.com", "Kasia", "student").await;
    let math = subject_id(&app, "Mathematics").await;
    let student_id = common::me(&app, &student).await["id"]
        .as_i64()
        .unwrap_or_default();

    common::onboard(
        &app,
        &student,
        &json!({ "online": true, "city": "Warsaw", "subjects": [math] }),
    )
    .await;

    let cards = feed(&app, &tutor, "").await;
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0]["id"].as_i64(), Some(-student_id));
    assert_eq!(cards[0]["owner_id"].as_i64(), Some(student_id));
    assert_eq!(cards[0]["role"], "student");
    assert_eq!(cards[0]["title"], "Kasia seeks a tutor in Mathematics");
    assert_eq!(cards[0]["is_published"], true);
}

#[tokio::test]
async fn tutor_feed_skips_students_who_have_not_onboarded() {
    let app = common::test_app().await;
    let tutor = common::register_user(&app, "tutor@example.com", "tutor").await;
    common::register_user(&app, "fresh@example.com", "student").await;

    assert!(feed(&app, &tutor, "").await.is_empty());
}

#[tokio::test]
async fn tutor_feed_respects_negative_exclusions() {
    let app = common::test_app().await;
    let tutor = common::register_user(&app, "tutor@example.com", "tutor").await;
    let seen = common::register_user(&app, "seen@example.com", "student").await;
    let fresh = common::register_user(&app, "fresh@example.com", "student").await;
    let seen_id = common::me(&app, &seen).await["id"].as_i64().unwrap_or_default();
    let fresh_id = common::me(&app, &fresh).await["id"]
        .as_i64()
        .unwrap_or_default();

    common::onboard(&app, &seen, &json!({ "online": true })).await;
    common::onboard(&app, &fresh, &json!({ "online": true })).await;

    let cards = feed(&app, &tutor, &format!("exclude_ids=-{seen_id}")).await;
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0]["id"].as_i64(), Some(-fresh_id));
}

#[tokio::test]
async fn feed_never_contains_the_viewer() {
    let app = common::test_app().await;
    let tutor = common::register_user(&app, "tutor@example.com", "tutor").await;
    create_listing(&app, &tutor, "Mine").await;

    // A tutor never sees listing cards at all, let alone their own
    let cards = feed(&app, &tutor, "").await;
    assert!(cards.is_empty());
}

#[tokio::test]
async fn feed_limit_is_clamped_not_rejected() {
    let app = common::test_app().await;
    let student = common::register_user(&app, "student@example.com", "student").await;
    for i in 0..3 {
        let tutor =
            common::register_user(&app, &format!("tutor{i}@example.com"), "tutor").await;
        create_listing(&app, &tutor, &format!("Listing {i}")).await;
    }

    let cards = feed(&app, &student, "limit=2").await;
    assert_eq!(cards.len(), 2);

    // limit=0 clamps up to 1
    let cards = feed(&app, &student, "limit=0").await;
    assert_eq!(cards.len(), 1);
}

#[tokio::test]
async fn feed_requires_auth() {
    let app = common::test_app().await;
    let (status, _body) = common::get(&app, "/api/v1/feed").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
