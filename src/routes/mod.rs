mod auth;
mod feed;
mod health;
mod listings;
mod matches;
mod messages;
mod onboarding;
mod subjects;
mod swipes;

use axum::Router;

use crate::state::AppState;

/// Build the complete application router.
///
/// Structure:
/// - `GET /health` — lightweight health check (used by deployment probes)
/// - `/api/v1/...` — auth, onboarding, subjects, listings, feed, swipes,
///   matches and messages route groups
pub fn router() -> Router<AppState> {
    let api_v1 = Router::new()
        .merge(health::api_router())
        .nest("/auth", auth::router())
        .nest("/listings", listings::router())
        .merge(onboarding::router())
        .merge(subjects::router())
        .merge(feed::router())
        .merge(swipes::router())
        .merge(matches::router())
        .merge(messages::router());

    Router::new()
        .merge(health::root_router())
        .nest("/api/v1", api_v1)
}
