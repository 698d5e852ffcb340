use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use sea_orm::ConnectionTrait;
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    version: String,
    database: String,
}

/// `GET /health` — liveness probe, no database access.
async fn root_health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "ok": true }))
}

/// `GET /api/v1/health` — readiness check including database connectivity.
async fn api_health(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = match state.db.execute_unprepared("SELECT 1").await {
        Ok(_) => "connected",
        Err(_) => "disconnected",
    };

    Json(HealthResponse {
        ok: database == "connected",
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: database.to_string(),
    })
}

pub fn root_router() -> Router<AppState> {
    Router::new().route("/health", get(root_health))
}

pub fn api_router() -> Router<AppState> {
    Router::new().route("/health", get(api_health))
}
