use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use serde::{Deserialize, Serialize};

use crate::auth::middleware::AuthUser;
use crate::entities::{match_pair, message, user};
use crate::error::AppError;
use crate::state::AppState;

/// Message page bounds; out-of-range limits are clamped, not rejected.
const MIN_LIMIT: u64 = 1;
const MAX_LIMIT: u64 = 500;
const DEFAULT_LIMIT: u64 = 100;

/// Storage bound on a message body.
const MAX_BODY_LEN: usize = 2000;

pub fn router() -> Router<AppState> {
    Router::new().route("/messages", get(list_messages).post(send_message))
}

// ─────────────────────────────────────────────────────────────────────────────
// DTOs
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ListMessagesQuery {
    pub match_id: i32,
    pub limit: Option<u64>,
}

#[derive(Deserialize)]
pub struct SendMessageRequest {
    pub match_id: i32,
    pub body: String,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub id: i32,
    pub match_id: i32,
    pub sender_id: i32,
    pub body: String,
    pub created_at: String,
}

impl From<message::Model> for MessageResponse {
    fn from(m: message::Model) -> Self {
        Self {
            id: m.id,
            match_id: m.match_id,
            sender_id: m.sender_id,
            body: m.body,
            created_at: m.created_at.to_rfc3339(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Chat authorization
// ─────────────────────────────────────────────────────────────────────────────

/// Resolve an active match and verify the caller is a participant.
///
/// Every message read/write goes through this gate: an inactive or missing
/// match is NotFound, a non-participant is Forbidden.
async fn resolve_match_for_user(
    db: &DatabaseConnection,
    match_id: i32,
    current: &user::Model,
) -> Result<match_pair::Model, AppError> {
    let found = match_pair::Entity::find_by_id(match_id)
        .filter(match_pair::Column::IsActive.eq(true))
        .one(db)
        .await
        .map_err(|e| AppError::Internal(e.into()))?
        .ok_or_else(|| AppError::NotFound("Match not found.".to_string()))?;

    if !found.has_participant(current.id) {
        return Err(AppError::Forbidden("Not your match.".to_string()));
    }

    Ok(found)
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// `GET /api/v1/messages?match_id=1&limit=100`
///
/// Messages of a match in arrival order (creation time, insertion sequence
/// breaking ties).
async fn list_messages(
    State(state): State<AppState>,
    AuthUser(current): AuthUser,
    Query(query): Query<ListMessagesQuery>,
) -> Result<Json<Vec<MessageResponse>>, AppError> {
    let found = resolve_match_for_user(&state.db, query.match_id, &current).await?;

    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(MIN_LIMIT, MAX_LIMIT);

    let rows = message::Entity::find()
        .filter(message::Column::MatchId.eq(found.id))
        .order_by_asc(message::Column::CreatedAt)
        .order_by_asc(message::Column::Id)
        .limit(limit)
        .all(&state.db)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;

    Ok(Json(rows.into_iter().map(MessageResponse::from).collect()))
}

/// `POST /api/v1/messages`
async fn send_message(
    State(state): State<AppState>,
    AuthUser(current): AuthUser,
    Json(body): Json<SendMessageRequest>,
) -> Result<Response, AppError> {
    let found = resolve_match_for_user(&state.db, body.match_id, &current).await?;

    let text = body.body;
    if text.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Message body must not be empty.".to_string(),
        ));
    }
    if text.len() > MAX_BODY_LEN {
        return Err(AppError::BadRequest(format!(
            "Message body must be at most {MAX_BODY_LEN} characters."
        )));
    }

    let active = message::ActiveModel {
        match_id: Set(found.id),
        sender_id: Set(current.id),
        body: Set(text),
        created_at: Set(Utc::now().fixed_offset()),
        ..Default::default()
    };
    let created = active
        .insert(&state.db)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;

    Ok((StatusCode::CREATED, Json(MessageResponse::from(created))).into_response())
}
