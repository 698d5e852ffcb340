use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, SqlErr, TransactionTrait,
};
use serde::{Deserialize, Serialize};

use crate::auth::middleware::AuthUser;
use crate::entities::{match_pair, swipe, user};
use crate::error::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/swipes", post(swipe_handler))
}

#[derive(Deserialize)]
pub struct SwipeRequest {
    pub target_user_id: i32,
    pub like: bool,
}

#[derive(Serialize)]
pub struct SwipeResponse {
    #[serde(rename = "match")]
    pub matched: bool,
}

/// `POST /api/v1/swipes`
///
/// Records a directional preference and reconciles it into a match when the
/// like is reciprocated. The upsert, the reciprocity check and the
/// conditional match insert run in one transaction; a unique-constraint
/// violation from a racing mutual swipe means the match already exists and
/// is treated as the same idempotent success.
async fn swipe_handler(
    State(state): State<AppState>,
    AuthUser(current): AuthUser,
    Json(body): Json<SwipeRequest>,
) -> Result<Json<SwipeResponse>, AppError> {
    let target_id = body.target_user_id;

    if target_id == current.id {
        return Err(AppError::BadRequest("Cannot swipe on yourself.".to_string()));
    }

    let target = user::Entity::find_by_id(target_id)
        .one(&state.db)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;
    if target.is_none() {
        return Err(AppError::NotFound("Target user not found.".to_string()));
    }

    let txn = state
        .db
        .begin()
        .await
        .map_err(|e| AppError::Internal(e.into()))?;

    // Upsert the directional swipe: a user may change their mind, no
    // history is kept.
    let existing = swipe::Entity::find()
        .filter(swipe::Column::FromUserId.eq(current.id))
        .filter(swipe::Column::ToUserId.eq(target_id))
        .one(&txn)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;

    if let Some(found) = existing {
        let mut active: swipe::ActiveModel = found.into();
        active.like = Set(body.like);
        active
            .update(&txn)
            .await
            .map_err(|e| AppError::Internal(e.into()))?;
    } else {
        let active = swipe::ActiveModel {
            from_user_id: Set(current.id),
            to_user_id: Set(target_id),
            like: Set(body.like),
            created_at: Set(Utc::now().fixed_offset()),
            ..Default::default()
        };
        active
            .insert(&txn)
            .await
            .map_err(|e| AppError::Internal(e.into()))?;
    }

    // Reciprocity only matters when the current swipe is a like. Symmetry is
    // never assumed: the reverse edge must exist as its own like.
    let mut matched = false;
    if body.like {
        let reverse = swipe::Entity::find()
            .filter(swipe::Column::FromUserId.eq(target_id))
            .filter(swipe::Column::ToUserId.eq(current.id))
            .filter(swipe::Column::Like.eq(true))
            .one(&txn)
            .await
            .map_err(|e| AppError::Internal(e.into()))?;

        if reverse.is_some() {
            let (user1_id, user2_id) = canonical_pair(current.id, target_id);

            let existing_match = match_pair::Entity::find()
                .filter(match_pair::Column::User1Id.eq(user1_id))
                .filter(match_pair::Column::User2Id.eq(user2_id))
                .one(&txn)
                .await
                .map_err(|e| AppError::Internal(e.into()))?;

            if existing_match.is_none() {
                let new_match = match_pair::ActiveModel {
                    user1_id: Set(user1_id),
                    user2_id: Set(user2_id),
                    is_active: Set(true),
                    created_at: Set(Utc::now().fixed_offset()),
                    ..Default::default()
                };
                match new_match.insert(&txn).await {
                    Ok(_) => {
                        tracing::info!(user1_id, user2_id, "Match created");
                    }
                    // A concurrent mutual swipe won the insert race; the
                    // pair exists, which is the outcome we wanted.
                    Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {}
                    Err(e) => return Err(AppError::Internal(e.into())),
                }
            }
            matched = true;
        }
    }

    txn.commit()
        .await
        .map_err(|e| AppError::Internal(e.into()))?;

    Ok(Json(SwipeResponse { matched }))
}

/// Order a pair canonically (smaller id first) so the match row is unique
/// regardless of who liked whom first.
const fn canonical_pair(a: i32, b: i32) -> (i32, i32) {
    if a < b { (a, b) } else { (b, a) }
}
