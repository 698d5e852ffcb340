use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder};
use serde::Serialize;

use crate::auth::middleware::AuthUser;
use crate::entities::match_pair;
use crate::error::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/matches", get(list_matches))
}

#[derive(Serialize)]
pub struct MatchResponse {
    pub id: i32,
    pub user_id: i32,
    /// The other participant, always resolved relative to the caller.
    pub target_user_id: i32,
    pub created_at: String,
}

/// `GET /api/v1/matches` — active matches of the caller, newest first.
async fn list_matches(
    State(state): State<AppState>,
    AuthUser(current): AuthUser,
) -> Result<Json<Vec<MatchResponse>>, AppError> {
    let rows = match_pair::Entity::find()
        .filter(match_pair::Column::IsActive.eq(true))
        .filter(
            Condition::any()
                .add(match_pair::Column::User1Id.eq(current.id))
                .add(match_pair::Column::User2Id.eq(current.id)),
        )
        .order_by_desc(match_pair::Column::CreatedAt)
        .order_by_desc(match_pair::Column::Id)
        .all(&state.db)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;

    let result = rows
        .into_iter()
        .map(|m| MatchResponse {
            id: m.id,
            user_id: current.id,
            target_user_id: m.other_participant(current.id),
            created_at: m.created_at.to_rfc3339(),
        })
        .collect();

    Ok(Json(result))
}
