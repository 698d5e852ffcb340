use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use sea_orm::{EntityTrait, QueryOrder};
use serde::Serialize;

use crate::entities::subject;
use crate::error::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/subjects", get(list_subjects))
}

#[derive(Serialize)]
struct SubjectResponse {
    id: i32,
    name: String,
}

/// `GET /api/v1/subjects` — catalog for the onboarding wizard.
async fn list_subjects(
    State(state): State<AppState>,
) -> Result<Json<Vec<SubjectResponse>>, AppError> {
    let subjects = subject::Entity::find()
        .order_by_asc(subject::Column::Name)
        .all(&state.db)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;

    Ok(Json(
        subjects
            .into_iter()
            .map(|s| SubjectResponse {
                id: s.id,
                name: s.name,
            })
            .collect(),
    ))
}
