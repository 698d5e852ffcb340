use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, QueryFilter, QueryOrder,
    TransactionTrait,
};
use serde::Deserialize;

use crate::auth::middleware::AuthUser;
use crate::entities::{listing, preference, role, subject, user, user_subject};
use crate::error::AppError;
use crate::state::AppState;

// ─────────────────────────────────────────────────────────────────────────────
// Router
// ─────────────────────────────────────────────────────────────────────────────

pub fn router() -> Router<AppState> {
    Router::new().route("/onboarding", post(save_onboarding))
}

// ─────────────────────────────────────────────────────────────────────────────
// DTOs
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct OnboardingRequest {
    #[serde(default = "default_true")]
    pub online: bool,
    #[serde(default)]
    pub offline: bool,
    #[serde(default)]
    pub group_classes: bool,
    pub city: Option<String>,
    pub hourly_rate: Option<f64>,
    /// Free-text need types, e.g. `["exam prep", "homework"]`.
    pub types: Option<Vec<String>>,
    /// Subject ids from the catalog.
    pub subjects: Option<Vec<i32>>,
}

const fn default_true() -> bool {
    true
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// `POST /api/v1/onboarding`
///
/// Upserts the caller's preferences and subject links, marks onboarding as
/// done, and for tutors keeps their single listing in sync with the profile.
/// Concurrent saves are last-write-wins.
async fn save_onboarding(
    State(state): State<AppState>,
    AuthUser(current): AuthUser,
    Json(body): Json<OnboardingRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    // Need types are stored comma-joined, so elements may not contain commas.
    let types = match &body.types {
        Some(list) if !list.is_empty() => {
            if list.iter().any(|t| t.contains(',')) {
                return Err(AppError::BadRequest(
                    "Need types must not contain commas.".to_string(),
                ));
            }
            Some(list.join(","))
        }
        _ => None,
    };

    let txn = state
        .db
        .begin()
        .await
        .map_err(|e| AppError::Internal(e.into()))?;

    // Upsert preferences
    let existing_pref = preference::Entity::find_by_id(current.id)
        .one(&txn)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;

    let pref_model = if let Some(pref) = existing_pref {
        let mut active: preference::ActiveModel = pref.into();
        active.online = Set(body.online);
        active.offline = Set(body.offline);
        active.group_classes = Set(body.group_classes);
        active.city = Set(body.city.clone());
        active.hourly_rate = Set(body.hourly_rate);
        active.types = Set(types);
        active
            .update(&txn)
            .await
            .map_err(|e| AppError::Internal(e.into()))?
    } else {
        let active = preference::ActiveModel {
            user_id: Set(current.id),
            online: Set(body.online),
            offline: Set(body.offline),
            group_classes: Set(body.group_classes),
            city: Set(body.city.clone()),
            hourly_rate: Set(body.hourly_rate),
            types: Set(types),
        };
        active
            .insert(&txn)
            .await
            .map_err(|e| AppError::Internal(e.into()))?
    };

    // Replace subject links when provided
    if let Some(subject_ids) = &body.subjects {
        let known = subject::Entity::find()
            .filter(subject::Column::Id.is_in(subject_ids.clone()))
            .all(&txn)
            .await
            .map_err(|e| AppError::Internal(e.into()))?;

        user_subject::Entity::delete_many()
            .filter(user_subject::Column::UserId.eq(current.id))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Internal(e.into()))?;

        for s in &known {
            let link = user_subject::ActiveModel {
                user_id: Set(current.id),
                subject_id: Set(s.id),
            };
            link.insert(&txn)
                .await
                .map_err(|e| AppError::Internal(e.into()))?;
        }
    }

    // Mark onboarding complete
    let mut active_user: user::ActiveModel = current.clone().into();
    active_user.onboarding_done = Set(true);
    let current = active_user
        .update(&txn)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;

    // Keep the tutor's single listing in sync with the profile
    if current.role == role::TUTOR {
        sync_tutor_listing(&txn, &current, &pref_model).await?;
    }

    txn.commit()
        .await
        .map_err(|e| AppError::Internal(e.into()))?;

    tracing::info!(user_id = current.id, role = %current.role, "Onboarding saved");

    Ok(Json(serde_json::json!({ "ok": true })))
}

/// Ensure the tutor has exactly one listing whose fields mirror the
/// profile/preferences. The oldest listing is reused; the flow upserts
/// rather than appends.
async fn sync_tutor_listing(
    txn: &DatabaseTransaction,
    tutor: &user::Model,
    pref: &preference::Model,
) -> Result<(), AppError> {
    let link = user_subject::Entity::find()
        .filter(user_subject::Column::UserId.eq(tutor.id))
        .order_by_asc(user_subject::Column::SubjectId)
        .one(txn)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;

    let first_subject = match link {
        Some(l) => subject::Entity::find_by_id(l.subject_id)
            .one(txn)
            .await
            .map_err(|e| AppError::Internal(e.into()))?,
        None => None,
    };

    let existing = listing::Entity::find()
        .filter(listing::Column::OwnerId.eq(tutor.id))
        .order_by_asc(listing::Column::CreatedAt)
        .one(txn)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;

    let title = first_subject
        .as_ref()
        .map_or_else(|| "Tutoring".to_string(), |s| format!("Tutoring in {}", s.name));

    if let Some(found) = existing {
        let description = found.description.clone();
        let mut active: listing::ActiveModel = found.into();
        active.subject_id = Set(first_subject.as_ref().map(|s| s.id));
        active.title = Set(title);
        active.description = Set(description);
        active.city = Set(pref.city.clone());
        active.is_online = Set(pref.online);
        active.is_offline = Set(pref.offline);
        active.hourly_rate = Set(pref.hourly_rate);
        active.level = Set(None);
        active.is_published = Set(true);
        active
            .update(txn)
            .await
            .map_err(|e| AppError::Internal(e.into()))?;
    } else {
        let active = listing::ActiveModel {
            owner_id: Set(tutor.id),
            subject_id: Set(first_subject.as_ref().map(|s| s.id)),
            title: Set(title),
            description: Set(String::new()),
            level: Set(None),
            city: Set(pref.city.clone()),
            is_online: Set(pref.online),
            is_offline: Set(pref.offline),
            hourly_rate: Set(pref.hourly_rate),
            is_published: Set(true),
            photo_url: Set(None),
            created_at: Set(Utc::now().fixed_offset()),
            ..Default::default()
        };
        active
            .insert(txn)
            .await
            .map_err(|e| AppError::Internal(e.into()))?;
    }

    Ok(())
}
