use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder,
};
use serde::Deserialize;

use crate::auth::middleware::AuthUser;
use crate::cards::{self, Card};
use crate::entities::{listing, role, subject, user};
use crate::error::AppError;
use crate::state::AppState;

// ─────────────────────────────────────────────────────────────────────────────
// Router
// ─────────────────────────────────────────────────────────────────────────────

/// Build the listing route group: `/listings/...`
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_listing))
        .route("/me", get(my_listings))
        .route(
            "/{id}",
            get(get_listing).patch(update_listing).delete(delete_listing),
        )
}

// ─────────────────────────────────────────────────────────────────────────────
// DTOs
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateListingRequest {
    pub subject_id: i32,
    pub title: String,
    pub description: String,
    pub city: Option<String>,
    #[serde(default = "default_true")]
    pub is_online: bool,
    #[serde(default)]
    pub is_offline: bool,
    pub hourly_rate: Option<f64>,
    pub level: Option<String>,
    #[serde(default = "default_true")]
    pub is_published: bool,
    pub photo_url: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateListingRequest {
    pub subject_id: Option<i32>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub city: Option<String>,
    pub is_online: Option<bool>,
    pub is_offline: Option<bool>,
    pub hourly_rate: Option<f64>,
    pub level: Option<String>,
    pub is_published: Option<bool>,
    pub photo_url: Option<String>,
}

const fn default_true() -> bool {
    true
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// `photo_url` is part of the public Card contract and must be a
/// well-formed http(s) URL.
fn validate_photo_url(url: &str) -> Result<(), String> {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .ok_or_else(|| "photo_url must be an http(s) URL.".to_string())?;
    let host = rest.split('/').next().unwrap_or("");
    if host.is_empty() || url.chars().any(char::is_whitespace) {
        return Err("photo_url is not a well-formed URL.".to_string());
    }
    Ok(())
}

/// Materialize a listing into its Card response, loading owner and subject.
async fn serialize_listing(
    db: &DatabaseConnection,
    entity: &listing::Model,
) -> Result<Card, AppError> {
    let owner = user::Entity::find_by_id(entity.owner_id)
        .one(db)
        .await
        .map_err(|e| AppError::Internal(e.into()))?
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Listing owner missing")))?;

    let subject_name = match entity.subject_id {
        Some(subject_id) => subject::Entity::find_by_id(subject_id)
            .one(db)
            .await
            .map_err(|e| AppError::Internal(e.into()))?
            .map(|s| s.name),
        None => None,
    };

    Ok(cards::listing_card(entity, &owner, subject_name.as_deref()))
}

async fn find_listing(db: &DatabaseConnection, id: i32) -> Result<listing::Model, AppError> {
    listing::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| AppError::Internal(e.into()))?
        .ok_or_else(|| AppError::NotFound("Listing not found.".to_string()))
}

async fn require_subject(db: &DatabaseConnection, id: i32) -> Result<subject::Model, AppError> {
    subject::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| AppError::Internal(e.into()))?
        .ok_or_else(|| AppError::NotFound("Subject not found.".to_string()))
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// `POST /api/v1/listings`
async fn create_listing(
    State(state): State<AppState>,
    AuthUser(current): AuthUser,
    Json(body): Json<CreateListingRequest>,
) -> Result<Response, AppError> {
    if current.role != role::TUTOR {
        return Err(AppError::Forbidden(
            "Only tutors can create listings.".to_string(),
        ));
    }

    if body.title.trim().is_empty() {
        return Err(AppError::BadRequest("Title is required.".to_string()));
    }
    if let Some(url) = &body.photo_url {
        validate_photo_url(url).map_err(AppError::BadRequest)?;
    }

    let found = require_subject(&state.db, body.subject_id).await?;

    let active = listing::ActiveModel {
        owner_id: Set(current.id),
        subject_id: Set(Some(found.id)),
        title: Set(body.title),
        description: Set(body.description),
        level: Set(body.level),
        city: Set(body.city),
        is_online: Set(body.is_online),
        is_offline: Set(body.is_offline),
        hourly_rate: Set(body.hourly_rate),
        is_published: Set(body.is_published),
        photo_url: Set(body.photo_url),
        created_at: Set(Utc::now().fixed_offset()),
        ..Default::default()
    };
    let created = active
        .insert(&state.db)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;

    let card = serialize_listing(&state.db, &created).await?;
    Ok((StatusCode::CREATED, Json(card)).into_response())
}

/// `GET /api/v1/listings/me`
async fn my_listings(
    State(state): State<AppState>,
    AuthUser(current): AuthUser,
) -> Result<Json<Vec<Card>>, AppError> {
    let listings = listing::Entity::find()
        .filter(listing::Column::OwnerId.eq(current.id))
        .order_by_desc(listing::Column::CreatedAt)
        .all(&state.db)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;

    let mut out = Vec::with_capacity(listings.len());
    for entity in &listings {
        out.push(serialize_listing(&state.db, entity).await?);
    }
    Ok(Json(out))
}

/// `GET /api/v1/listings/{id}`
///
/// Tutors may only fetch their own listings; students may view any.
async fn get_listing(
    State(state): State<AppState>,
    AuthUser(current): AuthUser,
    Path(id): Path<i32>,
) -> Result<Json<Card>, AppError> {
    let entity = find_listing(&state.db, id).await?;

    if entity.owner_id != current.id && current.role == role::TUTOR {
        return Err(AppError::Forbidden("Forbidden.".to_string()));
    }

    let card = serialize_listing(&state.db, &entity).await?;
    Ok(Json(card))
}

/// `PATCH /api/v1/listings/{id}`
async fn update_listing(
    State(state): State<AppState>,
    AuthUser(current): AuthUser,
    Path(id): Path<i32>,
    Json(body): Json<UpdateListingRequest>,
) -> Result<Json<Card>, AppError> {
    let entity = find_listing(&state.db, id).await?;
    if entity.owner_id != current.id {
        return Err(AppError::Forbidden("Forbidden.".to_string()));
    }

    if let Some(subject_id) = body.subject_id {
        require_subject(&state.db, subject_id).await?;
    }
    if let Some(url) = &body.photo_url {
        validate_photo_url(url).map_err(AppError::BadRequest)?;
    }

    let mut active: listing::ActiveModel = entity.into();
    if let Some(subject_id) = body.subject_id {
        active.subject_id = Set(Some(subject_id));
    }
    if let Some(title) = body.title {
        active.title = Set(title);
    }
    if let Some(description) = body.description {
        active.description = Set(description);
    }
    if let Some(city) = body.city {
        active.city = Set(Some(city));
    }
    if let Some(is_online) = body.is_online {
        active.is_online = Set(is_online);
    }
    if let Some(is_offline) = body.is_offline {
        active.is_offline = Set(is_offline);
    }
    if let Some(hourly_rate) = body.hourly_rate {
        active.hourly_rate = Set(Some(hourly_rate));
    }
    if let Some(level) = body.level {
        active.level = Set(Some(level));
    }
    if let Some(is_published) = body.is_published {
        active.is_published = Set(is_published);
    }
    if let Some(photo_url) = body.photo_url {
        active.photo_url = Set(Some(photo_url));
    }

    let updated = active
        .update(&state.db)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;

    let card = serialize_listing(&state.db, &updated).await?;
    Ok(Json(card))
}

/// `DELETE /api/v1/listings/{id}`
async fn delete_listing(
    State(state): State<AppState>,
    AuthUser(current): AuthUser,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    let entity = find_listing(&state.db, id).await?;
    if entity.owner_id != current.id {
        return Err(AppError::Forbidden("Forbidden.".to_string()));
    }

    entity
        .delete(&state.db)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;

    Ok(StatusCode::NO_CONTENT)
}
