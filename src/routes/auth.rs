use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};

use crate::auth::middleware::AuthUser;
use crate::auth::{jwt, password};
use crate::entities::{role, user};
use crate::error::AppError;
use crate::state::AppState;

// ─────────────────────────────────────────────────────────────────────────────
// Router
// ─────────────────────────────────────────────────────────────────────────────

/// Build the auth route group: `/auth/...`
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(me))
}

// ─────────────────────────────────────────────────────────────────────────────
// DTOs
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub new_user: bool,
}

#[derive(Serialize)]
pub struct MeResponse {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: String,
    pub onboarding_done: bool,
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// `POST /api/v1/auth/register`
async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<Response, AppError> {
    let email = body.email.trim().to_lowercase();

    password::validate_email(&email).map_err(AppError::BadRequest)?;
    password::validate_password(&body.password).map_err(AppError::BadRequest)?;

    if body.role != role::STUDENT && body.role != role::TUTOR {
        return Err(AppError::BadRequest(
            "Role must be 'student' or 'tutor'.".to_string(),
        ));
    }

    let first_name = body.first_name.trim().to_string();
    let last_name = body.last_name.trim().to_string();
    if first_name.is_empty() || last_name.is_empty() {
        return Err(AppError::BadRequest(
            "First and last name are required.".to_string(),
        ));
    }

    let existing = user::Entity::find()
        .filter(user::Column::Email.eq(&email))
        .one(&state.db)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;
    if existing.is_some() {
        return Err(AppError::Conflict("Email already registered.".to_string()));
    }

    let password_hash = password::hash_password(&body.password)?;

    let new_user = user::ActiveModel {
        first_name: Set(first_name),
        last_name: Set(last_name),
        email: Set(email.clone()),
        password_hash: Set(password_hash),
        role: Set(body.role),
        onboarding_done: Set(false),
        created_at: Set(Utc::now().fixed_offset()),
        ..Default::default()
    };
    let user_model = new_user
        .insert(&state.db)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;

    tracing::info!(user_id = user_model.id, role = %user_model.role, "User registered");

    let token = jwt::generate_access_token(user_model.id, &state.config)?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            new_user: true,
        }),
    )
        .into_response())
}

/// `POST /api/v1/auth/login`
async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let email = body.email.trim().to_lowercase();

    let user_model = user::Entity::find()
        .filter(user::Column::Email.eq(&email))
        .one(&state.db)
        .await
        .map_err(|e| AppError::Internal(e.into()))?
        .ok_or_else(|| AppError::Unauthorized("Invalid email or password.".to_string()))?;

    let valid = password::verify_password(&body.password, &user_model.password_hash)?;
    if !valid {
        return Err(AppError::Unauthorized(
            "Invalid email or password.".to_string(),
        ));
    }

    let token = jwt::generate_access_token(user_model.id, &state.config)?;

    Ok(Json(AuthResponse {
        token,
        new_user: false,
    }))
}

/// `GET /api/v1/auth/me`
async fn me(AuthUser(user_model): AuthUser) -> Json<MeResponse> {
    Json(MeResponse {
        id: user_model.id,
        first_name: user_model.first_name,
        last_name: user_model.last_name,
        email: user_model.email,
        role: user_model.role,
        onboarding_done: user_model.onboarding_done,
    })
}
