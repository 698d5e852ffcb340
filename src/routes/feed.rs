use std::collections::{HashMap, HashSet};

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect};
use serde::Deserialize;

use crate::auth::middleware::AuthUser;
use crate::cards::{self, Card};
use crate::entities::{listing, preference, role, subject, user, user_subject};
use crate::error::AppError;
use crate::state::AppState;

/// Feed page size bounds; out-of-range limits are clamped, not rejected.
const MIN_LIMIT: u64 = 1;
const MAX_LIMIT: u64 = 100;
const DEFAULT_LIMIT: u64 = 20;

/// Student-profile candidates are over-fetched because synthetic cards are
/// filtered by the exclusion set only after materialization; without the
/// slack a page could come back short while candidates remain.
const OVER_FETCH_FACTOR: u64 = 3;

pub fn router() -> Router<AppState> {
    Router::new().route("/feed", get(feed))
}

#[derive(Deserialize)]
pub struct FeedQuery {
    /// Comma-separated card ids already seen (mixed sign: listing ids are
    /// positive, synthetic student-profile ids negative).
    pub exclude_ids: Option<String>,
    pub limit: Option<u64>,
}

/// Parse the `exclude_ids` CSV, ignoring non-numeric fragments.
fn parse_exclude_ids(raw: Option<&str>) -> HashSet<i32> {
    raw.map(|s| {
        s.split(',')
            .filter_map(|part| part.trim().parse::<i32>().ok())
            .collect()
    })
    .unwrap_or_default()
}

/// `GET /api/v1/feed?exclude_ids=1,2,-3&limit=20`
///
/// Strict two-sided market: students see tutor listing cards, tutors see
/// synthetic student profile cards; never same-role, never self. Fewer than
/// `limit` results is not an error.
async fn feed(
    State(state): State<AppState>,
    AuthUser(viewer): AuthUser,
    Query(query): Query<FeedQuery>,
) -> Result<Json<Vec<Card>>, AppError> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(MIN_LIMIT, MAX_LIMIT);
    let excluded = parse_exclude_ids(query.exclude_ids.as_deref());

    let cards = if viewer.role == role::STUDENT {
        listing_feed(&state, &viewer, &excluded, limit).await?
    } else {
        profile_feed(&state, &viewer, &excluded, limit).await?
    };

    Ok(Json(cards))
}

/// Tutor-listing branch: published listings by other tutors, collapsed to
/// one (the most recent) per owner before exclusion filtering and limiting.
async fn listing_feed(
    state: &AppState,
    viewer: &user::Model,
    excluded: &HashSet<i32>,
    limit: u64,
) -> Result<Vec<Card>, AppError> {
    let candidates = listing::Entity::find()
        .inner_join(user::Entity)
        .filter(user::Column::Role.eq(role::TUTOR))
        .filter(listing::Column::IsPublished.eq(true))
        .filter(listing::Column::OwnerId.ne(viewer.id))
        .order_by_desc(listing::Column::CreatedAt)
        .order_by_desc(listing::Column::Id)
        .all(&state.db)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;

    // One listing per owner: the scan is newest-first, so the first listing
    // seen for an owner is the one that survives.
    let mut seen_owners: HashSet<i32> = HashSet::new();
    let mut page: Vec<listing::Model> = Vec::new();
    for entity in candidates {
        if !seen_owners.insert(entity.owner_id) {
            continue;
        }
        if excluded.contains(&entity.id) {
            continue;
        }
        page.push(entity);
        if page.len() as u64 == limit {
            break;
        }
    }

    // Batched lookups instead of per-row lazy loads
    let owner_ids: Vec<i32> = page.iter().map(|l| l.owner_id).collect();
    let subject_ids: Vec<i32> = page.iter().filter_map(|l| l.subject_id).collect();

    let owners: HashMap<i32, user::Model> = user::Entity::find()
        .filter(user::Column::Id.is_in(owner_ids))
        .all(&state.db)
        .await
        .map_err(|e| AppError::Internal(e.into()))?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();

    let subjects: HashMap<i32, String> = subject::Entity::find()
        .filter(subject::Column::Id.is_in(subject_ids))
        .all(&state.db)
        .await
        .map_err(|e| AppError::Internal(e.into()))?
        .into_iter()
        .map(|s| (s.id, s.name))
        .collect();

    let mut out = Vec::with_capacity(page.len());
    for entity in &page {
        let Some(owner) = owners.get(&entity.owner_id) else {
            continue;
        };
        let subject_name = entity.subject_id.and_then(|id| subjects.get(&id));
        out.push(cards::listing_card(
            entity,
            owner,
            subject_name.map(String::as_str),
        ));
    }
    Ok(out)
}

/// Student-profile branch: onboarded students materialized into synthetic
/// cards, exclusion-filtered by negative id after materialization.
async fn profile_feed(
    state: &AppState,
    viewer: &user::Model,
    excluded: &HashSet<i32>,
    limit: u64,
) -> Result<Vec<Card>, AppError> {
    let students = user::Entity::find()
        .filter(user::Column::Role.eq(role::STUDENT))
        .filter(user::Column::OnboardingDone.eq(true))
        .filter(user::Column::Id.ne(viewer.id))
        .order_by_desc(user::Column::CreatedAt)
        .order_by_desc(user::Column::Id)
        .limit(limit * OVER_FETCH_FACTOR)
        .all(&state.db)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;

    let student_ids: Vec<i32> = students.iter().map(|u| u.id).collect();

    let prefs: HashMap<i32, preference::Model> = preference::Entity::find()
        .filter(preference::Column::UserId.is_in(student_ids.clone()))
        .all(&state.db)
        .await
        .map_err(|e| AppError::Internal(e.into()))?
        .into_iter()
        .map(|p| (p.user_id, p))
        .collect();

    let links = user_subject::Entity::find()
        .filter(user_subject::Column::UserId.is_in(student_ids))
        .order_by_asc(user_subject::Column::SubjectId)
        .all(&state.db)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;

    let subject_names: HashMap<i32, String> = subject::Entity::find()
        .filter(subject::Column::Id.is_in(links.iter().map(|l| l.subject_id).collect::<Vec<_>>()))
        .all(&state.db)
        .await
        .map_err(|e| AppError::Internal(e.into()))?
        .into_iter()
        .map(|s| (s.id, s.name))
        .collect();

    let mut subjects_by_user: HashMap<i32, Vec<String>> = HashMap::new();
    for link in &links {
        if let Some(name) = subject_names.get(&link.subject_id) {
            subjects_by_user
                .entry(link.user_id)
                .or_default()
                .push(name.clone());
        }
    }

    let empty: Vec<String> = Vec::new();
    let mut out = Vec::new();
    for student in &students {
        let card = cards::profile_card(
            student,
            prefs.get(&student.id),
            subjects_by_user.get(&student.id).unwrap_or(&empty),
        );
        if excluded.contains(&card.id) {
            continue;
        }
        out.push(card);
        if out.len() as u64 == limit {
            break;
        }
    }
    Ok(out)
}
