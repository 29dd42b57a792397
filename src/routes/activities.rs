use axum::extract::{Path, State};
use axum::routing::{get, put};
use axum::{Json, Router};
use serde::Deserialize;

use crate::error::AppError;
use crate::state::AppState;
use crate::types::activity::Activity;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/activities/:id", get(get_activity))
        .route("/api/activities/:id/offset", put(set_offset))
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct OffsetRequest {
    offset: f64,
}

async fn get_activity(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Activity>, AppError> {
    state.get(&id).map(Json).ok_or(AppError::NotFound(id))
}

async fn set_offset(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<OffsetRequest>,
) -> Result<Json<Activity>, AppError> {
    if !request.offset.is_finite() {
        return Err(AppError::BadRequest("offset must be a finite number".to_string()));
    }

    state
        .update(&id, |activity| activity.set_offset(request.offset))
        .map(Json)
        .ok_or(AppError::NotFound(id))
}
