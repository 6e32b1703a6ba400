use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use crate::response::AppError;
use crate::services::{children, stats};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct CreateChildRequest {
    name: String,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_children).post(create_child))
        .route("/:child_id", axum::routing::delete(delete_child))
        .route("/:child_id/summary", get(child_summary))
        .route("/:child_id/stats", get(child_stats))
}

async fn create_child(
    State(state): State<AppState>,
    Json(payload): Json<CreateChildRequest>,
) -> Result<impl IntoResponse, AppError> {
    let child = children::create_child(state.db(), &payload.name).await?;
    Ok((StatusCode::CREATED, Json(child)))
}

async fn list_children(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(children::list_children(state.db()).await?))
}

async fn delete_child(
    State(state): State<AppState>,
    Path(child_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    children::delete_child(state.db(), child_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn child_summary(
    State(state): State<AppState>,
    Path(child_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(stats::child_summary(state.db(), child_id).await?))
}

async fn child_stats(
    State(state): State<AppState>,
    Path(child_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(stats::child_mode_stats(state.db(), child_id).await?))
}
