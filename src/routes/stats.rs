use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::response::AppError;
use crate::services::stats;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/children", get(all_children))
}

async fn all_children(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(stats::all_children_stats(state.db()).await?))
}
