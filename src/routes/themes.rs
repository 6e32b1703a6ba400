use axum::routing::get;
use axum::{Json, Router};

use crate::services::themes::{self, ThemeSummary};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_themes))
}

async fn list_themes() -> Json<Vec<ThemeSummary>> {
    Json(themes::list_themes())
}
