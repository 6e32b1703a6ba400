mod children;
mod health;
mod sessions;
mod stats;
mod themes;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Router;

use crate::response::json_error;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .nest("/api/themes", themes::router())
        .nest("/api/children", children::router())
        .nest("/api/sessions", sessions::router())
        .nest("/api/stats", stats::router())
        .nest("/health", health::router())
        .fallback(fallback_handler)
        .with_state(state)
}

async fn fallback_handler() -> Response {
    json_error(StatusCode::NOT_FOUND, "NOT_FOUND", "route not found").into_response()
}
