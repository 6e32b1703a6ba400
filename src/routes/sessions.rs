use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::response::AppError;
use crate::services::items::QuizItem;
use crate::services::presets::{Difficulty, Mode};
use crate::services::sessions::{self, AttemptInput, StartSessionInput, StartedSession};
use crate::services::themes::DEFAULT_THEME_ID;
use crate::state::AppState;

fn default_mode() -> String {
    Mode::WordFlash.as_str().to_string()
}

fn default_difficulty() -> String {
    Difficulty::Normal.as_str().to_string()
}

fn default_theme_id() -> Option<i64> {
    Some(DEFAULT_THEME_ID)
}

#[derive(Debug, Deserialize)]
struct StartSessionRequest {
    child_id: i64,
    #[serde(default = "default_mode")]
    mode: String,
    #[serde(default = "default_difficulty")]
    difficulty: String,
    #[serde(default = "default_theme_id")]
    theme_id: Option<i64>,
}

#[derive(Debug, Serialize)]
struct ItemPayload {
    item_id: String,
    exposure_ms: i64,
    target: String,
    options: Vec<String>,
    prompt: Option<String>,
    correct: Option<String>,
}

impl ItemPayload {
    fn new(item: QuizItem, exposure_ms: i64) -> Self {
        Self {
            item_id: item.item_id,
            exposure_ms,
            target: item.target,
            options: item.options,
            prompt: item.prompt,
            correct: item.correct,
        }
    }
}

#[derive(Debug, Serialize)]
struct StartSessionResponse {
    session_id: i64,
    mode: Mode,
    exposure_ms: i64,
    items_total: i64,
    items: Vec<ItemPayload>,
    difficulty: Difficulty,
    theme_id: i64,
    lives_start: Option<i64>,
    lives_left: Option<i64>,
}

impl From<StartedSession> for StartSessionResponse {
    fn from(started: StartedSession) -> Self {
        let exposure_ms = started.session.exposure_ms;
        Self {
            session_id: started.session.id,
            mode: started.mode,
            exposure_ms,
            items_total: started.session.items_total,
            items: started
                .items
                .into_iter()
                .map(|item| ItemPayload::new(item, exposure_ms))
                .collect(),
            difficulty: started.difficulty,
            theme_id: started.session.theme_id,
            lives_start: started.lives_start,
            lives_left: started.lives_left,
        }
    }
}

#[derive(Debug, Deserialize)]
struct AttemptRequest {
    item_id: String,
    correct: bool,
    reaction_ms: i64,
    shown_ms: i64,
}

#[derive(Debug, Serialize)]
struct AttemptResponse {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    mode: Option<Mode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    lives_left: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    finished: Option<bool>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/start", post(start_session))
        .route("/:session_id", get(get_session))
        .route("/:session_id/attempt", post(submit_attempt))
        .route("/:session_id/finish", post(finish_session))
}

async fn start_session(
    State(state): State<AppState>,
    Json(payload): Json<StartSessionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let started = sessions::start_session(
        state.db(),
        state.game(),
        StartSessionInput {
            child_id: payload.child_id,
            mode: &payload.mode,
            difficulty: &payload.difficulty,
            theme_id: payload.theme_id,
        },
    )
    .await?;

    Ok(Json(StartSessionResponse::from(started)))
}

async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(sessions::get_session_detail(state.db(), session_id).await?))
}

async fn submit_attempt(
    State(state): State<AppState>,
    Path(session_id): Path<i64>,
    Json(payload): Json<AttemptRequest>,
) -> Result<impl IntoResponse, AppError> {
    let outcome = sessions::submit_attempt(
        state.db(),
        state.game(),
        session_id,
        AttemptInput {
            item_id: &payload.item_id,
            correct: payload.correct,
            reaction_ms: payload.reaction_ms,
            shown_ms: payload.shown_ms,
        },
    )
    .await?;

    let response = match outcome.survival {
        Some(status) => AttemptResponse {
            ok: true,
            mode: Some(Mode::Survival),
            lives_left: Some(status.lives_left),
            finished: Some(status.finished),
        },
        None => AttemptResponse {
            ok: true,
            mode: None,
            lives_left: None,
            finished: None,
        },
    };
    Ok(Json(response))
}

async fn finish_session(
    State(state): State<AppState>,
    Path(session_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(sessions::finish_session(state.db(), session_id).await?))
}
