//! Session lifecycle: `active` until `finished_at` is set, then read-only.

use serde::Serialize;

use crate::config::GameConfig;
use crate::db::operations::{self, AttemptRecord, NewAttempt, NewSession, SessionRecord};
use crate::db::Database;
use crate::services::exposure::{next_exposure, seed_exposure, Performance};
use crate::services::items::{self, QuizItem};
use crate::services::presets::{preset_for, survival_lives, Difficulty, Mode};
use crate::services::themes::DEFAULT_THEME_ID;
use crate::services::ServiceError;

#[derive(Debug, Clone)]
pub struct StartSessionInput<'a> {
    pub child_id: i64,
    pub mode: &'a str,
    pub difficulty: &'a str,
    pub theme_id: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct StartedSession {
    pub session: SessionRecord,
    pub mode: Mode,
    pub difficulty: Difficulty,
    pub items: Vec<QuizItem>,
    pub lives_start: Option<i64>,
    pub lives_left: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct AttemptInput<'a> {
    pub item_id: &'a str,
    pub correct: bool,
    pub reaction_ms: i64,
    pub shown_ms: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurvivalStatus {
    pub lives_left: i64,
    pub finished: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptOutcome {
    pub attempt_id: i64,
    pub survival: Option<SurvivalStatus>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FinishedSession {
    pub session_id: i64,
    pub accuracy: f64,
    pub avg_reaction_ms: f64,
    pub next_exposure_ms: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionDetail {
    #[serde(flatten)]
    pub session: SessionRecord,
    pub status: &'static str,
    pub lives_start: Option<i64>,
    pub lives_left: Option<i64>,
    pub attempts: Vec<AttemptRecord>,
}

pub async fn start_session(
    db: &Database,
    game: &GameConfig,
    input: StartSessionInput<'_>,
) -> Result<StartedSession, ServiceError> {
    let mode = Mode::parse(input.mode).ok_or_else(|| ServiceError::InvalidMode(input.mode.to_string()))?;
    let difficulty = Difficulty::parse(input.difficulty)
        .ok_or_else(|| ServiceError::InvalidDifficulty(input.difficulty.to_string()))?;
    let theme_id = match input.theme_id {
        Some(id) if id != 0 => id,
        _ => DEFAULT_THEME_ID,
    };
    let preset = preset_for(difficulty);

    let mut tx = db.begin_write().await?;
    let child = operations::get_child(tx.conn(), input.child_id)
        .await?
        .ok_or(ServiceError::ChildNotFound(input.child_id))?;

    let last_exposure =
        operations::last_finished_exposure(tx.conn(), child.id, mode.as_str(), difficulty.as_str()).await?;
    let exposure_ms = seed_exposure(preset, last_exposure);

    let session = operations::insert_session(
        tx.conn(),
        &NewSession {
            child_id: child.id,
            mode: mode.as_str(),
            difficulty: difficulty.as_str(),
            theme_id,
            exposure_ms,
            items_total: preset.items as i64,
        },
    )
    .await?;
    tx.commit().await?;

    let mut rng = game.session_rng(session.id);
    let items = items::generate(&mut rng, mode, preset.items, difficulty, theme_id);

    let lives = (mode == Mode::Survival).then_some(preset.survival_lives);

    tracing::info!(
        session_id = session.id,
        child_id = child.id,
        %mode,
        %difficulty,
        theme_id,
        exposure_ms,
        seeded_from_history = last_exposure.is_some(),
        "session started"
    );

    Ok(StartedSession {
        session,
        mode,
        difficulty,
        items,
        lives_start: lives,
        lives_left: lives,
    })
}

/// Records one answer. Survival sessions recount lives inside the same
/// transaction and finish themselves at zero.
pub async fn submit_attempt(
    db: &Database,
    game: &GameConfig,
    session_id: i64,
    input: AttemptInput<'_>,
) -> Result<AttemptOutcome, ServiceError> {
    let mut tx = db.begin_write().await?;
    let session = operations::get_session(tx.conn(), session_id)
        .await?
        .ok_or(ServiceError::SessionNotFound(session_id))?;

    if session.is_finished() {
        return Err(ServiceError::SessionClosed(session_id));
    }

    let attempt_id = operations::insert_attempt(
        tx.conn(),
        &NewAttempt {
            session_id,
            item_id: input.item_id,
            correct: input.correct,
            reaction_ms: input.reaction_ms.max(0),
            shown_ms: input.shown_ms.max(0),
        },
    )
    .await?;

    if Mode::parse(&session.mode) != Some(Mode::Survival) {
        tx.commit().await?;
        return Ok(AttemptOutcome {
            attempt_id,
            survival: None,
        });
    }

    let lives_start = survival_lives(&session.difficulty);
    let wrong = operations::count_wrong_attempts(tx.conn(), session_id).await?;
    let lives_left = (lives_start - wrong).max(0);
    let finished = lives_left == 0;

    if finished {
        let exposure = if game.survival_knockout_adapts {
            let attempts = operations::list_session_attempts(tx.conn(), session_id).await?;
            Some(next_exposure(session.exposure_ms, &Performance::from_attempts(&attempts)))
        } else {
            None
        };
        operations::mark_session_finished(tx.conn(), session_id, exposure).await?;
        tracing::info!(session_id, wrong, adapted = exposure.is_some(), "survival session knocked out");
    }
    tx.commit().await?;

    Ok(AttemptOutcome {
        attempt_id,
        survival: Some(SurvivalStatus { lives_left, finished }),
    })
}

/// First call closes the session and stores the recomputed exposure; later
/// calls report the stored value without recomputing.
pub async fn finish_session(db: &Database, session_id: i64) -> Result<FinishedSession, ServiceError> {
    let mut tx = db.begin_write().await?;
    let session = operations::get_session(tx.conn(), session_id)
        .await?
        .ok_or(ServiceError::SessionNotFound(session_id))?;

    let attempts = operations::list_session_attempts(tx.conn(), session_id).await?;
    let performance = Performance::from_attempts(&attempts);

    let next_exposure_ms = if session.is_finished() {
        session.exposure_ms
    } else {
        let next = next_exposure(session.exposure_ms, &performance);
        operations::mark_session_finished(tx.conn(), session_id, Some(next)).await?;
        tracing::info!(
            session_id,
            accuracy = performance.accuracy,
            avg_reaction_ms = performance.avg_reaction_ms,
            previous_exposure_ms = session.exposure_ms,
            next_exposure_ms = next,
            "session finished"
        );
        next
    };
    tx.commit().await?;

    Ok(FinishedSession {
        session_id,
        accuracy: performance.accuracy,
        avg_reaction_ms: performance.avg_reaction_ms,
        next_exposure_ms,
    })
}

pub async fn get_session_detail(db: &Database, session_id: i64) -> Result<SessionDetail, ServiceError> {
    let session = operations::get_session(db.pool(), session_id)
        .await?
        .ok_or(ServiceError::SessionNotFound(session_id))?;
    let attempts = operations::list_session_attempts(db.pool(), session_id).await?;

    let (lives_start, lives_left) = if Mode::parse(&session.mode) == Some(Mode::Survival) {
        let start = survival_lives(&session.difficulty);
        let wrong = attempts.iter().filter(|a| !a.correct).count() as i64;
        (Some(start), Some((start - wrong).max(0)))
    } else {
        (None, None)
    };

    Ok(SessionDetail {
        status: if session.is_finished() { "finished" } else { "active" },
        session,
        lives_start,
        lives_left,
        attempts,
    })
}
