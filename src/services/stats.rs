use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::db::operations::{self, AttemptRecord, Child, SessionRecord};
use crate::db::Database;
use crate::services::presets::Mode;
use crate::services::ServiceError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModeStats {
    pub mode: String,
    pub sessions: usize,
    pub attempts: usize,
    pub avg_accuracy: f64,
    pub avg_reaction_ms: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsRollup {
    pub total_sessions: usize,
    pub total_attempts: usize,
    pub avg_accuracy: f64,
    pub avg_reaction_ms: f64,
    pub modes: Vec<ModeStats>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChildSummary {
    pub child_id: i64,
    pub total_sessions: usize,
    pub avg_accuracy: f64,
    pub avg_reaction_ms: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChildModeStats {
    pub child_id: i64,
    pub child_name: String,
    pub total_sessions: usize,
    pub avg_accuracy: f64,
    pub avg_reaction_ms: f64,
    pub modes: Vec<ModeStats>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllChildrenStats {
    pub total_children: usize,
    pub children: Vec<ChildModeStats>,
}

#[derive(Default)]
struct Tally {
    sessions: usize,
    attempts: usize,
    correct: usize,
    reaction_sum: i128,
}

impl Tally {
    fn add_attempt(&mut self, attempt: &AttemptRecord) {
        self.attempts += 1;
        self.correct += usize::from(attempt.correct);
        self.reaction_sum += i128::from(attempt.reaction_ms);
    }

    fn accuracy(&self) -> f64 {
        if self.attempts == 0 {
            0.0
        } else {
            self.correct as f64 / self.attempts as f64
        }
    }

    fn avg_reaction_ms(&self) -> f64 {
        if self.attempts == 0 {
            0.0
        } else {
            self.reaction_sum as f64 / self.attempts as f64
        }
    }
}

/// Rolls finished sessions and their attempts into pooled statistics.
///
/// Means are weighted by attempt count, both per mode and globally. Active
/// sessions and attempts whose session is not in `sessions` are ignored.
pub fn aggregate(sessions: &[SessionRecord], attempts: &[AttemptRecord]) -> StatsRollup {
    let finished: HashMap<i64, &str> = sessions
        .iter()
        .filter(|s| s.is_finished())
        .map(|s| (s.id, s.mode.as_str()))
        .collect();

    let mut total = Tally::default();
    let mut per_mode: BTreeMap<&str, Tally> = BTreeMap::new();

    for &mode in finished.values() {
        total.sessions += 1;
        per_mode.entry(mode).or_default().sessions += 1;
    }

    for attempt in attempts {
        let Some(&mode) = finished.get(&attempt.session_id) else {
            continue;
        };
        total.add_attempt(attempt);
        per_mode.entry(mode).or_default().add_attempt(attempt);
    }

    let mut modes: Vec<ModeStats> = per_mode
        .into_iter()
        .map(|(mode, tally)| ModeStats {
            mode: mode.to_string(),
            sessions: tally.sessions,
            attempts: tally.attempts,
            avg_accuracy: tally.accuracy(),
            avg_reaction_ms: tally.avg_reaction_ms(),
        })
        .collect();
    // BTreeMap already orders unknown modes by name; the stable sort keeps that.
    modes.sort_by_key(|m| Mode::rank(&m.mode).unwrap_or(usize::MAX));

    StatsRollup {
        total_sessions: total.sessions,
        total_attempts: total.attempts,
        avg_accuracy: total.accuracy(),
        avg_reaction_ms: total.avg_reaction_ms(),
        modes,
    }
}

/// Both reads share one transaction so they see the same snapshot.
async fn rollup_for(db: &Database, child_id: i64) -> Result<StatsRollup, ServiceError> {
    let mut tx = db.pool().begin().await?;
    let sessions = operations::list_finished_sessions_for_child(&mut *tx, child_id).await?;
    let attempts = operations::list_finished_attempts_for_child(&mut *tx, child_id).await?;
    tx.commit().await?;
    Ok(aggregate(&sessions, &attempts))
}

fn mode_stats(child: Child, rollup: StatsRollup) -> ChildModeStats {
    ChildModeStats {
        child_id: child.id,
        child_name: child.name,
        total_sessions: rollup.total_sessions,
        avg_accuracy: rollup.avg_accuracy,
        avg_reaction_ms: rollup.avg_reaction_ms,
        modes: rollup.modes,
    }
}

pub async fn child_summary(db: &Database, child_id: i64) -> Result<ChildSummary, ServiceError> {
    let child = crate::services::children::require_child(db, child_id).await?;
    let rollup = rollup_for(db, child.id).await?;

    Ok(ChildSummary {
        child_id: child.id,
        total_sessions: rollup.total_sessions,
        avg_accuracy: rollup.avg_accuracy,
        avg_reaction_ms: rollup.avg_reaction_ms,
    })
}

pub async fn child_mode_stats(db: &Database, child_id: i64) -> Result<ChildModeStats, ServiceError> {
    let child = crate::services::children::require_child(db, child_id).await?;
    let rollup = rollup_for(db, child.id).await?;
    Ok(mode_stats(child, rollup))
}

pub async fn all_children_stats(db: &Database) -> Result<AllChildrenStats, ServiceError> {
    let children = operations::list_children_asc(db.pool()).await?;

    let mut out = Vec::with_capacity(children.len());
    for child in children {
        let rollup = rollup_for(db, child.id).await?;
        out.push(mode_stats(child, rollup));
    }

    Ok(AllChildrenStats {
        total_children: out.len(),
        children: out,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(id: i64, mode: &str, finished: bool) -> SessionRecord {
        SessionRecord {
            id,
            child_id: 1,
            mode: mode.to_string(),
            difficulty: "normal".to_string(),
            theme_id: 1,
            started_at: "2026-01-01T10:00:00.000Z".to_string(),
            finished_at: finished.then(|| "2026-01-01T10:05:00.000Z".to_string()),
            exposure_ms: 1200,
            items_total: 7,
        }
    }

    fn attempt(session_id: i64, correct: bool, reaction_ms: i64) -> AttemptRecord {
        AttemptRecord {
            id: 0,
            session_id,
            item_id: "x".to_string(),
            correct,
            reaction_ms,
            shown_ms: 1200,
        }
    }

    #[test]
    fn empty_history_yields_zeroes() {
        let rollup = aggregate(&[], &[]);
        assert_eq!(rollup.total_sessions, 0);
        assert_eq!(rollup.avg_accuracy, 0.0);
        assert_eq!(rollup.avg_reaction_ms, 0.0);
        assert!(rollup.modes.is_empty());
    }

    #[test]
    fn finished_session_without_attempts_counts_with_zero_means() {
        let rollup = aggregate(&[session(1, "word_flash", true)], &[]);
        assert_eq!(rollup.total_sessions, 1);
        assert_eq!(rollup.modes[0].attempts, 0);
        assert_eq!(rollup.modes[0].avg_accuracy, 0.0);
    }

    #[test]
    fn global_means_are_weighted_by_attempts() {
        // session 1: 1/1 correct; session 2: 1/3 correct
        let sessions = [session(1, "word_flash", true), session(2, "word_flash", true)];
        let attempts = [
            attempt(1, true, 400),
            attempt(2, true, 600),
            attempt(2, false, 800),
            attempt(2, false, 1000),
        ];
        let rollup = aggregate(&sessions, &attempts);
        assert!((rollup.avg_accuracy - 0.5).abs() < 1e-9);
        assert!((rollup.avg_reaction_ms - 700.0).abs() < 1e-9);
        assert_eq!(rollup.total_attempts, 4);
    }

    #[test]
    fn huge_reaction_times_do_not_overflow() {
        let sessions = [session(1, "word_flash", true)];
        let attempts = [attempt(1, true, i64::MAX), attempt(1, false, i64::MAX)];
        let rollup = aggregate(&sessions, &attempts);
        assert_eq!(rollup.avg_reaction_ms, i64::MAX as f64);
        assert_eq!(rollup.modes[0].avg_reaction_ms, i64::MAX as f64);
        assert_eq!(rollup.avg_accuracy, 0.5);
    }

    #[test]
    fn active_sessions_are_excluded() {
        let sessions = [session(1, "survival", true), session(2, "survival", false)];
        let attempts = [attempt(1, true, 500), attempt(2, false, 5000)];
        let rollup = aggregate(&sessions, &attempts);
        assert_eq!(rollup.total_sessions, 1);
        assert_eq!(rollup.avg_accuracy, 1.0);
        assert_eq!(rollup.avg_reaction_ms, 500.0);
    }

    #[test]
    fn modes_follow_canonical_order_with_unknown_last() {
        let sessions = [
            session(1, "zigzag", true),
            session(2, "letter_builder", true),
            session(3, "odd_one_out", true),
            session(4, "alpha_mode", true),
            session(5, "word_flash", true),
            session(6, "survival", true),
        ];
        let rollup = aggregate(&sessions, &[]);
        let order: Vec<&str> = rollup.modes.iter().map(|m| m.mode.as_str()).collect();
        assert_eq!(
            order,
            vec!["word_flash", "survival", "odd_one_out", "letter_builder", "alpha_mode", "zigzag"]
        );
    }

    #[test]
    fn per_mode_counts_sessions_and_attempts() {
        let sessions = [
            session(1, "word_flash", true),
            session(2, "odd_one_out", true),
            session(3, "word_flash", true),
        ];
        let attempts = [
            attempt(1, true, 300),
            attempt(2, false, 900),
            attempt(3, true, 500),
            attempt(3, false, 700),
        ];
        let rollup = aggregate(&sessions, &attempts);
        let wf = &rollup.modes[0];
        assert_eq!((wf.mode.as_str(), wf.sessions, wf.attempts), ("word_flash", 2, 3));
        assert!((wf.avg_accuracy - 2.0 / 3.0).abs() < 1e-9);
        assert!((wf.avg_reaction_ms - 500.0).abs() < 1e-9);
        let ooo = &rollup.modes[1];
        assert_eq!((ooo.mode.as_str(), ooo.sessions, ooo.attempts), ("odd_one_out", 1, 1));
        assert_eq!(ooo.avg_accuracy, 0.0);
    }
}
