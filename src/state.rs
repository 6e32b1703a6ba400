use std::sync::Arc;
use std::time::{Instant, SystemTime};

use crate::config::GameConfig;
use crate::db::Database;

#[derive(Clone)]
pub struct AppState {
    started_at: Instant,
    started_at_system: SystemTime,
    db: Database,
    game: Arc<GameConfig>,
}

impl AppState {
    pub fn new(db: Database, game: GameConfig) -> Self {
        Self {
            started_at: Instant::now(),
            started_at_system: SystemTime::now(),
            db,
            game: Arc::new(game),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    pub fn started_at_system(&self) -> SystemTime {
        self.started_at_system
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    pub fn game(&self) -> &GameConfig {
        &self.game
    }
}
