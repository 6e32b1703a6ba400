use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Normal,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard];

    pub const fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "easy" => Some(Difficulty::Easy),
            "normal" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    WordFlash,
    Survival,
    OddOneOut,
    LetterBuilder,
}

impl Mode {
    /// Canonical reporting order.
    pub const ALL: [Mode; 4] = [
        Mode::WordFlash,
        Mode::Survival,
        Mode::OddOneOut,
        Mode::LetterBuilder,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Mode::WordFlash => "word_flash",
            Mode::Survival => "survival",
            Mode::OddOneOut => "odd_one_out",
            Mode::LetterBuilder => "letter_builder",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "word_flash" => Some(Mode::WordFlash),
            "survival" => Some(Mode::Survival),
            "odd_one_out" => Some(Mode::OddOneOut),
            "letter_builder" => Some(Mode::LetterBuilder),
            _ => None,
        }
    }

    /// Position in the canonical order; `None` for names outside it.
    pub fn rank(name: &str) -> Option<usize> {
        Self::parse(name).map(|mode| mode as usize)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-tier tuning. `step_ms` is carried for clients but the exposure rule
/// uses fixed deltas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DifficultyPreset {
    pub exposure_ms: i64,
    pub min_ms: i64,
    pub max_ms: i64,
    pub items: usize,
    pub options: usize,
    pub step_ms: i64,
    pub survival_lives: i64,
}

impl DifficultyPreset {
    pub fn clamp_exposure(&self, exposure_ms: i64) -> i64 {
        exposure_ms.clamp(self.min_ms, self.max_ms)
    }
}

const EASY: DifficultyPreset = DifficultyPreset {
    exposure_ms: 1500,
    min_ms: 1100,
    max_ms: 2000,
    items: 6,
    options: 3,
    step_ms: 120,
    survival_lives: 4,
};

const NORMAL: DifficultyPreset = DifficultyPreset {
    exposure_ms: 1200,
    min_ms: 800,
    max_ms: 1800,
    items: 7,
    options: 4,
    step_ms: 150,
    survival_lives: 3,
};

const HARD: DifficultyPreset = DifficultyPreset {
    exposure_ms: 900,
    min_ms: 500,
    max_ms: 1400,
    items: 9,
    options: 5,
    step_ms: 150,
    survival_lives: 2,
};

pub fn preset_for(difficulty: Difficulty) -> &'static DifficultyPreset {
    match difficulty {
        Difficulty::Easy => &EASY,
        Difficulty::Normal => &NORMAL,
        Difficulty::Hard => &HARD,
    }
}

/// Lives for a stored tier name; unknown names get the `normal` count.
pub fn survival_lives(difficulty: &str) -> i64 {
    Difficulty::parse(difficulty)
        .map(|d| preset_for(d).survival_lives)
        .unwrap_or(NORMAL.survival_lives)
}
