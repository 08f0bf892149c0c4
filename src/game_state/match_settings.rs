//! Match configuration.
//!
//! `MatchSettings` carries per-colour cooldowns, the tick period, the
//! initial layout and the optional AI opponent. It is plain data with serde
//! support so a front-end can load it from a JSON file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::RacingChessError;
use crate::game_state::chess_rules::{DEFAULT_COOLDOWN_TICKS, DEFAULT_TICK_PERIOD_MS};
use crate::game_state::chess_types::{AiDifficulty, Color, Ticks};

/// Initial placement of a match.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutChoice {
    #[default]
    Standard,
    Descriptor(String),
}

impl LayoutChoice {
    /// `""` and `"standard"` select the standard layout, anything else is a
    /// placement descriptor.
    pub fn from_text(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("standard") {
            LayoutChoice::Standard
        } else {
            LayoutChoice::Descriptor(trimmed.to_owned())
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiSettings {
    pub difficulty: AiDifficulty,
    #[serde(default = "default_ai_color")]
    pub color: Color,
}

fn default_ai_color() -> Color {
    Color::Black
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchSettings {
    pub white_cooldown_ticks: Ticks,
    pub black_cooldown_ticks: Ticks,
    pub tick_period_ms: u64,
    pub layout: LayoutChoice,
    pub ai: Option<AiSettings>,
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self {
            white_cooldown_ticks: DEFAULT_COOLDOWN_TICKS,
            black_cooldown_ticks: DEFAULT_COOLDOWN_TICKS,
            tick_period_ms: DEFAULT_TICK_PERIOD_MS,
            layout: LayoutChoice::Standard,
            ai: None,
        }
    }
}

impl MatchSettings {
    #[inline]
    pub fn cooldown_for(&self, color: Color) -> Ticks {
        match color {
            Color::White => self.white_cooldown_ticks,
            Color::Black => self.black_cooldown_ticks,
        }
    }

    /// Whole ticks covering `seconds` at the given period, rounded down.
    pub fn cooldown_ticks_from_seconds(seconds: f64, tick_period_ms: u64) -> Ticks {
        if !seconds.is_finite() || seconds <= 0.0 || tick_period_ms == 0 {
            return 0;
        }
        let ticks = (seconds * 1000.0 / tick_period_ms as f64).floor();
        ticks.min(f64::from(Ticks::MAX)) as Ticks
    }

    pub fn from_json_str(json: &str) -> Result<Self, RacingChessError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, RacingChessError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}
