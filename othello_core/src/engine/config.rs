use crate::engine::INFINITY;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

pub const MAX_SEARCH_DEPTH: u8 = 16;

/// Largest magnitude accepted for a positional weight. A full-depth line of
/// per-move bonuses plus material then stays inside `±INFINITY`.
pub const MAX_WEIGHT: i32 = INFINITY / 64;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unrecognized color `{0}` (expected `black` or `white`)")]
    UnknownColor(String),
    #[error("unrecognized evaluator `{0}` (expected `material` or `positional`)")]
    UnknownEvaluator(String),
    #[error("search depth must be between 1 and {max}, got {depth}")]
    InvalidDepth { depth: u8, max: u8 },
    #[error("positional weight `{name}` must be within ±{max}, got {value}")]
    WeightOutOfRange {
        name: &'static str,
        value: i32,
        max: i32,
    },
    #[error("invalid engine configuration: {0}")]
    Json(#[from] serde_json::Error),
    #[error("cannot read engine configuration: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvaluatorKind {
    /// Disk difference only.
    Material,
    /// Disk difference plus per-move corner/edge/mobility terms.
    Positional,
}

impl FromStr for EvaluatorKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "material" => Ok(Self::Material),
            "positional" => Ok(Self::Positional),
            _ => Err(ConfigError::UnknownEvaluator(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // Search Parameters
    pub evaluator: EvaluatorKind,
    pub move_ordering: bool,
    pub iterative_deepening: bool,
    pub pruning: bool, // false: plain minimax
    pub max_depth: u8, // plies searched below each root move
    pub time_limit_ms: Option<u64>,

    // Positional Parameters
    pub corner_bonus: i32,
    pub danger_zone_penalty: i32,
    pub border_bonus: i32,
    pub few_replies_threshold: usize,
    pub few_replies_bonus: i32,
    pub no_replies_bonus: i32,
    pub reply_corner_penalty: i32,
    pub reply_border_penalty: i32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            evaluator: EvaluatorKind::Positional,
            move_ordering: true,
            iterative_deepening: true,
            pruning: true,
            max_depth: 4,
            // Leaves headroom under a 5 s per-turn budget for process start and I/O.
            time_limit_ms: Some(4500),

            corner_bonus: 5,
            danger_zone_penalty: 2,
            border_bonus: 3,
            few_replies_threshold: 3,
            few_replies_bonus: 5,
            no_replies_bonus: 10,
            reply_corner_penalty: 2,
            reply_border_penalty: 1,
        }
    }
}

impl EngineConfig {
    pub fn load_from_json(json_str: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json_str)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::load_from_json(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 || self.max_depth > MAX_SEARCH_DEPTH {
            return Err(ConfigError::InvalidDepth {
                depth: self.max_depth,
                max: MAX_SEARCH_DEPTH,
            });
        }
        for (name, value) in self.weights() {
            if value.unsigned_abs() > MAX_WEIGHT.unsigned_abs() {
                return Err(ConfigError::WeightOutOfRange {
                    name,
                    value,
                    max: MAX_WEIGHT,
                });
            }
        }
        Ok(())
    }

    fn weights(&self) -> [(&'static str, i32); 7] {
        [
            ("corner_bonus", self.corner_bonus),
            ("danger_zone_penalty", self.danger_zone_penalty),
            ("border_bonus", self.border_bonus),
            ("few_replies_bonus", self.few_replies_bonus),
            ("no_replies_bonus", self.no_replies_bonus),
            ("reply_corner_penalty", self.reply_corner_penalty),
            ("reply_border_penalty", self.reply_border_penalty),
        ]
    }

    /// Search deadline, measured from the origin of the clock handed to the search.
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit_ms.map(Duration::from_millis)
    }
}
