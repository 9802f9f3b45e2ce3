use crate::engine::clock::Clock;
use crate::engine::config::{ConfigError, EngineConfig};
use crate::engine::eval::material;
use crate::engine::search::AlphaBetaEngine;
use crate::engine::{Position, SearchResult};
use crate::logic::board::Color;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// What one turn did to the real position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnReport {
    pub result: SearchResult,
    pub score_before: i32,
    pub score_after: i32,
    /// False for a pass, or if the chosen move was refused by the position.
    pub applied: bool,
}

/// A configured engine bound to the color it plays.
pub struct Player {
    engine: AlphaBetaEngine,
}

impl Player {
    pub fn new(color: Color, config: Arc<EngineConfig>) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            engine: AlphaBetaEngine::new(config, color),
        })
    }

    /// Builds a player from a color token such as `black` or `white`.
    pub fn from_token(token: &str, config: Arc<EngineConfig>) -> Result<Self, ConfigError> {
        let color = token
            .parse()
            .map_err(|_| ConfigError::UnknownColor(token.to_string()))?;
        Self::new(color, config)
    }

    pub const fn color(&self) -> Color {
        self.engine.color()
    }

    /// Searches `position`, plays the chosen move on it and reports the outcome.
    pub fn play<P: Position>(&self, position: &mut P, clock: &dyn Clock) -> TurnReport {
        let me = self.color();
        let result = self.engine.search(position, clock);
        let score_before = material(position, me);

        let applied = if result.best_move.is_pass() {
            false
        } else {
            let ok = position.apply_move(result.best_move, me);
            if !ok {
                log::warn!("position refused move {} for {me}", result.best_move);
            }
            ok
        };
        let score_after = material(position, me);

        log::info!(
            "{me} plays {}: score {score_before} -> {score_after}, nodes {}, pruned {}, depth {}{}, {} ms",
            result.best_move,
            result.nodes_expanded,
            result.branches_pruned,
            result.completed_depth,
            if result.timed_out { " (deadline)" } else { "" },
            result.elapsed_ms,
        );

        TurnReport {
            result,
            score_before,
            score_after,
            applied,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::clock::MonotonicClock;
    use crate::engine::Move;
    use crate::logic::board::Board;

    fn config(max_depth: u8) -> Arc<EngineConfig> {
        Arc::new(EngineConfig {
            max_depth,
            time_limit_ms: None,
            ..EngineConfig::default()
        })
    }

    #[test]
    fn test_unknown_color_is_rejected() {
        assert!(matches!(
            Player::from_token("red", config(2)),
            Err(ConfigError::UnknownColor(token)) if token == "red"
        ));
        let player = Player::from_token("White", config(2)).unwrap();
        assert_eq!(player.color(), Color::White);
    }

    #[test]
    fn test_invalid_depth_is_rejected() {
        assert!(matches!(
            Player::new(Color::Black, config(0)),
            Err(ConfigError::InvalidDepth { depth: 0, .. })
        ));
    }

    #[test]
    fn test_overflowing_weights_are_rejected() {
        let config = Arc::new(EngineConfig {
            no_replies_bonus: i32::MAX,
            ..EngineConfig::default()
        });
        assert!(matches!(
            Player::new(Color::Black, config),
            Err(ConfigError::WeightOutOfRange { name: "no_replies_bonus", .. })
        ));
    }

    #[test]
    fn test_play_applies_move() {
        let player = Player::new(Color::Black, config(2)).unwrap();
        let mut board = Board::new();
        let report = player.play(&mut board, &MonotonicClock::start());

        assert!(report.applied);
        assert_eq!(report.score_before, 0);
        assert_eq!(report.score_after, 3);
        assert_eq!(board.piece_count(Color::Black), 4);
        assert_ne!(report.result.best_move, Move::PASS);
    }

    #[test]
    fn test_play_passes_without_moves() {
        let mut board: Board = "BBBBBBBB\n\
                                WBBBBBBB\n\
                                ........\n\
                                ........\n\
                                ........\n\
                                ........\n\
                                ........\n\
                                ........\n"
            .parse()
            .unwrap();
        let before = board.clone();
        let player = Player::new(Color::White, config(3)).unwrap();
        let report = player.play(&mut board, &MonotonicClock::start());

        assert!(!report.applied);
        assert_eq!(report.result.best_move, Move::PASS);
        assert_eq!(report.score_before, report.score_after);
        assert_eq!(board, before);
    }
}
