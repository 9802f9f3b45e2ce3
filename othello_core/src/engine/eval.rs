use crate::engine::config::{EngineConfig, EvaluatorKind};
use crate::engine::{Evaluator, Move, Position};
use crate::logic::board::{Color, BOARD_SIZE};
use std::sync::Arc;

const LAST: i8 = BOARD_SIZE as i8 - 1;

/// Positional class of a square.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    Corner,
    /// The ring one step inside the edge (20 squares). Taking one of these
    /// tends to open a corner for the opponent.
    DangerZone,
    /// Edge squares other than corners.
    Border,
    Interior,
}

impl Zone {
    pub fn of(mv: Move) -> Self {
        let on_edge = |v: i8| v == 0 || v == LAST;
        let on_ring = |v: i8| v == 1 || v == LAST - 1;
        let inside_ring = |v: i8| (1..LAST).contains(&v);

        if on_edge(mv.col) && on_edge(mv.row) {
            Self::Corner
        } else if on_edge(mv.col) || on_edge(mv.row) {
            Self::Border
        } else if inside_ring(mv.col)
            && inside_ring(mv.row)
            && (on_ring(mv.col) || on_ring(mv.row))
        {
            Self::DangerZone
        } else {
            Self::Interior
        }
    }
}

/// Disk difference from `me`'s point of view.
pub fn material<P: Position>(position: &P, me: Color) -> i32 {
    position.piece_count(me) as i32 - position.piece_count(me.opposite()) as i32
}

pub struct SimpleEvaluator {
    config: Arc<EngineConfig>,
}

impl SimpleEvaluator {
    pub const fn new(config: Arc<EngineConfig>) -> Self {
        Self { config }
    }

    /// Corner / danger-zone / border term for the square `mv` lands on.
    pub fn square_bonus(&self, mv: Move) -> i32 {
        match Zone::of(mv) {
            Zone::Corner => self.config.corner_bonus,
            Zone::DangerZone => -self.config.danger_zone_penalty,
            Zone::Border => self.config.border_bonus,
            Zone::Interior => 0,
        }
    }

    /// Mobility denial: rewards leaving the opponent few (or no) replies and
    /// penalises handing it a corner or border square. Replies are checked in
    /// enumeration order and the first corner/border reply decides the penalty.
    pub fn reply_bonus<P: Position>(&self, after: &P, mover: Color) -> i32 {
        let replies = after.legal_moves(mover.opposite());
        let mut score = 0;

        if replies.len() < self.config.few_replies_threshold {
            score += self.config.few_replies_bonus;
        }
        if replies.is_empty() {
            score += self.config.no_replies_bonus;
        }

        for reply in &replies {
            match Zone::of(reply) {
                Zone::Corner => return score - self.config.reply_corner_penalty,
                Zone::Border => return score - self.config.reply_border_penalty,
                Zone::DangerZone | Zone::Interior => {}
            }
        }
        score
    }
}

impl<P: Position> Evaluator<P> for SimpleEvaluator {
    fn evaluate(&self, position: &P, me: Color) -> i32 {
        material(position, me)
    }

    fn move_bonus(&self, after: &P, mv: Move, mover: Color) -> i32 {
        match self.config.evaluator {
            EvaluatorKind::Material => 0,
            EvaluatorKind::Positional => self.square_bonus(mv) + self.reply_bonus(after, mover),
        }
    }
}
