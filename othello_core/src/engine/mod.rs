use crate::engine::move_list::MoveList;
use crate::logic::board::{Color, ParseError, BOARD_SIZE};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub mod clock;
pub mod config;
pub mod eval;
pub mod move_list;
pub mod player;
pub mod ranker;
pub mod search;


/// Bound used in place of ±infinity for alpha/beta windows. Any reachable
/// score (material plus per-move bonuses) stays far inside it.
pub const INFINITY: i32 = 200_000;

/// A disk placement at `(col, row)`. `Move::PASS` (`-1,-1`) stands for "no move".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Move {
    pub col: i8,
    pub row: i8,
}

impl Move {
    pub const PASS: Self = Self { col: -1, row: -1 };

    #[must_use]
    pub const fn new(col: i8, row: i8) -> Self {
        Self { col, row }
    }

    #[must_use]
    pub const fn is_pass(self) -> bool {
        self.col == Self::PASS.col && self.row == Self::PASS.row
    }

    /// Square index (`row * 8 + col`) when the move lies on the board.
    #[must_use]
    pub fn square(self) -> Option<usize> {
        let size = BOARD_SIZE as i8;
        if (0..size).contains(&self.col) && (0..size).contains(&self.row) {
            Some(self.row as usize * BOARD_SIZE + self.col as usize)
        } else {
            None
        }
    }
}

/// Move record format: two comma separated integers, `col,row`.
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.col, self.row)
    }
}

impl FromStr for Move {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let record = s.trim();
        let malformed = || ParseError::MoveRecord(record.to_string());
        let (col, row) = record.split_once(',').ok_or_else(malformed)?;
        let col = col.trim().parse::<i8>().map_err(|_| malformed())?;
        let row = row.trim().parse::<i8>().map_err(|_| malformed())?;
        let mv = Self::new(col, row);
        if mv.is_pass() || mv.square().is_some() {
            Ok(mv)
        } else {
            Err(malformed())
        }
    }
}

/// What the search needs from a board implementation.
///
/// Positions are copied, never shared, across search branches: every child
/// node is a `clone()` with one move applied, so applying a move to a clone
/// must never affect the original.
pub trait Position: Clone {
    /// Legal moves for `color`, in a fixed enumeration order. Empty means `color` must pass.
    fn legal_moves(&self, color: Color) -> MoveList;

    /// Applies `mv` for `color` if and only if it is legal. Returns whether it was applied;
    /// an illegal move leaves the position unchanged.
    fn apply_move(&mut self, mv: Move, color: Color) -> bool;

    fn piece_count(&self, color: Color) -> u32;
}

/// Scores positions from one fixed color's point of view.
pub trait Evaluator<P: Position> {
    /// Static score of `position` for `me`.
    fn evaluate(&self, position: &P, me: Color) -> i32;

    /// Heuristic bonus for `mover` having played `mv`, computed on the position
    /// right after the move. Added on top of the searched score of that child.
    fn move_bonus(&self, after: &P, mv: Move, mover: Color) -> i32;
}

/// Outcome of one top-level search call. Counters cover that call only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub best_move: Move,
    pub score: i32,
    pub nodes_expanded: u64,
    pub branches_pruned: u64,
    /// Deepest depth tier whose root loop ran to completion (0 if none did).
    pub completed_depth: u8,
    pub timed_out: bool,
    pub elapsed_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_record_format() {
        assert_eq!(Move::new(2, 3).to_string(), "2,3");
        assert_eq!(Move::PASS.to_string(), "-1,-1");
        assert_eq!(" 5, 4\n".parse::<Move>().unwrap(), Move::new(5, 4));
        assert_eq!("-1,-1".parse::<Move>().unwrap(), Move::PASS);
    }

    #[test]
    fn test_move_record_rejects_garbage() {
        assert!("".parse::<Move>().is_err());
        assert!("3".parse::<Move>().is_err());
        assert!("a,b".parse::<Move>().is_err());
        assert!("8,0".parse::<Move>().is_err());
        assert!("-1,3".parse::<Move>().is_err());
    }

    #[test]
    fn test_square_index() {
        assert_eq!(Move::new(0, 0).square(), Some(0));
        assert_eq!(Move::new(7, 0).square(), Some(7));
        assert_eq!(Move::new(0, 1).square(), Some(8));
        assert_eq!(Move::new(7, 7).square(), Some(63));
        assert_eq!(Move::PASS.square(), None);
        assert_eq!(Move::new(8, 2).square(), None);
    }
}
