use crate::engine::eval::material;
use crate::engine::move_list::MoveList;
use crate::engine::{Move, Position};
use crate::logic::board::Color;
use std::cmp::Ordering;

/// A candidate move with its one-ply material score from the searching side's view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveScore {
    pub mv: Move,
    pub score: i32,
    /// Side that would play `mv`.
    pub color: Color,
}

pub fn by_score_desc(a: &MoveScore, b: &MoveScore) -> Ordering {
    b.score.cmp(&a.score)
}

pub fn by_score_asc(a: &MoveScore, b: &MoveScore) -> Ordering {
    a.score.cmp(&b.score)
}

/// Scores every move in `moves` by playing it on a copy of `position`.
/// A move the position refuses is dropped.
pub fn score_moves<P: Position>(
    position: &P,
    moves: &MoveList,
    side: Color,
    me: Color,
) -> Vec<MoveScore> {
    moves
        .iter()
        .filter_map(|mv| {
            let mut child = position.clone();
            if !child.apply_move(mv, side) {
                log::warn!("not ranking illegal move {mv} for {side}");
                return None;
            }
            Some(MoveScore {
                mv,
                score: material(&child, me),
                color: side,
            })
        })
        .collect()
}

/// Orders `moves` so the most promising one for `side` comes first: best for
/// `me` when `me` is to move, worst for `me` otherwise. The sort is stable, so
/// equal scores keep their enumeration order.
pub fn rank_moves<P: Position>(position: &P, moves: &MoveList, side: Color, me: Color) -> MoveList {
    let mut scored = score_moves(position, moves, side, me);
    if side == me {
        scored.sort_by(by_score_desc);
    } else {
        scored.sort_by(by_score_asc);
    }
    scored.into_iter().map(|s| s.mv).collect()
}
