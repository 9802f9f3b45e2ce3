use crate::engine::clock::Clock;
use crate::engine::config::EngineConfig;
use crate::engine::eval::SimpleEvaluator;
use crate::engine::move_list::MoveList;
use crate::engine::ranker::rank_moves;
use crate::engine::{Evaluator, Move, Position, SearchResult, INFINITY};
use crate::logic::board::Color;
use std::sync::Arc;
use std::time::Duration;

/// Per-call search state. Lives on the stack of one `search` call, so counters
/// start at zero every time and nothing is shared between calls.
struct SearchContext<'a> {
    clock: &'a dyn Clock,
    deadline: Option<Duration>,
    nodes_expanded: u64,
    branches_pruned: u64,
    timed_out: bool,
}

impl<'a> SearchContext<'a> {
    fn new(clock: &'a dyn Clock, deadline: Option<Duration>) -> Self {
        Self {
            clock,
            deadline,
            nodes_expanded: 0,
            branches_pruned: 0,
            timed_out: false,
        }
    }

    /// Once the deadline has passed this stays true for the rest of the call.
    fn out_of_time(&mut self) -> bool {
        if !self.timed_out {
            if let Some(deadline) = self.deadline {
                self.timed_out = self.clock.elapsed() > deadline;
            }
        }
        self.timed_out
    }
}

#[derive(Debug, Clone, Copy)]
struct RootChoice {
    mv: Move,
    score: i32,
    /// Position of `mv` in the position's own move enumeration.
    index: usize,
}

impl RootChoice {
    /// Strictly greater score wins; equal scores go to the earlier enumerated move,
    /// whatever order the root moves were searched in.
    const fn beats(&self, other: &Self) -> bool {
        self.score > other.score || (self.score == other.score && self.index < other.index)
    }
}

pub struct AlphaBetaEngine {
    config: Arc<EngineConfig>,
    evaluator: SimpleEvaluator,
    me: Color,
}

impl AlphaBetaEngine {
    pub fn new(config: Arc<EngineConfig>, me: Color) -> Self {
        Self {
            evaluator: SimpleEvaluator::new(config.clone()),
            config,
            me,
        }
    }

    pub const fn color(&self) -> Color {
        self.me
    }

    fn ordered_moves<P: Position>(&self, position: &P, moves: &MoveList, side: Color) -> MoveList {
        if self.config.move_ordering {
            rank_moves(position, moves, side, self.me)
        } else {
            *moves
        }
    }

    /// Scores `position` with `depth` plies left. `maximizing` nodes play `me`,
    /// the others play the opponent. Returns `None` when the deadline passed,
    /// in which case the caller drops the whole depth tier.
    ///
    /// The positional bonus of a move is added to the value of its child, so
    /// the child is searched with the window shifted by that bonus to keep the
    /// cutoffs exact.
    fn alpha_beta<P: Position>(
        &self,
        ctx: &mut SearchContext<'_>,
        position: &P,
        mut alpha: i32,
        mut beta: i32,
        depth: u8,
        maximizing: bool,
    ) -> Option<i32> {
        if ctx.out_of_time() {
            return None;
        }

        let side = if maximizing { self.me } else { self.me.opposite() };
        let moves = position.legal_moves(side);
        if depth == 0 || moves.is_empty() {
            return Some(self.evaluator.evaluate(position, self.me));
        }

        for mv in &self.ordered_moves(position, &moves, side) {
            let mut child = position.clone();
            if !child.apply_move(mv, side) {
                log::warn!("skipping illegal move {mv} for {side}");
                continue;
            }
            ctx.nodes_expanded += 1;

            let bonus = self.evaluator.move_bonus(&child, mv, side);
            let bonus = if maximizing { bonus } else { -bonus };

            // Plain minimax gives every child a fresh window.
            let (lo, hi) = if self.config.pruning {
                (alpha - bonus, beta - bonus)
            } else {
                (-INFINITY, INFINITY)
            };
            let value = self.alpha_beta(ctx, &child, lo, hi, depth - 1, !maximizing)? + bonus;

            if maximizing {
                alpha = alpha.max(value);
            } else {
                beta = beta.min(value);
            }

            if self.config.pruning && alpha >= beta {
                ctx.branches_pruned += 1;
                return Some(if maximizing { alpha } else { beta });
            }
        }

        Some(if maximizing { alpha } else { beta })
    }

    /// One full root loop at `depth`. `Err` carries whatever finished before
    /// the deadline hit.
    fn search_root<P: Position>(
        &self,
        ctx: &mut SearchContext<'_>,
        position: &P,
        legal: &MoveList,
        depth: u8,
    ) -> Result<Option<RootChoice>, Option<RootChoice>> {
        let mut best: Option<RootChoice> = None;

        for mv in &self.ordered_moves(position, legal, self.me) {
            if ctx.out_of_time() {
                return Err(best);
            }

            let mut child = position.clone();
            if !child.apply_move(mv, self.me) {
                log::warn!("skipping illegal root move {mv} for {}", self.me);
                continue;
            }
            ctx.nodes_expanded += 1;

            let bonus = self.evaluator.move_bonus(&child, mv, self.me);
            let Some(value) = self.alpha_beta(ctx, &child, -INFINITY, INFINITY, depth, false)
            else {
                return Err(best);
            };

            let choice = RootChoice {
                mv,
                score: value + bonus,
                index: legal.index_of(mv).unwrap_or(usize::MAX),
            };
            log::debug!("depth {depth}: {mv} scores {}", choice.score);

            if best.as_ref().map_or(true, |b| choice.beats(b)) {
                best = Some(choice);
            }
        }

        Ok(best)
    }

    /// Picks a move for `me` in `position`.
    ///
    /// With iterative deepening the root loop runs for every depth up to
    /// `max_depth`; otherwise only `max_depth` is searched. The answer comes
    /// from the deepest tier that finished. If the deadline hits before any
    /// tier finished, the best root move scored so far is used, and failing
    /// that the first legal move, scored by the position right after it.
    pub fn search<P: Position>(&self, position: &P, clock: &dyn Clock) -> SearchResult {
        let mut ctx = SearchContext::new(clock, self.config.time_limit());
        let legal = position.legal_moves(self.me);

        let mut result = SearchResult {
            best_move: Move::PASS,
            score: self.evaluator.evaluate(position, self.me),
            nodes_expanded: 0,
            branches_pruned: 0,
            completed_depth: 0,
            timed_out: false,
            elapsed_ms: 0,
        };

        if legal.is_empty() {
            log::debug!("{} has no legal moves, passing", self.me);
            result.elapsed_ms = elapsed_ms(clock);
            return result;
        }

        let max_depth = self.config.max_depth;
        let first_depth = if self.config.iterative_deepening { 1 } else { max_depth };
        let mut best: Option<RootChoice> = None;

        for depth in first_depth..=max_depth {
            match self.search_root(&mut ctx, position, &legal, depth) {
                Ok(tier) => {
                    if let Some(choice) = tier {
                        best = Some(choice);
                        result.completed_depth = depth;
                        log::debug!(
                            "depth {depth} complete: {} ({}), nodes {}, pruned {}",
                            choice.mv,
                            choice.score,
                            ctx.nodes_expanded,
                            ctx.branches_pruned
                        );
                    }
                }
                Err(partial) => {
                    log::warn!(
                        "deadline reached during depth {depth}; keeping depth {}",
                        result.completed_depth
                    );
                    if best.is_none() {
                        best = partial;
                    }
                    break;
                }
            }
        }

        if let Some(choice) = best {
            result.best_move = choice.mv;
            result.score = choice.score;
        } else if let Some(first) = legal.first() {
            result.best_move = first;
            let mut child = position.clone();
            if child.apply_move(first, self.me) {
                result.score = self.evaluator.evaluate(&child, self.me);
            }
        }

        result.nodes_expanded = ctx.nodes_expanded;
        result.branches_pruned = ctx.branches_pruned;
        result.timed_out = ctx.timed_out;
        result.elapsed_ms = elapsed_ms(clock);
        result
    }
}

fn elapsed_ms(clock: &dyn Clock) -> u64 {
    u64::try_from(clock.elapsed().as_millis()).unwrap_or(u64::MAX)
}
