use crate::engine::Move;
use crate::logic::board::{Board, Color};
use crate::logic::rules::MoveError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Playing,
    /// Neither side can move. Final disk counts.
    Finished { black: u32, white: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    /// `Move::PASS` when the side had no legal move.
    pub mv: Move,
    pub color: Color,
    pub flipped: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub board: Board,
    pub turn: Color,
    pub status: GameStatus,
    pub history: Vec<MoveRecord>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    #[must_use]
    pub fn new() -> Self {
        Self::from_board(Board::new(), Color::Black)
    }

    /// Starts from an arbitrary position. A side without legal moves is
    /// skipped right away, and a blocked position is reported as finished.
    #[must_use]
    pub fn from_board(board: Board, turn: Color) -> Self {
        let mut game = Self {
            board,
            turn,
            status: GameStatus::Playing,
            history: Vec::new(),
        };
        game.advance();
        game
    }

    /// Plays `mv` for the side to move. Returns the number of flipped disks.
    pub fn make_move(&mut self, mv: Move) -> Result<u32, MoveError> {
        if self.is_over() {
            return Err(MoveError::GameOver);
        }

        let flipped = self.board.try_apply_move(mv, self.turn)?;
        self.history.push(MoveRecord {
            mv,
            color: self.turn,
            flipped,
        });
        self.turn = self.turn.opposite();
        self.advance();

        Ok(flipped)
    }

    pub const fn is_over(&self) -> bool {
        matches!(self.status, GameStatus::Finished { .. })
    }

    /// Side with more disks once the game is over; `None` while playing or on a draw.
    pub fn winner(&self) -> Option<Color> {
        match self.status {
            GameStatus::Finished { black, white } if black > white => Some(Color::Black),
            GameStatus::Finished { black, white } if white > black => Some(Color::White),
            _ => None,
        }
    }

    fn advance(&mut self) {
        if self.board.has_legal_moves(self.turn) {
            return;
        }

        if self.board.has_legal_moves(self.turn.opposite()) {
            log::debug!("{} has no legal moves and passes", self.turn);
            self.history.push(MoveRecord {
                mv: Move::PASS,
                color: self.turn,
                flipped: 0,
            });
            self.turn = self.turn.opposite();
        } else {
            self.status = GameStatus::Finished {
                black: self.board.piece_count(Color::Black),
                white: self.board.piece_count(Color::White),
            };
            log::debug!("game over: {:?}", self.status);
        }
    }
}
