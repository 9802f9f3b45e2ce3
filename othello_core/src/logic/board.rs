use crate::engine::move_list::MoveList;
use crate::engine::{Move, Position};
use crate::logic::rules::{validate_move, MoveError};
use serde::{Deserialize, Serialize};
use serde_big_array::BigArray;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

pub const BOARD_SIZE: usize = 8;
pub const NUM_SQUARES: usize = BOARD_SIZE * BOARD_SIZE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    Black,
    White,
}

impl Color {
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Black => Self::White,
            Self::White => Self::Black,
        }
    }

    pub const fn index(self) -> usize {
        match self {
            Self::Black => 0,
            Self::White => 1,
        }
    }

    /// Cell character used in state files.
    pub const fn symbol(self) -> char {
        match self {
            Self::Black => 'B',
            Self::White => 'W',
        }
    }

    pub const fn from_symbol(ch: char) -> Option<Self> {
        match ch {
            'B' => Some(Self::Black),
            'W' => Some(Self::White),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Black => "black",
            Self::White => "white",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Accepts the color tokens handed to a player process (`black` / `white`,
/// any case) and the single-letter cell symbols.
impl FromStr for Color {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "black" | "b" => Ok(Self::Black),
            "white" | "w" => Ok(Self::White),
            _ => Err(ParseError::UnknownColor(s.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("board must have 8 rows, found {0}")]
    BoardShape(usize),
    #[error("row {row} must have 8 cells, found {len}")]
    RowLength { row: usize, len: usize },
    #[error("unexpected character {ch:?} at ({col},{row})")]
    BoardCell { col: usize, row: usize, ch: char },
    #[error("unrecognized color `{0}` (expected `black` or `white`)")]
    UnknownColor(String),
    #[error("malformed move record {0:?}, expected `col,row`")]
    MoveRecord(String),
    #[error("cannot read board file: {0}")]
    Io(#[from] std::io::Error),
}

/// Iterates set bits of a square mask, lowest square first.
pub struct BitboardIterator {
    bb: u64,
}

impl BitboardIterator {
    pub const fn new(bb: u64) -> Self {
        Self { bb }
    }
}

impl Iterator for BitboardIterator {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        if self.bb == 0 {
            return None;
        }
        let sq = self.bb.trailing_zeros() as usize;
        self.bb &= self.bb - 1;
        Some(sq)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    // Mailbox indexed by `row * 8 + col`
    #[serde(with = "BigArray")]
    grid: [Option<Color>; NUM_SQUARES],
    counts: [u32; 2],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Standard opening position: four center disks, black to move.
    #[must_use]
    pub fn new() -> Self {
        let mut board = Self::empty();
        board.set_cell(3, 3, Some(Color::White));
        board.set_cell(4, 4, Some(Color::White));
        board.set_cell(3, 4, Some(Color::Black));
        board.set_cell(4, 3, Some(Color::Black));
        board
    }

    #[must_use]
    pub const fn empty() -> Self {
        Self {
            grid: [None; NUM_SQUARES],
            counts: [0; 2],
        }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ParseError> {
        let text = std::fs::read_to_string(path)?;
        text.parse()
    }

    #[must_use]
    pub const fn square_index(col: usize, row: usize) -> usize {
        row * BOARD_SIZE + col
    }

    #[must_use]
    pub const fn index_to_coord(sq: usize) -> (usize, usize) {
        (sq % BOARD_SIZE, sq / BOARD_SIZE)
    }

    /// Contents of `(col, row)`; `None` for an empty or off-board cell.
    #[must_use]
    pub fn cell(&self, col: usize, row: usize) -> Option<Color> {
        if col >= BOARD_SIZE || row >= BOARD_SIZE {
            return None;
        }
        self.grid[Self::square_index(col, row)]
    }

    /// Writes `(col, row)` and keeps the disk counts in step. Returns `false`
    /// and leaves the board alone for an off-board cell.
    pub fn set_cell(&mut self, col: usize, row: usize, piece: Option<Color>) -> bool {
        if col >= BOARD_SIZE || row >= BOARD_SIZE {
            return false;
        }
        let sq = Self::square_index(col, row);
        if let Some(old) = self.grid[sq] {
            self.counts[old.index()] -= 1;
        }
        if let Some(new) = piece {
            self.counts[new.index()] += 1;
        }
        self.grid[sq] = piece;
        true
    }

    /// Contents of square `sq` (`row * 8 + col`); `None` when empty or off the board.
    pub(crate) fn at(&self, sq: usize) -> Option<Color> {
        self.grid.get(sq).copied().flatten()
    }

    #[must_use]
    pub const fn piece_count(&self, color: Color) -> u32 {
        self.counts[color.index()]
    }

    #[must_use]
    pub const fn empty_count(&self) -> u32 {
        NUM_SQUARES as u32 - self.counts[0] - self.counts[1]
    }

    /// Legal moves for `color`, columns outer and rows inner.
    #[must_use]
    pub fn legal_moves(&self, color: Color) -> MoveList {
        let mut moves = MoveList::new();
        for col in 0..BOARD_SIZE as i8 {
            for row in 0..BOARD_SIZE as i8 {
                let mv = Move::new(col, row);
                if validate_move(self, mv, color).is_ok() {
                    moves.push(mv);
                }
            }
        }
        moves
    }

    #[must_use]
    pub fn has_legal_moves(&self, color: Color) -> bool {
        (0..NUM_SQUARES).any(|sq| {
            let (col, row) = Self::index_to_coord(sq);
            validate_move(self, Move::new(col as i8, row as i8), color).is_ok()
        })
    }

    /// Places a disk for `color` and flips every bracketed run.
    /// Returns the number of flipped disks; on error the board is untouched.
    pub fn try_apply_move(&mut self, mv: Move, color: Color) -> Result<u32, MoveError> {
        let flips = validate_move(self, mv, color)?;
        let sq = mv.square().ok_or(MoveError::OutOfBounds(mv))?;
        self.grid[sq] = Some(color);
        for flipped in BitboardIterator::new(flips) {
            self.grid[flipped] = Some(color);
        }
        let flipped = flips.count_ones();
        self.counts[color.index()] += flipped + 1;
        self.counts[color.opposite().index()] -= flipped;
        Ok(flipped)
    }

    pub fn apply_move(&mut self, mv: Move, color: Color) -> bool {
        self.try_apply_move(mv, color).is_ok()
    }

    /// Human-readable rendering with coordinates, for logs.
    #[must_use]
    pub fn decorated(&self) -> String {
        let mut out = String::from("  0 1 2 3 4 5 6 7\n");
        for row in 0..BOARD_SIZE {
            out.push_str(&row.to_string());
            for col in 0..BOARD_SIZE {
                out.push(' ');
                out.push(self.cell(col, row).map_or('.', Color::symbol));
            }
            out.push('\n');
        }
        out
    }
}

impl Position for Board {
    fn legal_moves(&self, color: Color) -> MoveList {
        Self::legal_moves(self, color)
    }

    fn apply_move(&mut self, mv: Move, color: Color) -> bool {
        Self::apply_move(self, mv, color)
    }

    fn piece_count(&self, color: Color) -> u32 {
        Self::piece_count(self, color)
    }
}

/// State file format: one line per row, `B`, `W` or `.` per cell.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..BOARD_SIZE {
            let line: String = (0..BOARD_SIZE)
                .map(|col| self.cell(col, row).map_or('.', Color::symbol))
                .collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

impl FromStr for Board {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows: Vec<&str> = s
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        if rows.len() != BOARD_SIZE {
            return Err(ParseError::BoardShape(rows.len()));
        }

        let mut board = Self::empty();
        for (row, line) in rows.iter().enumerate() {
            let len = line.chars().count();
            if len != BOARD_SIZE {
                return Err(ParseError::RowLength { row, len });
            }
            for (col, ch) in line.chars().enumerate() {
                let piece = match ch {
                    '.' => None,
                    _ => Some(
                        Color::from_symbol(ch).ok_or(ParseError::BoardCell { col, row, ch })?,
                    ),
                };
                board.set_cell(col, row, piece);
            }
        }
        Ok(board)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const START: &str = "........\n\
                         ........\n\
                         ........\n\
                         ...WB...\n\
                         ...BW...\n\
                         ........\n\
                         ........\n\
                         ........\n";

    #[test]
    fn test_initial_position() {
        let board = Board::new();
        assert_eq!(board.piece_count(Color::Black), 2);
        assert_eq!(board.piece_count(Color::White), 2);
        assert_eq!(board.empty_count(), 60);
        assert_eq!(board.to_string(), START);
    }

    #[test]
    fn test_initial_legal_moves_in_enumeration_order() {
        let board = Board::new();
        let black: Vec<Move> = board.legal_moves(Color::Black).into_iter().collect();
        assert_eq!(
            black,
            vec![
                Move::new(2, 3),
                Move::new(3, 2),
                Move::new(4, 5),
                Move::new(5, 4)
            ]
        );
        let white: Vec<Move> = board.legal_moves(Color::White).into_iter().collect();
        assert_eq!(
            white,
            vec![
                Move::new(2, 4),
                Move::new(3, 5),
                Move::new(4, 2),
                Move::new(5, 3)
            ]
        );
    }

    #[test]
    fn test_apply_move_flips() {
        let mut board = Board::new();
        assert_eq!(board.try_apply_move(Move::new(2, 3), Color::Black), Ok(1));
        assert_eq!(board.cell(2, 3), Some(Color::Black));
        assert_eq!(board.cell(3, 3), Some(Color::Black));
        assert_eq!(board.piece_count(Color::Black), 4);
        assert_eq!(board.piece_count(Color::White), 1);
    }

    #[test]
    fn test_illegal_move_leaves_board_unchanged() {
        let mut board = Board::new();
        let before = board.clone();
        assert_eq!(
            board.try_apply_move(Move::new(0, 0), Color::Black),
            Err(MoveError::NoFlips(Move::new(0, 0)))
        );
        assert_eq!(
            board.try_apply_move(Move::new(3, 3), Color::Black),
            Err(MoveError::Occupied(Move::new(3, 3)))
        );
        assert!(!board.apply_move(Move::PASS, Color::Black));
        assert!(!board.apply_move(Move::new(9, 1), Color::Black));
        assert_eq!(board, before);
    }

    #[test]
    fn test_clone_is_independent() {
        let original = Board::new();
        let mut copy = original.clone();
        assert!(copy.apply_move(Move::new(5, 4), Color::Black));
        assert_eq!(original.piece_count(Color::Black), 2);
        assert_eq!(original.piece_count(Color::White), 2);
        assert_eq!(original, Board::new());
        assert_ne!(copy, original);
    }

    #[test]
    fn test_set_cell_keeps_counts() {
        let mut board = Board::new();
        assert!(board.set_cell(0, 0, Some(Color::Black)));
        assert!(board.set_cell(3, 3, Some(Color::Black)));
        assert_eq!(board.piece_count(Color::Black), 4);
        assert_eq!(board.piece_count(Color::White), 1);

        let before = board.clone();
        assert!(!board.set_cell(8, 0, Some(Color::White)));
        assert!(!board.set_cell(2, 8, None));
        assert_eq!(board, before);
        assert_eq!(board.cell(8, 0), None);

        assert!(board.set_cell(0, 0, None));
        assert_eq!(board.piece_count(Color::Black), 3);
        assert_eq!(board.empty_count(), 60);
    }

    #[test]
    fn test_parse_round_trip() {
        let text = "B.......\n\
                    .W......\n\
                    ..BW....\n\
                    ...WB...\n\
                    ...BW...\n\
                    ........\n\
                    ......W.\n\
                    .......B\n";
        let board: Board = text.parse().unwrap();
        assert_eq!(board.to_string(), text);
        assert_eq!(board.piece_count(Color::Black), 5);
        assert_eq!(board.piece_count(Color::White), 5);
        assert_eq!(board.cell(0, 0), Some(Color::Black));
        assert_eq!(board.cell(6, 6), Some(Color::White));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            "........\n".parse::<Board>(),
            Err(ParseError::BoardShape(1))
        ));
        let short_row = START.replacen("........", ".......", 1);
        assert!(matches!(
            short_row.parse::<Board>(),
            Err(ParseError::RowLength { row: 0, len: 7 })
        ));
        let bad_cell = START.replacen("...WB...", "...WX...", 1);
        assert!(matches!(
            bad_cell.parse::<Board>(),
            Err(ParseError::BoardCell {
                col: 4,
                row: 3,
                ch: 'X'
            })
        ));
    }

    #[test]
    fn test_color_tokens() {
        assert_eq!("black".parse::<Color>().unwrap(), Color::Black);
        assert_eq!("WHITE".parse::<Color>().unwrap(), Color::White);
        assert_eq!("W".parse::<Color>().unwrap(), Color::White);
        assert!(matches!(
            "red".parse::<Color>(),
            Err(ParseError::UnknownColor(token)) if token == "red"
        ));
    }

    #[test]
    fn test_serde_preserves_board() {
        let mut board = Board::new();
        assert!(board.apply_move(Move::new(3, 2), Color::Black));
        let json = serde_json::to_string(&board).unwrap();
        let restored: Board = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, board);
        assert_eq!(
            restored.legal_moves(Color::White),
            board.legal_moves(Color::White)
        );
    }
}
